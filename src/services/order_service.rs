use std::fmt::Write as _;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::{
    cart::{CartState, format_money},
    dto::cart::CheckoutLink,
    error::{AppError, AppResult},
    models::Settings,
};

const GREETING: &str = "Hello, I'd like to place this order:";
const WA_BASE_URL: &str = "https://wa.me";

const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Plain-text order summary for the messaging handoff.
pub fn order_message(cart: &CartState) -> String {
    let mut text = String::new();
    text.push_str(GREETING);
    text.push_str("\n\n");
    for line in &cart.lines {
        let _ = writeln!(
            text,
            "• {} x{} - {}",
            line.name,
            line.qty,
            format_money(line.line_total())
        );
    }
    let _ = writeln!(text, "Subtotal: {}", format_money(cart.subtotal()));

    if let Some(coupon) = &cart.coupon {
        let mut terms = Vec::new();
        if coupon.percent > 0 {
            terms.push(format!("{}%", coupon.percent));
        }
        if coupon.amount > 0 {
            terms.push(format_money(coupon.amount));
        }
        let _ = writeln!(
            text,
            "Coupon {} ({}): -{}",
            coupon.code,
            terms.join(" + "),
            format_money(cart.discount_amount())
        );
    }
    let _ = write!(text, "Total: {}", format_money(cart.total()));
    text
}

/// Build the pre-filled message and the deep link that opens a chat with
/// the business number.
pub fn checkout_link(settings: &Settings, cart: &CartState) -> AppResult<CheckoutLink> {
    let digits: String = settings
        .wa_number
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        return Err(AppError::Validation(
            "no WhatsApp number configured".into(),
        ));
    }
    if cart.is_empty() {
        return Err(AppError::Validation("cart is empty".into()));
    }

    let message = order_message(cart);
    let url = format!(
        "{WA_BASE_URL}/{digits}?text={}",
        encode_uri_component(&message)
    );
    Ok(CheckoutLink { message, url })
}

/// Percent-encode everything outside `A-Z a-z 0-9 - _ . ! ~ * ' ( )`,
/// byte by byte over UTF-8.
pub fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}
