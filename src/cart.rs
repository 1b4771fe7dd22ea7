//! Cart state and money arithmetic.
//!
//! Lines and the coupon are value copies taken when the customer acted:
//! a later price change or coupon deletion never reaches a cart that
//! already holds them. All amounts are minor units (cents).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::models::{Coupon, Item};

/// Ceiling for prices and coupon amounts: $10,000,000.00.
pub const MAX_AMOUNT: i64 = 1_000_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub item_id: i32,
    pub name: String,
    /// Unit price frozen at add time.
    pub price: i64,
    pub qty: i32,
}

impl CartLine {
    pub fn line_total(&self) -> i64 {
        self.price.saturating_mul(i64::from(self.qty))
    }
}

/// Discount terms copied out of a coupon when it was applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CouponSnapshot {
    pub code: String,
    pub percent: i32,
    pub amount: i64,
    pub min_subtotal: i64,
    pub expires_at: Option<DateTime<Utc>>,
}

impl CouponSnapshot {
    /// Percent part plus flat part, never more than `subtotal`.
    pub fn discount_for(&self, subtotal: i64) -> i64 {
        let mut value: i64 = 0;
        if self.percent > 0 {
            value = value.saturating_add(percent_of(subtotal, self.percent));
        }
        if self.amount > 0 {
            value = value.saturating_add(self.amount);
        }
        value.clamp(0, subtotal.max(0))
    }
}

/// `amount * percent / 100`, rounded half-up to the cent.
fn percent_of(amount: i64, percent: i32) -> i64 {
    let scaled = i128::from(amount) * i128::from(percent) + 50;
    i64::try_from(scaled.div_euclid(100)).unwrap_or(i64::MAX)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CouponRejection {
    #[error("coupon not found")]
    NotFound,
    #[error("coupon has expired")]
    Expired,
    #[error("minimum purchase of {} required", format_money(.min_subtotal.to_owned()))]
    BelowMinimum { min_subtotal: i64 },
    #[error("coupon carries no discount")]
    NoDiscount,
}

/// Check a coupon against the current subtotal and take its snapshot.
pub fn evaluate_coupon(
    coupon: &Coupon,
    subtotal: i64,
    now: DateTime<Utc>,
) -> Result<CouponSnapshot, CouponRejection> {
    if coupon.expires_at.is_some_and(|expires_at| now > expires_at) {
        return Err(CouponRejection::Expired);
    }
    if coupon.min_subtotal > 0 && subtotal < coupon.min_subtotal {
        return Err(CouponRejection::BelowMinimum {
            min_subtotal: coupon.min_subtotal,
        });
    }
    if coupon.percent <= 0 && coupon.amount <= 0 {
        return Err(CouponRejection::NoDiscount);
    }
    Ok(CouponSnapshot {
        code: coupon.code.clone(),
        percent: coupon.percent.max(0),
        amount: coupon.amount.max(0),
        min_subtotal: coupon.min_subtotal.max(0),
        expires_at: coupon.expires_at,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CartState {
    #[serde(default)]
    pub lines: Vec<CartLine>,
    #[serde(default)]
    pub coupon: Option<CouponSnapshot>,
}

impl CartState {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, item_id: i32) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.item_id == item_id)
    }

    /// Bump an existing line or append a new one with the item's current
    /// name and price.
    pub fn add(&mut self, item: &Item) {
        match self.lines.iter_mut().find(|line| line.item_id == item.id) {
            Some(line) => line.qty = line.qty.saturating_add(1),
            None => self.lines.push(CartLine {
                item_id: item.id,
                name: item.name.clone(),
                price: item.price,
                qty: 1,
            }),
        }
    }

    pub fn increment(&mut self, item_id: i32) -> bool {
        match self.lines.iter_mut().find(|line| line.item_id == item_id) {
            Some(line) => {
                line.qty = line.qty.saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// Drops the line once its quantity reaches zero.
    pub fn decrement(&mut self, item_id: i32) -> bool {
        let Some(pos) = self.lines.iter().position(|line| line.item_id == item_id) else {
            return false;
        };
        self.lines[pos].qty -= 1;
        if self.lines[pos].qty <= 0 {
            self.lines.remove(pos);
        }
        true
    }

    pub fn remove(&mut self, item_id: i32) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.item_id != item_id);
        self.lines.len() != before
    }

    pub fn attach_coupon(&mut self, snapshot: CouponSnapshot) {
        self.coupon = Some(snapshot);
    }

    pub fn clear_coupon(&mut self) -> Option<CouponSnapshot> {
        self.coupon.take()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.coupon = None;
    }

    pub fn item_count(&self) -> i32 {
        self.lines
            .iter()
            .fold(0, |count: i32, line| count.saturating_add(line.qty))
    }

    pub fn subtotal(&self) -> i64 {
        self.lines
            .iter()
            .fold(0, |sum: i64, line| sum.saturating_add(line.line_total()))
    }

    pub fn discount_amount(&self) -> i64 {
        match &self.coupon {
            Some(coupon) => coupon.discount_for(self.subtotal()),
            None => 0,
        }
    }

    pub fn total(&self) -> i64 {
        self.subtotal().saturating_sub(self.discount_amount()).max(0)
    }
}

/// Read model handed to the presentation layer after every change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub coupon: Option<CouponSnapshot>,
    pub item_count: i32,
    pub subtotal: i64,
    pub discount: i64,
    pub total: i64,
}

impl From<&CartState> for CartView {
    fn from(state: &CartState) -> Self {
        Self {
            lines: state.lines.clone(),
            coupon: state.coupon.clone(),
            item_count: state.item_count(),
            subtotal: state.subtotal(),
            discount: state.discount_amount(),
            total: state.total(),
        }
    }
}

/// `1234` -> `"$12.34"`.
pub fn format_money(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}${}.{:02}", abs / 100, abs % 100)
}
