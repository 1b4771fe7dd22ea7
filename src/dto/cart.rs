use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub item_id: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApplyCouponRequest {
    pub code: String,
}

/// Pre-filled order text and the messaging deep link that carries it.
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutLink {
    pub message: String,
    pub url: String,
}
