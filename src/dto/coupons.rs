use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Coupon;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CouponRequest {
    pub code: String,
    #[serde(default)]
    pub percent: i32,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub min_subtotal: i64,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CouponList {
    #[schema(value_type = Vec<Coupon>)]
    pub items: Vec<Coupon>,
}
