use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr,
};

use crate::{
    cart::{MAX_AMOUNT, format_money},
    dto::coupons::CouponRequest,
    entity::coupons::{ActiveModel, Column, Entity as Coupons, Model as CouponModel},
    error::{AppError, AppResult},
    models::Coupon,
};

/// Codes compare trimmed and uppercase.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

pub async fn add_coupon<C: ConnectionTrait>(db: &C, payload: CouponRequest) -> AppResult<Coupon> {
    let code = normalize_code(&payload.code);
    if code.is_empty() {
        return Err(AppError::Validation("coupon code is required".into()));
    }
    if !(0..=100).contains(&payload.percent) {
        return Err(AppError::Validation("percent must be between 0 and 100".into()));
    }
    if !(0..=MAX_AMOUNT).contains(&payload.amount) {
        return Err(AppError::Validation(format!(
            "amount must be between 0 and {}",
            format_money(MAX_AMOUNT)
        )));
    }
    if !(0..=MAX_AMOUNT).contains(&payload.min_subtotal) {
        return Err(AppError::Validation(format!(
            "min_subtotal must be between 0 and {}",
            format_money(MAX_AMOUNT)
        )));
    }

    let exist = Coupons::find()
        .filter(Column::Code.eq(code.as_str()))
        .one(db)
        .await?;
    if exist.is_some() {
        return Err(AppError::DuplicateCode(code));
    }

    let active = ActiveModel {
        id: NotSet,
        code: Set(code.clone()),
        percent: Set(payload.percent),
        amount: Set(payload.amount),
        min_subtotal: Set(payload.min_subtotal),
        expires_at: Set(payload.expires_at.map(Into::into)),
    };
    let coupon = active
        .insert(db)
        .await
        .map_err(|err| duplicate_or_storage(err, &code))?;

    tracing::info!(coupon_id = coupon.id, code = %coupon.code, "coupon created");
    Ok(coupon_from_entity(coupon))
}

/// `None` when no coupon carries the (normalized) code.
pub async fn find_coupon_by_code<C: ConnectionTrait>(
    db: &C,
    code: &str,
) -> AppResult<Option<Coupon>> {
    let code = normalize_code(code);
    if code.is_empty() {
        return Ok(None);
    }
    let coupon = Coupons::find()
        .filter(Column::Code.eq(code))
        .one(db)
        .await?
        .map(coupon_from_entity);
    Ok(coupon)
}

/// Hard delete. Carts that already hold a snapshot keep it.
pub async fn delete_coupon<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<bool> {
    let result = Coupons::delete_by_id(id).exec(db).await?;
    if result.rows_affected > 0 {
        tracing::info!(coupon_id = id, "coupon deleted");
    }
    Ok(result.rows_affected > 0)
}

pub async fn list_coupons<C: ConnectionTrait>(db: &C) -> AppResult<Vec<Coupon>> {
    let coupons = Coupons::find()
        .order_by_asc(Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(coupon_from_entity)
        .collect();
    Ok(coupons)
}

fn duplicate_or_storage(err: DbErr, code: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::DuplicateCode(code.to_string()),
        _ => AppError::Storage(err),
    }
}

fn coupon_from_entity(model: CouponModel) -> Coupon {
    Coupon {
        id: model.id,
        code: model.code,
        percent: model.percent,
        amount: model.amount,
        min_subtotal: model.min_subtotal,
        expires_at: model.expires_at.map(|dt| dt.with_timezone(&Utc)),
    }
}

impl From<Coupon> for CouponRequest {
    fn from(coupon: Coupon) -> Self {
        Self {
            code: coupon.code,
            percent: coupon.percent,
            amount: coupon.amount,
            min_subtotal: coupon.min_subtotal,
            expires_at: coupon.expires_at,
        }
    }
}
