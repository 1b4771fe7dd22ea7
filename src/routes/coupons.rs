use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};

use crate::{
    dto::coupons::{CouponList, CouponRequest},
    error::{AppError, AppResult},
    middleware::admin_gate::AdminGate,
    models::Coupon,
    response::{ApiResponse, Meta},
    services::coupon_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_coupons).post(add_coupon))
        .route("/{id}", delete(delete_coupon))
}

#[utoipa::path(
    get,
    path = "/api/coupons",
    responses(
        (status = 200, description = "List coupons", body = ApiResponse<CouponList>)
    ),
    security(("admin_pin" = [])),
    tag = "Coupons"
)]
pub async fn list_coupons(
    State(state): State<AppState>,
    _admin: AdminGate,
) -> AppResult<Json<ApiResponse<CouponList>>> {
    let items = coupon_service::list_coupons(&state.orm).await?;
    let meta = Meta::count(items.len());
    Ok(Json(ApiResponse::success(
        "Coupons",
        CouponList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    post,
    path = "/api/coupons",
    request_body = CouponRequest,
    responses(
        (status = 200, description = "Coupon created", body = ApiResponse<Coupon>),
        (status = 409, description = "Code already exists"),
        (status = 422, description = "Validation failed"),
    ),
    security(("admin_pin" = [])),
    tag = "Coupons"
)]
pub async fn add_coupon(
    State(state): State<AppState>,
    _admin: AdminGate,
    Json(payload): Json<CouponRequest>,
) -> AppResult<Json<ApiResponse<Coupon>>> {
    let coupon = coupon_service::add_coupon(&state.orm, payload).await?;
    Ok(Json(ApiResponse::success("Coupon created", coupon, None)))
}

#[utoipa::path(
    delete,
    path = "/api/coupons/{id}",
    params(("id" = i32, Path, description = "Coupon ID")),
    responses(
        (status = 200, description = "Coupon deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Not Found"),
    ),
    security(("admin_pin" = [])),
    tag = "Coupons"
)]
pub async fn delete_coupon(
    State(state): State<AppState>,
    _admin: AdminGate,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    if !coupon_service::delete_coupon(&state.orm, id).await? {
        return Err(AppError::NotFound);
    }
    Ok(Json(ApiResponse::success(
        "Coupon deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    )))
}
