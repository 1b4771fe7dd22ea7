use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};

use crate::{
    cart::{CartView, CouponSnapshot},
    dto::cart::{AddToCartRequest, ApplyCouponRequest},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(view_cart).delete(clear_cart))
        .route("/items", post(add_to_cart))
        .route("/items/{item_id}", delete(remove_from_cart))
        .route("/items/{item_id}/increment", post(increment_line))
        .route("/items/{item_id}/decrement", post(decrement_line))
        .route("/coupon", post(apply_coupon).delete(clear_coupon))
}

fn cart_response(message: &str, view: CartView) -> Json<ApiResponse<CartView>> {
    let meta = Meta::count(view.lines.len());
    Json(ApiResponse::success(message, view, Some(meta)))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart lines and totals", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn view_cart(State(state): State<AppState>) -> AppResult<Json<ApiResponse<CartView>>> {
    let view = state.cart.lock().await.view();
    Ok(cart_response("OK", view))
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart emptied", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn clear_cart(State(state): State<AppState>) -> AppResult<Json<ApiResponse<CartView>>> {
    let view = state.cart.lock().await.clear().await?;
    Ok(cart_response("Cart cleared", view))
}

#[utoipa::path(
    post,
    path = "/api/cart/items",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "One unit added", body = ApiResponse<CartView>),
        (status = 404, description = "Item not found"),
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(payload): Json<AddToCartRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let view = state.cart.lock().await.add_item(payload.item_id).await?;
    Ok(cart_response("Added to cart", view))
}

#[utoipa::path(
    delete,
    path = "/api/cart/items/{item_id}",
    params(("item_id" = i32, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Line removed", body = ApiResponse<CartView>),
        (status = 404, description = "No such line"),
    ),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let mut cart = state.cart.lock().await;
    if !cart.remove(item_id).await? {
        return Err(AppError::NotFound);
    }
    Ok(cart_response("Removed from cart", cart.view()))
}

#[utoipa::path(
    post,
    path = "/api/cart/items/{item_id}/increment",
    params(("item_id" = i32, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Quantity increased", body = ApiResponse<CartView>),
        (status = 404, description = "No such line"),
    ),
    tag = "Cart"
)]
pub async fn increment_line(
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let mut cart = state.cart.lock().await;
    if !cart.increment(item_id).await? {
        return Err(AppError::NotFound);
    }
    Ok(cart_response("OK", cart.view()))
}

#[utoipa::path(
    post,
    path = "/api/cart/items/{item_id}/decrement",
    params(("item_id" = i32, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Quantity decreased, line dropped at zero", body = ApiResponse<CartView>),
        (status = 404, description = "No such line"),
    ),
    tag = "Cart"
)]
pub async fn decrement_line(
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let mut cart = state.cart.lock().await;
    if !cart.decrement(item_id).await? {
        return Err(AppError::NotFound);
    }
    Ok(cart_response("OK", cart.view()))
}

#[utoipa::path(
    post,
    path = "/api/cart/coupon",
    request_body = ApplyCouponRequest,
    responses(
        (status = 200, description = "Coupon applied", body = ApiResponse<CouponSnapshot>),
        (status = 400, description = "Coupon rejected"),
    ),
    tag = "Cart"
)]
pub async fn apply_coupon(
    State(state): State<AppState>,
    Json(payload): Json<ApplyCouponRequest>,
) -> AppResult<Json<ApiResponse<CouponSnapshot>>> {
    let snapshot = state.cart.lock().await.apply_coupon(&payload.code).await?;
    Ok(Json(ApiResponse::success(
        "Coupon applied",
        snapshot,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/cart/coupon",
    responses(
        (status = 200, description = "Coupon removed", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn clear_coupon(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let view = state.cart.lock().await.clear_coupon().await?;
    Ok(cart_response("Coupon removed", view))
}
