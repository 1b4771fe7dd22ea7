use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::cart::CheckoutLink,
    error::AppResult,
    response::{ApiResponse, Meta},
    services::{order_service, settings_service},
    state::AppState,
};

pub fn route() -> Router<AppState> {
    Router::new().route("/checkout", get(checkout))
}

#[utoipa::path(
    get,
    path = "/api/orders/checkout",
    responses(
        (status = 200, description = "Order text and messaging link", body = ApiResponse<CheckoutLink>),
        (status = 422, description = "Empty cart or no number configured"),
    ),
    tag = "Orders"
)]
pub async fn checkout(State(state): State<AppState>) -> AppResult<Json<ApiResponse<CheckoutLink>>> {
    let settings = settings_service::get_settings(&state.orm)
        .await?
        .unwrap_or_default();
    let cart = state.cart.lock().await.state().clone();
    let link = order_service::checkout_link(&settings, &cart)?;

    tracing::info!(lines = cart.lines.len(), total = cart.total(), "checkout link built");
    Ok(Json(ApiResponse::success(
        "Checkout",
        link,
        Some(Meta::empty()),
    )))
}
