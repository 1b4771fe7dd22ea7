use axum::{Json, extract::State};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    migration::schema_version,
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthData {
    pub status: String,
    pub schema_version: usize,
    pub cart_lines: usize,
}

/// Pings the store and reports the schema it runs on.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Store reachable", body = ApiResponse<HealthData>),
        (status = 500, description = "Store unreachable"),
    ),
    tag = "Health"
)]
pub async fn health_check(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<HealthData>>> {
    state.orm.ping().await?;
    let cart_lines = state.cart.lock().await.state().lines.len();
    let data = HealthData {
        status: "ok".to_string(),
        schema_version: schema_version(),
        cart_lines,
    };
    Ok(Json(ApiResponse::success(
        "Health check",
        data,
        Some(Meta::empty()),
    )))
}
