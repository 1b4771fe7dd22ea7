use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod coupons;
pub mod doc;
pub mod health;
pub mod media;
pub mod orders;
pub mod params;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/catalog", catalog::router())
        .nest("/coupons", coupons::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::route())
        .nest("/admin", admin::router())
        .nest("/media", media::router())
}
