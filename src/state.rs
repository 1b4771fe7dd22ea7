use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio::sync::Mutex;

use crate::{config::AppConfig, error::AppResult, services::cart_service::CartSession};

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    /// The single customer cart, restored from the store at startup.
    pub cart: Arc<Mutex<CartSession>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn new(orm: DatabaseConnection, config: AppConfig) -> AppResult<Self> {
        let cart = CartSession::load(orm.clone()).await?;
        Ok(Self {
            orm,
            cart: Arc::new(Mutex::new(cart)),
            config: Arc::new(config),
        })
    }
}
