use std::env;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://grill.db?mode=rwc";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Static PIN for admin routes. `None` leaves the gate open.
    pub admin_pin: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let admin_pin = env::var("ADMIN_PIN")
            .ok()
            .map(|pin| pin.trim().to_string())
            .filter(|pin| !pin.is_empty());
        Ok(Self {
            port,
            database_url,
            host,
            admin_pin,
        })
    }
}
