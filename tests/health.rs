use axum::extract::State;
use grill_storefront::{
    config::{AppConfig, DEFAULT_DATABASE_URL},
    db,
    routes::health::health_check,
    state::AppState,
};

#[tokio::test]
async fn health_check_reports_store_and_schema() -> anyhow::Result<()> {
    let orm = db::open("sqlite::memory:").await?;
    let config = AppConfig {
        database_url: DEFAULT_DATABASE_URL.to_string(),
        host: "127.0.0.1".into(),
        port: 0,
        admin_pin: None,
    };
    let state = AppState::new(orm, config).await?;

    let response = health_check(State(state)).await?;
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
    assert_eq!(data.schema_version, 6);
    assert_eq!(data.cart_lines, 0);
    Ok(())
}
