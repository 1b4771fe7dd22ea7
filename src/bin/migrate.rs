use grill_storefront::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    migration::schema_version,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;
    println!("Migrations applied, schema version {}", schema_version());
    Ok(())
}
