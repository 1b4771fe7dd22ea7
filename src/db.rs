use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait};
use sea_orm_migration::MigratorTrait;

use crate::{
    entity::{Blobs, Cart, Coupons, Items, MenuSections, Settings, Tabs, Theme},
    error::AppResult,
    migration::{Migrator, schema_version},
};

/// Create a SeaORM connection without touching the schema.
pub async fn create_orm_conn(database_url: &str) -> AppResult<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    // Every pooled connection to an in-memory SQLite URL is its own database.
    if database_url.contains(":memory:") || database_url.contains("mode=memory") {
        options.max_connections(1).min_connections(1);
    }
    let conn = Database::connect(options).await?;
    Ok(conn)
}

/// Apply every pending schema step in version order.
pub async fn run_migrations(conn: &DatabaseConnection) -> AppResult<()> {
    Migrator::up(conn, None).await?;
    tracing::debug!(version = schema_version(), "store schema up to date");
    Ok(())
}

/// Open the local store: connect, then create or upgrade the schema.
pub async fn open(database_url: &str) -> AppResult<DatabaseConnection> {
    let conn = create_orm_conn(database_url).await?;
    run_migrations(&conn).await?;
    Ok(conn)
}

/// The record collections of the local store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Items,
    Tabs,
    MenuSections,
    Theme,
    Settings,
    Cart,
    Coupons,
    Blobs,
}

impl Collection {
    pub const ALL: [Collection; 8] = [
        Collection::Items,
        Collection::Tabs,
        Collection::MenuSections,
        Collection::Cart,
        Collection::Coupons,
        Collection::Blobs,
        Collection::Theme,
        Collection::Settings,
    ];
}

/// Remove every record of one collection.
pub async fn clear<C: ConnectionTrait>(db: &C, collection: Collection) -> AppResult<u64> {
    let result = match collection {
        Collection::Items => Items::delete_many().exec(db).await?,
        Collection::Tabs => Tabs::delete_many().exec(db).await?,
        Collection::MenuSections => MenuSections::delete_many().exec(db).await?,
        Collection::Theme => Theme::delete_many().exec(db).await?,
        Collection::Settings => Settings::delete_many().exec(db).await?,
        Collection::Cart => Cart::delete_many().exec(db).await?,
        Collection::Coupons => Coupons::delete_many().exec(db).await?,
        Collection::Blobs => Blobs::delete_many().exec(db).await?,
    };
    Ok(result.rows_affected)
}

/// Remove every record of every collection. Run it inside a transaction
/// when the caller needs all-or-nothing.
pub async fn clear_all<C: ConnectionTrait>(db: &C) -> AppResult<()> {
    for collection in Collection::ALL {
        let removed = clear(db, collection).await?;
        tracing::debug!(?collection, removed, "collection cleared");
    }
    Ok(())
}
