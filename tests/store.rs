use chrono::Utc;
use grill_storefront::{
    db,
    entity::{Items, items},
    migration::{Migrator, schema_version},
    models::Category,
    services::{catalog_service, coupon_service},
};
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, EntityTrait, PaginatorTrait, Set};
use sea_orm_migration::{MigratorTrait, SchemaManager};

fn file_url(dir: &tempfile::TempDir) -> String {
    format!("sqlite://{}?mode=rwc", dir.path().join("grill.db").display())
}

#[tokio::test]
async fn older_store_upgrades_in_place() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let url = file_url(&dir);

    // A store left behind by a build that stopped at schema version 3.
    let conn = db::create_orm_conn(&url).await?;
    Migrator::up(&conn, Some(3)).await?;
    assert!(!SchemaManager::new(&conn).has_table("coupons").await?);
    for (name, price) in [("Pepito", 800), ("Refresco", 150)] {
        items::ActiveModel {
            id: NotSet,
            category: Set(Category::Menu),
            name: Set(name.into()),
            price: Set(price),
            description: Set(String::new()),
            img_blob_id: Set(None),
            created_at: Set(Utc::now().into()),
            tab_id: Set(None),
            menu_section: Set(Some("Pepitos".into())),
        }
        .insert(&conn)
        .await?;
    }
    conn.close().await?;

    let orm = db::open(&url).await?;
    assert_eq!(schema_version(), 6);
    assert!(Migrator::get_pending_migrations(&orm).await?.is_empty());
    let manager = SchemaManager::new(&orm);
    for table in ["tabs", "menu_sections", "cart", "coupons"] {
        assert!(manager.has_table(table).await?, "{table} missing after upgrade");
    }

    let items = catalog_service::list_all_items(&orm).await?;
    let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Pepito", "Refresco"]);
    assert!(coupon_service::list_coupons(&orm).await?.is_empty());
    orm.close().await?;

    // Opening an up-to-date store again changes nothing.
    let orm = db::open(&url).await?;
    assert_eq!(Items::find().count(&orm).await?, 2);
    Ok(())
}

#[tokio::test]
async fn file_store_keeps_records_between_opens() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let url = file_url(&dir);

    let orm = db::open(&url).await?;
    catalog_service::ensure_default_tabs(&orm).await?;
    let tabs = catalog_service::list_tabs_by_category(&orm, Category::Combo).await?;
    catalog_service::rename_tab(&orm, tabs[0].id, "Familiares").await?;
    orm.close().await?;

    let orm = db::open(&url).await?;
    assert_eq!(catalog_service::ensure_default_tabs(&orm).await?, 0);
    let tabs = catalog_service::list_tabs_by_category(&orm, Category::Combo).await?;
    assert_eq!(tabs[0].name, "Familiares");
    Ok(())
}
