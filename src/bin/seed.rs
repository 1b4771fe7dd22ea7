use grill_storefront::{
    config::AppConfig,
    db,
    dto::{
        catalog::ItemRequest,
        coupons::CouponRequest,
        settings::{SettingsRequest, ThemeRequest},
    },
    error::AppError,
    models::{Category, Theme},
    services::{catalog_service, coupon_service, settings_service},
};
use sea_orm::DatabaseConnection;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let orm = db::open(&config.database_url).await?;

    let tabs = catalog_service::ensure_default_tabs(&orm).await?;
    let sections = catalog_service::ensure_default_menu_sections(&orm).await?;
    if settings_service::get_settings(&orm).await?.is_none() {
        settings_service::save_settings(
            &orm,
            SettingsRequest {
                biz_name: String::new(),
                wa_number: "+58 412 000 0000".into(),
            },
        )
        .await?;
    }
    if settings_service::get_theme(&orm).await?.is_none() {
        settings_service::save_theme(&orm, ThemeRequest::from(Theme::default())).await?;
    }
    let items = seed_items(&orm).await?;
    seed_coupon(&orm).await?;

    println!("Seed completed. Tabs: {tabs}, sections: {sections}, items: {items}");
    Ok(())
}

async fn seed_items(orm: &DatabaseConnection) -> anyhow::Result<usize> {
    if !catalog_service::list_all_items(orm).await?.is_empty() {
        return Ok(0);
    }
    let promo_tab = catalog_service::list_tabs_by_category(orm, Category::Promo)
        .await?
        .first()
        .map(|t| t.id);
    let combo_tab = catalog_service::list_tabs_by_category(orm, Category::Combo)
        .await?
        .first()
        .map(|t| t.id);

    let samples = [
        (Category::Promo, "2x1 Hamburguesas", 1200, promo_tab, None),
        (Category::Combo, "Combo Parrillero", 2500, combo_tab, None),
        (Category::Menu, "Hamburguesa clásica", 650, None, Some("Hamburguesas")),
        (Category::Menu, "Pepito mixto", 800, None, Some("Pepitos")),
        (Category::Menu, "Refresco", 150, None, Some("Bebidas")),
    ];
    let mut created = 0;
    for (category, name, price, tab_id, section) in samples {
        catalog_service::add_item(
            orm,
            ItemRequest {
                category,
                name: name.into(),
                price,
                description: String::new(),
                img_blob_id: None,
                tab_id,
                menu_section: section.map(Into::into),
            },
        )
        .await?;
        created += 1;
    }
    Ok(created)
}

async fn seed_coupon(orm: &DatabaseConnection) -> anyhow::Result<()> {
    let request = CouponRequest {
        code: "WELCOME10".into(),
        percent: 10,
        amount: 0,
        min_subtotal: 1000,
        expires_at: None,
    };
    match coupon_service::add_coupon(orm, request).await {
        Ok(_) | Err(AppError::DuplicateCode(_)) => Ok(()),
        Err(err) => Err(err.into()),
    }
}
