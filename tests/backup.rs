use grill_storefront::{
    db,
    dto::{
        backup::{BackupBlob, BackupDocument},
        catalog::ItemRequest,
        coupons::CouponRequest,
        settings::{SettingsRequest, ThemeRequest},
    },
    error::AppError,
    models::{Category, Coupon},
    services::{
        backup_service,
        cart_service::{self, CartSession},
        catalog_service, coupon_service, settings_service,
    },
};
use sea_orm::DatabaseConnection;

async fn store() -> anyhow::Result<DatabaseConnection> {
    Ok(db::open("sqlite::memory:").await?)
}

const PHOTO: &[u8] = &[0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10, 0x4a, 0x46, 0x00, 0xff, 0xd9];
const BACKGROUND: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00];

/// A store with a renamed promo tab holding one item, a menu item, two
/// coupons, theme, settings, blobs and a cart with a coupon applied.
async fn populated_store() -> anyhow::Result<DatabaseConnection> {
    let orm = store().await?;
    let tabs = catalog_service::list_tabs_by_category(&orm, Category::Promo).await?;
    catalog_service::rename_tab(&orm, tabs[2].id, "Especiales").await?;

    settings_service::put_blob(&orm, "img_1_abcde", "image/jpeg", PHOTO.to_vec()).await?;
    settings_service::put_blob(&orm, "bg_1_fghij", "image/png", BACKGROUND.to_vec()).await?;

    let promo = catalog_service::add_item(
        &orm,
        ItemRequest {
            category: Category::Promo,
            name: "Parrilla para dos".into(),
            price: 3_500,
            description: "Con papas".into(),
            img_blob_id: Some("img_1_abcde".into()),
            tab_id: Some(tabs[2].id),
            menu_section: None,
        },
    )
    .await?;
    catalog_service::add_item(
        &orm,
        ItemRequest {
            category: Category::Menu,
            name: "Pepito".into(),
            price: 800,
            description: String::new(),
            img_blob_id: None,
            tab_id: None,
            menu_section: Some("Pepitos".into()),
        },
    )
    .await?;

    coupon_service::add_coupon(
        &orm,
        CouponRequest {
            code: "SAVE10".into(),
            percent: 10,
            amount: 0,
            min_subtotal: 0,
            expires_at: None,
        },
    )
    .await?;
    coupon_service::add_coupon(
        &orm,
        CouponRequest {
            code: "FLAT2".into(),
            percent: 0,
            amount: 200,
            min_subtotal: 1_000,
            expires_at: None,
        },
    )
    .await?;

    settings_service::save_theme(
        &orm,
        ThemeRequest {
            primary: "#aa0000".into(),
            secondary: "#111111".into(),
            bg_blob_id: Some("bg_1_fghij".into()),
        },
    )
    .await?;
    settings_service::save_settings(
        &orm,
        SettingsRequest {
            biz_name: "Grill Test".into(),
            wa_number: "584125550101".into(),
        },
    )
    .await?;

    let mut cart = CartSession::load(orm.clone()).await?;
    cart.add_item(promo.id).await?;
    cart.apply_coupon("save10").await?;
    Ok(orm)
}

#[tokio::test]
async fn export_then_import_restores_every_collection() -> anyhow::Result<()> {
    let source = populated_store().await?;
    let exported = backup_service::export(&source).await?;
    assert_eq!(exported.version, "v1");
    assert!(exported.tabs.menu.is_empty());
    assert_eq!(exported.blobs.len(), 2);

    let json = serde_json::to_value(&exported)?;
    assert!(json.get("menuSections").is_some());
    assert!(json["blobs"][0].get("dataUrl").is_some());

    let target = store().await?;
    let doc = backup_service::parse_document(json)?;
    let summary = backup_service::import(&target, doc).await?;
    assert_eq!(summary.items, 2);
    assert_eq!(summary.coupons, 2);
    assert_eq!(summary.blobs, 2);
    assert_eq!(summary.tabs, 20);
    assert_eq!(summary.menu_sections, 5);
    assert!(summary.cart_restored);
    assert!(summary.skipped_coupons.is_empty());

    let restored = backup_service::export(&target).await?;
    let names = |doc: &BackupDocument| {
        let mut names: Vec<(String, i64, &str)> = doc
            .items
            .iter()
            .map(|i| (i.name.clone(), i.price, i.category.as_str()))
            .collect();
        names.sort();
        names
    };
    assert_eq!(names(&restored), names(&exported));
    let codes = |coupons: &[Coupon]| {
        let mut codes: Vec<(String, i32, i64, i64)> = coupons
            .iter()
            .map(|c| (c.code.clone(), c.percent, c.amount, c.min_subtotal))
            .collect();
        codes.sort();
        codes
    };
    assert_eq!(codes(&restored.coupons), codes(&exported.coupons));
    assert_eq!(restored.theme, exported.theme);
    assert_eq!(restored.settings, exported.settings);
    assert_eq!(restored.cart, exported.cart);
    let section_names: Vec<&str> = restored.menu_sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(section_names, catalog_service::DEFAULT_MENU_SECTIONS);

    let cart = cart_service::load_cart(&target).await?;
    assert_eq!(cart.coupon.map(|c| c.code).as_deref(), Some("SAVE10"));
    Ok(())
}

#[tokio::test]
async fn blob_bytes_survive_the_round_trip() -> anyhow::Result<()> {
    let source = populated_store().await?;
    let exported = backup_service::export(&source).await?;

    let target = store().await?;
    backup_service::import(&target, exported).await?;

    let photo = settings_service::get_blob(&target, "img_1_abcde").await?;
    let photo = photo.expect("photo blob restored");
    assert_eq!(photo.data, PHOTO);
    assert_eq!(photo.mime, "image/jpeg");
    let background = settings_service::get_blob(&target, "bg_1_fghij").await?;
    assert_eq!(background.map(|b| b.data), Some(BACKGROUND.to_vec()));
    Ok(())
}

#[tokio::test]
async fn tab_names_and_item_links_survive_import() -> anyhow::Result<()> {
    let source = populated_store().await?;
    let mut exported = backup_service::export(&source).await?;
    // Ids from another device never line up with local ones.
    for tab in exported.tabs.promo.iter_mut().chain(exported.tabs.combo.iter_mut()) {
        tab.id += 1_000;
    }
    for item in &mut exported.items {
        item.tab_id = item.tab_id.map(|id| id + 1_000);
    }

    let target = store().await?;
    backup_service::import(&target, exported).await?;

    let tabs = catalog_service::list_tabs_by_category(&target, Category::Promo).await?;
    assert_eq!(tabs.len(), 10);
    assert_eq!(tabs[2].name, "Especiales");
    assert_eq!(tabs[0].name, "Promo 1");

    let promo_items = catalog_service::list_items_by_category(&target, Category::Promo).await?;
    assert_eq!(promo_items.len(), 1);
    assert_eq!(promo_items[0].tab_id, Some(tabs[2].id));
    assert_eq!(promo_items[0].img_blob_id.as_deref(), Some("img_1_abcde"));
    Ok(())
}

#[tokio::test]
async fn dangling_tab_reference_falls_back_to_first_tab() -> anyhow::Result<()> {
    let source = populated_store().await?;
    let mut exported = backup_service::export(&source).await?;
    exported.tabs.promo.clear();
    for item in &mut exported.items {
        if item.category == Category::Promo {
            item.tab_id = Some(424_242);
        }
    }

    let target = store().await?;
    let summary = backup_service::import(&target, exported).await?;
    assert_eq!(summary.tabs, 10);

    let tabs = catalog_service::list_tabs_by_category(&target, Category::Promo).await?;
    assert_eq!(tabs[0].name, "Promo 1");
    let promo_items = catalog_service::list_items_by_category(&target, Category::Promo).await?;
    assert_eq!(promo_items[0].tab_id, Some(tabs[0].id));
    Ok(())
}

#[tokio::test]
async fn duplicate_coupons_in_a_backup_are_skipped() -> anyhow::Result<()> {
    let source = populated_store().await?;
    let mut exported = backup_service::export(&source).await?;
    let copy = exported.coupons[0].clone();
    exported.coupons.push(copy);

    let target = store().await?;
    let summary = backup_service::import(&target, exported).await?;
    assert_eq!(summary.coupons, 2);
    assert_eq!(summary.skipped_coupons.len(), 1);
    assert_eq!(coupon_service::list_coupons(&target).await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn invalid_backups_leave_the_store_untouched() -> anyhow::Result<()> {
    let orm = populated_store().await?;
    let before = backup_service::export(&orm).await?;

    let wrong_version = serde_json::json!({ "version": "v2", "items": [] });
    assert!(matches!(
        backup_service::parse_document(wrong_version),
        Err(AppError::InvalidBackup(_))
    ));
    let no_version = serde_json::json!({ "items": [] });
    assert!(matches!(
        backup_service::parse_document(no_version),
        Err(AppError::InvalidBackup(_))
    ));
    let bad_shape = serde_json::json!({ "version": "v1", "items": "nope" });
    assert!(matches!(
        backup_service::parse_document(bad_shape),
        Err(AppError::InvalidBackup(_))
    ));

    let mut broken = before.clone();
    broken.items.clear();
    broken.blobs.push(BackupBlob {
        id: "broken".into(),
        data_url: "data:image/png;base64,@@not base64@@".into(),
    });
    let result = backup_service::import(&orm, broken).await;
    assert!(matches!(result, Err(AppError::InvalidBackup(_))));

    let after = backup_service::export(&orm).await?;
    assert_eq!(after.items.len(), before.items.len());
    assert_eq!(after.coupons.len(), before.coupons.len());
    assert_eq!(after.blobs.len(), before.blobs.len());
    assert_eq!(after.cart, before.cart);
    Ok(())
}

#[tokio::test]
async fn unreferenced_blobs_are_collected() -> anyhow::Result<()> {
    let orm = populated_store().await?;
    settings_service::put_blob(&orm, "orphan", "image/jpeg", vec![1, 2, 3]).await?;

    let removed = settings_service::collect_unreferenced_blobs(&orm).await?;
    assert_eq!(removed, vec!["orphan".to_string()]);
    assert!(settings_service::get_blob(&orm, "orphan").await?.is_none());
    assert!(settings_service::get_blob(&orm, "img_1_abcde").await?.is_some());
    assert!(settings_service::get_blob(&orm, "bg_1_fghij").await?.is_some());

    // Deleting the item orphans its photo; only the next pass removes it.
    let promo = catalog_service::list_items_by_category(&orm, Category::Promo).await?;
    catalog_service::delete_item(&orm, promo[0].id).await?;
    assert!(settings_service::get_blob(&orm, "img_1_abcde").await?.is_some());
    let removed = settings_service::collect_unreferenced_blobs(&orm).await?;
    assert_eq!(removed, vec!["img_1_abcde".to_string()]);
    Ok(())
}

#[test]
fn data_urls_carry_mime_and_bytes() -> anyhow::Result<()> {
    let url = backup_service::encode_data_url("image/png", BACKGROUND);
    assert!(url.starts_with("data:image/png;base64,"));
    let (mime, data) = backup_service::decode_data_url(&url)?;
    assert_eq!(mime, "image/png");
    assert_eq!(data, BACKGROUND);

    assert!(backup_service::decode_data_url("image/png;base64,AAAA").is_err());
    assert!(backup_service::decode_data_url("data:image/png,AAAA").is_err());
    Ok(())
}

#[tokio::test]
async fn export_reads_without_seeding() -> anyhow::Result<()> {
    let orm = store().await?;
    let exported = backup_service::export(&orm).await?;
    assert!(exported.tabs.promo.is_empty());
    assert!(exported.tabs.combo.is_empty());
    assert!(exported.menu_sections.is_empty());
    assert!(exported.cart.is_none());

    let again = backup_service::export(&orm).await?;
    assert!(again.tabs.promo.is_empty());
    assert!(again.menu_sections.is_empty());
    Ok(())
}
