use std::collections::HashMap;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use sea_orm::{ConnectionTrait, TransactionTrait};

use crate::{
    db,
    dto::backup::{BACKUP_VERSION, BackupBlob, BackupDocument, BackupTabs, ImportSummary},
    error::{AppError, AppResult},
    models::{Category, Item, Tab},
    services::{cart_service, catalog_service, coupon_service, settings_service},
};

/// Snapshot every collection into a portable document. Blob bytes travel
/// as base64 data URLs. Everything is read inside one transaction and
/// nothing is seeded, so the document is the store as it stands.
pub async fn export<C>(db: &C) -> AppResult<BackupDocument>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;
    let items = catalog_service::list_all_items(&txn).await?;
    let tabs = BackupTabs {
        promo: catalog_service::stored_tabs(&txn, Category::Promo).await?,
        combo: catalog_service::stored_tabs(&txn, Category::Combo).await?,
        menu: Vec::new(),
    };
    let menu_sections = catalog_service::stored_menu_sections(&txn).await?;
    let theme = settings_service::get_theme(&txn).await?;
    let settings = settings_service::get_settings(&txn).await?;
    let coupons = coupon_service::list_coupons(&txn).await?;
    let cart = cart_service::find_cart(&txn).await?;
    let blobs = settings_service::list_blobs(&txn)
        .await?
        .into_iter()
        .map(|blob| BackupBlob {
            data_url: encode_data_url(&blob.mime, &blob.data),
            id: blob.id,
        })
        .collect::<Vec<_>>();
    txn.commit().await?;

    tracing::info!(
        items = items.len(),
        coupons = coupons.len(),
        blobs = blobs.len(),
        "backup exported"
    );
    Ok(BackupDocument {
        version: BACKUP_VERSION.to_string(),
        items,
        tabs,
        menu_sections,
        theme,
        settings,
        coupons,
        cart,
        blobs,
    })
}

/// Check the version marker first, then the shape.
pub fn parse_document(value: serde_json::Value) -> AppResult<BackupDocument> {
    match value.get("version").and_then(|v| v.as_str()) {
        Some(BACKUP_VERSION) => {}
        Some(other) => {
            return Err(AppError::InvalidBackup(format!(
                "unsupported version {other}"
            )));
        }
        None => return Err(AppError::InvalidBackup("missing version".into())),
    }
    serde_json::from_value(value).map_err(|err| AppError::InvalidBackup(err.to_string()))
}

/// Replace the whole store with the document's contents, all or nothing.
pub async fn import<C>(db: &C, doc: BackupDocument) -> AppResult<ImportSummary>
where
    C: ConnectionTrait + TransactionTrait,
{
    if doc.version != BACKUP_VERSION {
        return Err(AppError::InvalidBackup(format!(
            "unsupported version {}",
            doc.version
        )));
    }
    // Decode everything up front so a bad payload never reaches the clear.
    let blobs = doc
        .blobs
        .iter()
        .map(|blob| {
            decode_data_url(&blob.data_url).map(|(mime, data)| (blob.id.as_str(), mime, data))
        })
        .collect::<AppResult<Vec<_>>>()?;

    let mut summary = ImportSummary::default();
    let txn = db.begin().await?;
    db::clear_all(&txn).await?;

    for (id, mime, data) in blobs {
        settings_service::put_blob(&txn, id, &mime, data).await?;
        summary.blobs += 1;
    }

    let mut tab_ids = HashMap::new();
    for (category, tabs) in [
        (Category::Promo, &doc.tabs.promo),
        (Category::Combo, &doc.tabs.combo),
    ] {
        summary.tabs += restore_tabs(&txn, category, tabs, &mut tab_ids).await?;
    }
    catalog_service::ensure_default_tabs(&txn).await?;
    let mut first_tabs = HashMap::new();
    for category in [Category::Promo, Category::Combo] {
        if let Some(tab) = catalog_service::list_tabs_by_category(&txn, category)
            .await?
            .first()
        {
            first_tabs.insert(category, tab.id);
        }
    }

    let mut sections = doc.menu_sections.clone();
    sections.sort_by_key(|s| (s.order, s.id));
    for section in &sections {
        catalog_service::insert_menu_section(&txn, &section.name, section.order, section.enabled)
            .await?;
        summary.menu_sections += 1;
    }

    if let Some(theme) = doc.theme {
        settings_service::save_theme(&txn, theme.into()).await?;
    }
    if let Some(settings) = doc.settings {
        settings_service::save_settings(&txn, settings.into()).await?;
    }

    for coupon in doc.coupons {
        let code = coupon.code.clone();
        let savepoint = txn.begin().await?;
        match coupon_service::add_coupon(&savepoint, coupon.into()).await {
            Ok(_) => {
                savepoint.commit().await?;
                summary.coupons += 1;
            }
            Err(err) => {
                savepoint.rollback().await?;
                tracing::warn!(error = %err, code = %code, "coupon skipped during import");
                summary.skipped_coupons.push(code);
            }
        }
    }

    if let Some(cart) = doc.cart {
        cart_service::save_cart(&txn, &cart).await?;
        summary.cart_restored = true;
    }

    for item in doc.items {
        let item = relink_item(item, &tab_ids, &first_tabs);
        catalog_service::insert_item_record(&txn, item).await?;
        summary.items += 1;
    }

    txn.commit().await?;
    tracing::info!(
        items = summary.items,
        tabs = summary.tabs,
        coupons = summary.coupons,
        skipped = summary.skipped_coupons.len(),
        blobs = summary.blobs,
        "backup imported"
    );
    Ok(summary)
}

async fn restore_tabs<C: ConnectionTrait>(
    db: &C,
    category: Category,
    tabs: &[Tab],
    tab_ids: &mut HashMap<i32, i32>,
) -> AppResult<usize> {
    let mut ordered: Vec<&Tab> = tabs.iter().collect();
    ordered.sort_by_key(|t| (t.order, t.id));
    for (idx, tab) in ordered.iter().enumerate() {
        let name = match tab.name.trim() {
            "" => format!("{} {}", category_label(category), idx + 1),
            name => name.to_string(),
        };
        let restored = catalog_service::insert_tab(db, category, &name, idx as i32 + 1).await?;
        tab_ids.insert(tab.id, restored.id);
    }
    Ok(ordered.len())
}

fn category_label(category: Category) -> &'static str {
    catalog_service::TAB_DEFAULTS
        .iter()
        .find(|(c, _, _)| *c == category)
        .map(|(_, _, prefix)| *prefix)
        .unwrap_or("Tab")
}

/// Point a tabbed item at its restored tab, or the category's first tab
/// when the old id cannot be resolved. Menu items never carry a tab.
fn relink_item(
    mut item: Item,
    tab_ids: &HashMap<i32, i32>,
    first_tabs: &HashMap<Category, i32>,
) -> Item {
    if item.category.uses_tabs() {
        item.tab_id = item
            .tab_id
            .and_then(|old| tab_ids.get(&old).copied())
            .or_else(|| first_tabs.get(&item.category).copied());
        item.menu_section = None;
    } else {
        item.tab_id = None;
    }
    item
}

/// `data:<mime>;base64,<payload>`
pub fn encode_data_url(mime: &str, data: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(data))
}

pub fn decode_data_url(data_url: &str) -> AppResult<(String, Vec<u8>)> {
    let invalid = || AppError::InvalidBackup("malformed blob data URL".into());
    let rest = data_url.strip_prefix("data:").ok_or_else(invalid)?;
    let (meta, payload) = rest.split_once(',').ok_or_else(invalid)?;
    let mime = meta.strip_suffix(";base64").ok_or_else(invalid)?;
    let mime = if mime.is_empty() {
        "application/octet-stream"
    } else {
        mime
    };
    let data = STANDARD
        .decode(payload.trim())
        .map_err(|err| AppError::InvalidBackup(format!("blob payload: {err}")))?;
    Ok((mime.to_string(), data))
}
