use std::collections::HashSet;

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

use crate::{
    dto::settings::{SettingsRequest, ThemeRequest},
    entity::{
        Blobs, Items, Settings as SettingsRows, Theme as ThemeRows, blobs, items, settings, theme,
    },
    error::{AppError, AppResult},
    models::{DEFAULT_BIZ_NAME, Settings, StoredBlob, Theme},
};

pub async fn get_theme<C: ConnectionTrait>(db: &C) -> AppResult<Option<Theme>> {
    let theme = ThemeRows::find_by_id(theme::KEY)
        .one(db)
        .await?
        .map(|model| Theme {
            primary: model.primary,
            secondary: model.secondary,
            bg_blob_id: model.bg_blob_id,
        });
    Ok(theme)
}

pub async fn save_theme<C: ConnectionTrait>(db: &C, payload: ThemeRequest) -> AppResult<Theme> {
    let primary = payload.primary.trim().to_string();
    let secondary = payload.secondary.trim().to_string();
    if primary.is_empty() || secondary.is_empty() {
        return Err(AppError::Validation("theme colors are required".into()));
    }
    let bg_blob_id = payload
        .bg_blob_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty());

    let active = theme::ActiveModel {
        id: Set(theme::KEY.to_string()),
        primary: Set(primary.clone()),
        secondary: Set(secondary.clone()),
        bg_blob_id: Set(bg_blob_id.clone()),
    };
    ThemeRows::insert(active)
        .on_conflict(
            OnConflict::column(theme::Column::Id)
                .update_columns([
                    theme::Column::Primary,
                    theme::Column::Secondary,
                    theme::Column::BgBlobId,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    tracing::info!(primary = %primary, secondary = %secondary, "theme saved");
    Ok(Theme {
        primary,
        secondary,
        bg_blob_id,
    })
}

pub async fn get_settings<C: ConnectionTrait>(db: &C) -> AppResult<Option<Settings>> {
    let settings = SettingsRows::find_by_id(settings::KEY)
        .one(db)
        .await?
        .map(|model| Settings {
            biz_name: model.biz_name,
            wa_number: model.wa_number,
        });
    Ok(settings)
}

/// A blank business name falls back to the default one.
pub async fn save_settings<C: ConnectionTrait>(
    db: &C,
    payload: SettingsRequest,
) -> AppResult<Settings> {
    let biz_name = match payload.biz_name.trim() {
        "" => DEFAULT_BIZ_NAME.to_string(),
        name => name.to_string(),
    };
    let wa_number = payload.wa_number.trim().to_string();

    let active = settings::ActiveModel {
        id: Set(settings::KEY.to_string()),
        biz_name: Set(biz_name.clone()),
        wa_number: Set(wa_number.clone()),
    };
    SettingsRows::insert(active)
        .on_conflict(
            OnConflict::column(settings::Column::Id)
                .update_columns([settings::Column::BizName, settings::Column::WaNumber])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    tracing::info!(biz_name = %biz_name, "settings saved");
    Ok(Settings {
        biz_name,
        wa_number,
    })
}

/// Insert or replace a blob by id.
pub async fn put_blob<C: ConnectionTrait>(
    db: &C,
    id: &str,
    mime: &str,
    data: Vec<u8>,
) -> AppResult<()> {
    let size = data.len();
    let active = blobs::ActiveModel {
        id: Set(id.to_string()),
        mime: Set(mime.to_string()),
        data: Set(data),
    };
    Blobs::insert(active)
        .on_conflict(
            OnConflict::column(blobs::Column::Id)
                .update_columns([blobs::Column::Mime, blobs::Column::Data])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    tracing::debug!(blob_id = %id, size, "blob stored");
    Ok(())
}

pub async fn get_blob<C: ConnectionTrait>(db: &C, id: &str) -> AppResult<Option<StoredBlob>> {
    let blob = Blobs::find_by_id(id).one(db).await?.map(blob_from_entity);
    Ok(blob)
}

pub async fn list_blobs<C: ConnectionTrait>(db: &C) -> AppResult<Vec<StoredBlob>> {
    let blobs = Blobs::find()
        .order_by_asc(blobs::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(blob_from_entity)
        .collect();
    Ok(blobs)
}

/// Delete every blob that no item and not the theme points at. Deleting an
/// item or replacing a background never does this on its own.
pub async fn collect_unreferenced_blobs<C>(db: &C) -> AppResult<Vec<String>>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let mut referenced: HashSet<String> = Items::find()
        .select_only()
        .column(items::Column::ImgBlobId)
        .filter(items::Column::ImgBlobId.is_not_null())
        .into_tuple::<Option<String>>()
        .all(&txn)
        .await?
        .into_iter()
        .flatten()
        .collect();
    if let Some(bg) = get_theme(&txn).await?.and_then(|t| t.bg_blob_id) {
        referenced.insert(bg);
    }

    let removed: Vec<String> = Blobs::find()
        .select_only()
        .column(blobs::Column::Id)
        .into_tuple::<String>()
        .all(&txn)
        .await?
        .into_iter()
        .filter(|id| !referenced.contains(id))
        .collect();

    if !removed.is_empty() {
        Blobs::delete_many()
            .filter(blobs::Column::Id.is_in(removed.iter().cloned()))
            .exec(&txn)
            .await?;
    }
    txn.commit().await?;

    tracing::info!(removed = removed.len(), "unreferenced blobs collected");
    Ok(removed)
}

fn blob_from_entity(model: blobs::Model) -> StoredBlob {
    StoredBlob {
        id: model.id,
        mime: model.mime,
        data: model.data,
    }
}
