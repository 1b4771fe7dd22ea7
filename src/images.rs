//! Image ingestion: decode an upload, shrink it, store it as a JPEG blob.

use std::io::Cursor;

use chrono::Utc;
use image::{codecs::jpeg::JpegEncoder, imageops::FilterType};
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::{
    dto::settings::IngestedImage,
    error::{AppError, AppResult},
    services::settings_service,
};

/// Longest side after downscaling, in pixels.
pub const MAX_DIMENSION: u32 = 1200;

const JPEG_QUALITY: u8 = 72;
const STORED_MIME: &str = "image/jpeg";

/// Decode, scale so the longest side fits `MAX_DIMENSION` (never up), and
/// re-encode as JPEG.
pub fn downscale(data: &[u8]) -> AppResult<Vec<u8>> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::BadRequest(format!("invalid image: {e}")))?;

    let img = if img.width().max(img.height()) > MAX_DIMENSION {
        img.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Triangle)
    } else {
        img
    };

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img
            .write_with_encoder(encoder)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("image compression failed: {e}")))?;
    }
    Ok(buffer)
}

/// `{prefix}_{unix_millis}_{5 random chars}`; the prefix keeps only
/// ASCII alphanumerics, `-` and `_`.
pub fn blob_id(prefix: &str) -> String {
    let prefix: String = prefix
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    let prefix = if prefix.is_empty() { "img" } else { &prefix };
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(5).collect();
    format!("{prefix}_{}_{suffix}", Utc::now().timestamp_millis())
}

pub fn blob_url(id: &str) -> String {
    format!("/api/media/blobs/{id}")
}

/// Downscale and store an upload; the id goes into an item or the theme.
pub async fn ingest<C: ConnectionTrait>(
    db: &C,
    data: Vec<u8>,
    prefix: &str,
) -> AppResult<IngestedImage> {
    if data.is_empty() {
        return Err(AppError::BadRequest("empty image".into()));
    }
    let original = data.len();
    let jpeg = tokio::task::spawn_blocking(move || downscale(&data))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    let id = blob_id(prefix);
    let size = jpeg.len();
    settings_service::put_blob(db, &id, STORED_MIME, jpeg).await?;

    tracing::info!(blob_id = %id, original, size, "image ingested");
    Ok(IngestedImage {
        url: blob_url(&id),
        id,
    })
}
