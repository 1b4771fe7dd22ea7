use std::io::Cursor;

use grill_storefront::{db, error::AppError, images, services::settings_service};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

fn png(width: u32, height: u32) -> anyhow::Result<Vec<u8>> {
    let img = RgbImage::from_pixel(width, height, Rgb([200, 80, 20]));
    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(img).write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
    Ok(buffer)
}

#[test]
fn large_images_shrink_to_the_longest_side() -> anyhow::Result<()> {
    let jpeg = images::downscale(&png(2400, 1200)?)?;
    let decoded = image::load_from_memory(&jpeg)?;
    assert_eq!((decoded.width(), decoded.height()), (1200, 600));
    assert_eq!(image::guess_format(&jpeg)?, ImageFormat::Jpeg);

    let tall = image::load_from_memory(&images::downscale(&png(300, 3000)?)?)?;
    assert_eq!((tall.width(), tall.height()), (120, 1200));
    Ok(())
}

#[test]
fn small_images_are_not_upscaled() -> anyhow::Result<()> {
    let jpeg = images::downscale(&png(640, 480)?)?;
    let decoded = image::load_from_memory(&jpeg)?;
    assert_eq!((decoded.width(), decoded.height()), (640, 480));
    Ok(())
}

#[test]
fn garbage_is_rejected() {
    let result = images::downscale(b"definitely not an image");
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[test]
fn blob_ids_keep_a_clean_prefix() {
    let id = images::blob_id("item photo/1");
    let parts: Vec<&str> = id.split('_').collect();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "itemphoto1");
    assert!(parts[1].parse::<i64>().is_ok());
    assert_eq!(parts[2].len(), 5);

    assert!(images::blob_id("").starts_with("img_"));
    assert_ne!(images::blob_id("bg"), images::blob_id("bg"));
}

#[tokio::test]
async fn ingest_stores_a_jpeg_blob() -> anyhow::Result<()> {
    let orm = db::open("sqlite::memory:").await?;

    let stored = images::ingest(&orm, png(1600, 800)?, "bg").await?;
    assert!(stored.id.starts_with("bg_"));
    assert_eq!(stored.url, format!("/api/media/blobs/{}", stored.id));

    let blob = settings_service::get_blob(&orm, &stored.id).await?;
    let blob = blob.expect("ingested blob");
    assert_eq!(blob.mime, "image/jpeg");
    let decoded = image::load_from_memory(&blob.data)?;
    assert_eq!(decoded.width(), 1200);

    let empty = images::ingest(&orm, Vec::new(), "bg").await;
    assert!(matches!(empty, Err(AppError::BadRequest(_))));
    Ok(())
}
