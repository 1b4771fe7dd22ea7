use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
};

use crate::{
    dto::settings::IngestedImage,
    error::{AppError, AppResult},
    images,
    middleware::admin_gate::AdminGate,
    response::ApiResponse,
    routes::params::ImageQuery,
    services::settings_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/images", post(upload_image))
        .route("/blobs/{id}", get(get_blob))
}

#[utoipa::path(
    post,
    path = "/api/media/images",
    params(("prefix" = Option<String>, Query, description = "Blob id prefix, default img")),
    request_body(content = String, description = "Raw image bytes", content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Image downscaled and stored", body = ApiResponse<IngestedImage>),
        (status = 400, description = "Not a decodable image"),
    ),
    security(("admin_pin" = [])),
    tag = "Media"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    _admin: AdminGate,
    Query(query): Query<ImageQuery>,
    body: Bytes,
) -> AppResult<Json<ApiResponse<IngestedImage>>> {
    let prefix = query.prefix.unwrap_or_default();
    let image = images::ingest(&state.orm, body.to_vec(), &prefix).await?;
    Ok(Json(ApiResponse::success("Image stored", image, None)))
}

#[utoipa::path(
    get,
    path = "/api/media/blobs/{id}",
    params(("id" = String, Path, description = "Blob ID")),
    responses(
        (status = 200, description = "Raw blob bytes"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Media"
)]
pub async fn get_blob(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let blob = match settings_service::get_blob(&state.orm, &id).await? {
        Some(blob) => blob,
        None => return Err(AppError::NotFound),
    };
    Ok(([(header::CONTENT_TYPE, blob.mime)], blob.data))
}
