use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::{
    dto::{
        backup::{BackupDocument, ImportSummary},
        settings::{BlobCollection, SettingsRequest, ThemeRequest},
    },
    error::AppResult,
    middleware::admin_gate::AdminGate,
    models::{Settings, Theme},
    response::{ApiResponse, Meta},
    services::{backup_service, settings_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/theme", get(get_theme).put(save_theme))
        .route("/settings", get(get_settings).put(save_settings))
        .route("/backup", get(export_backup).post(import_backup))
        .route("/blobs/gc", post(collect_blobs))
}

#[utoipa::path(
    get,
    path = "/api/admin/theme",
    responses(
        (status = 200, description = "Theme colors and background", body = ApiResponse<Theme>)
    ),
    tag = "Admin"
)]
pub async fn get_theme(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Theme>>> {
    let theme = settings_service::get_theme(&state.orm)
        .await?
        .unwrap_or_default();
    Ok(Json(ApiResponse::success("Theme", theme, None)))
}

#[utoipa::path(
    put,
    path = "/api/admin/theme",
    request_body = ThemeRequest,
    responses(
        (status = 200, description = "Theme saved", body = ApiResponse<Theme>),
        (status = 422, description = "Validation failed"),
    ),
    security(("admin_pin" = [])),
    tag = "Admin"
)]
pub async fn save_theme(
    State(state): State<AppState>,
    _admin: AdminGate,
    Json(payload): Json<ThemeRequest>,
) -> AppResult<Json<ApiResponse<Theme>>> {
    let theme = settings_service::save_theme(&state.orm, payload).await?;
    Ok(Json(ApiResponse::success("Theme saved", theme, None)))
}

#[utoipa::path(
    get,
    path = "/api/admin/settings",
    responses(
        (status = 200, description = "Business settings", body = ApiResponse<Settings>)
    ),
    tag = "Admin"
)]
pub async fn get_settings(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Settings>>> {
    let settings = settings_service::get_settings(&state.orm)
        .await?
        .unwrap_or_default();
    Ok(Json(ApiResponse::success("Settings", settings, None)))
}

#[utoipa::path(
    put,
    path = "/api/admin/settings",
    request_body = SettingsRequest,
    responses(
        (status = 200, description = "Settings saved", body = ApiResponse<Settings>)
    ),
    security(("admin_pin" = [])),
    tag = "Admin"
)]
pub async fn save_settings(
    State(state): State<AppState>,
    _admin: AdminGate,
    Json(payload): Json<SettingsRequest>,
) -> AppResult<Json<ApiResponse<Settings>>> {
    let settings = settings_service::save_settings(&state.orm, payload).await?;
    Ok(Json(ApiResponse::success("Settings saved", settings, None)))
}

#[utoipa::path(
    get,
    path = "/api/admin/backup",
    responses(
        (status = 200, description = "Full store backup", body = BackupDocument)
    ),
    security(("admin_pin" = [])),
    tag = "Admin"
)]
pub async fn export_backup(
    State(state): State<AppState>,
    _admin: AdminGate,
) -> AppResult<Json<BackupDocument>> {
    let doc = backup_service::export(&state.orm).await?;
    Ok(Json(doc))
}

#[utoipa::path(
    post,
    path = "/api/admin/backup",
    request_body = BackupDocument,
    responses(
        (status = 200, description = "Store replaced by the backup", body = ApiResponse<ImportSummary>),
        (status = 400, description = "Invalid backup, nothing changed"),
    ),
    security(("admin_pin" = [])),
    tag = "Admin"
)]
pub async fn import_backup(
    State(state): State<AppState>,
    _admin: AdminGate,
    Json(payload): Json<serde_json::Value>,
) -> AppResult<Json<ApiResponse<ImportSummary>>> {
    let doc = backup_service::parse_document(payload)?;
    // Hold the cart while the store is replaced, then pick up the restored one.
    let mut cart = state.cart.lock().await;
    let summary = backup_service::import(&state.orm, doc).await?;
    cart.reload().await?;

    Ok(Json(ApiResponse::success(
        "Backup imported",
        summary,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    post,
    path = "/api/admin/blobs/gc",
    responses(
        (status = 200, description = "Unreferenced blobs removed", body = ApiResponse<BlobCollection>)
    ),
    security(("admin_pin" = [])),
    tag = "Admin"
)]
pub async fn collect_blobs(
    State(state): State<AppState>,
    _admin: AdminGate,
) -> AppResult<Json<ApiResponse<BlobCollection>>> {
    let removed = settings_service::collect_unreferenced_blobs(&state.orm).await?;
    let meta = Meta::count(removed.len());
    Ok(Json(ApiResponse::success(
        "Blobs collected",
        BlobCollection { removed },
        Some(meta),
    )))
}
