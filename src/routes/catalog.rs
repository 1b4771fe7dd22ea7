use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post, put},
};

use crate::{
    dto::catalog::{
        ItemList, ItemRequest, MenuSectionList, MoveMenuSectionRequest, NewMenuSectionRequest,
        RenameTabRequest, SaveMenuSectionRequest, TabList,
    },
    error::{AppError, AppResult},
    middleware::admin_gate::AdminGate,
    models::{Item, MenuSection, Tab},
    response::{ApiResponse, Meta},
    routes::params::{ItemQuery, TabQuery},
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(add_item))
        .route(
            "/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/tabs", get(list_tabs))
        .route("/tabs/reset", post(reset_tabs))
        .route("/tabs/{id}", patch(rename_tab))
        .route("/sections", get(list_sections).post(add_section))
        .route("/sections/{id}", put(save_section).delete(delete_section))
        .route("/sections/{id}/move", post(move_section))
}

#[utoipa::path(
    get,
    path = "/api/catalog/items",
    params(
        ("category" = Option<String>, Query, description = "promo, combo or menu"),
        ("tab_id" = Option<i32>, Query, description = "Only items of this tab"),
        ("section" = Option<String>, Query, description = "Only menu items of this section"),
        ("q" = Option<String>, Query, description = "Search name or description"),
    ),
    responses(
        (status = 200, description = "List items", body = ApiResponse<ItemList>)
    ),
    tag = "Catalog"
)]
pub async fn list_items(
    State(state): State<AppState>,
    Query(query): Query<ItemQuery>,
) -> AppResult<Json<ApiResponse<ItemList>>> {
    let term = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    let mut items = match (term, query.tab_id, query.section.as_deref(), query.category) {
        (Some(term), _, _, _) => catalog_service::search_items(&state.orm, term).await?,
        (None, Some(tab_id), _, _) => catalog_service::list_items_by_tab(&state.orm, tab_id).await?,
        (None, None, Some(section), _) => {
            catalog_service::list_items_by_section(&state.orm, section).await?
        }
        (None, None, None, Some(category)) => {
            catalog_service::list_items_by_category(&state.orm, category).await?
        }
        (None, None, None, None) => catalog_service::list_all_items(&state.orm).await?,
    };
    // A search narrows further by whatever filters came with it.
    if term.is_some() {
        items.retain(|item| {
            query.category.is_none_or(|c| item.category == c)
                && query.tab_id.is_none_or(|t| item.tab_id == Some(t))
                && query
                    .section
                    .as_deref()
                    .is_none_or(|s| item.menu_section.as_deref() == Some(s))
        });
    }

    let meta = Meta::count(items.len());
    Ok(Json(ApiResponse::success(
        "Items",
        ItemList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    get,
    path = "/api/catalog/items/{id}",
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item", body = ApiResponse<Item>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Catalog"
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<Item>>> {
    let item = catalog_service::get_item(&state.orm, id).await?;
    Ok(Json(ApiResponse::success("Item", item, None)))
}

#[utoipa::path(
    post,
    path = "/api/catalog/items",
    request_body = ItemRequest,
    responses(
        (status = 200, description = "Item created", body = ApiResponse<Item>),
        (status = 422, description = "Validation failed"),
    ),
    security(("admin_pin" = [])),
    tag = "Catalog"
)]
pub async fn add_item(
    State(state): State<AppState>,
    _admin: AdminGate,
    Json(payload): Json<ItemRequest>,
) -> AppResult<Json<ApiResponse<Item>>> {
    let item = catalog_service::add_item(&state.orm, payload).await?;
    Ok(Json(ApiResponse::success("Item created", item, None)))
}

#[utoipa::path(
    put,
    path = "/api/catalog/items/{id}",
    params(("id" = i32, Path, description = "Item ID")),
    request_body = ItemRequest,
    responses(
        (status = 200, description = "Item replaced", body = ApiResponse<Item>),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Validation failed"),
    ),
    security(("admin_pin" = [])),
    tag = "Catalog"
)]
pub async fn update_item(
    State(state): State<AppState>,
    _admin: AdminGate,
    Path(id): Path<i32>,
    Json(payload): Json<ItemRequest>,
) -> AppResult<Json<ApiResponse<Item>>> {
    let item = catalog_service::update_item(&state.orm, id, payload).await?;
    Ok(Json(ApiResponse::success("Item updated", item, None)))
}

#[utoipa::path(
    delete,
    path = "/api/catalog/items/{id}",
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Not Found"),
    ),
    security(("admin_pin" = [])),
    tag = "Catalog"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    _admin: AdminGate,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    if !catalog_service::delete_item(&state.orm, id).await? {
        return Err(AppError::NotFound);
    }
    Ok(Json(ApiResponse::success(
        "Item deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/catalog/tabs",
    params(("category" = String, Query, description = "promo or combo")),
    responses(
        (status = 200, description = "Tabs in display order", body = ApiResponse<TabList>)
    ),
    tag = "Catalog"
)]
pub async fn list_tabs(
    State(state): State<AppState>,
    Query(query): Query<TabQuery>,
) -> AppResult<Json<ApiResponse<TabList>>> {
    if !query.category.uses_tabs() {
        return Err(AppError::BadRequest(format!(
            "{} items are grouped by section",
            query.category.as_str()
        )));
    }
    let items = catalog_service::list_tabs_by_category(&state.orm, query.category).await?;
    let meta = Meta::count(items.len());
    Ok(Json(ApiResponse::success("Tabs", TabList { items }, Some(meta))))
}

#[utoipa::path(
    patch,
    path = "/api/catalog/tabs/{id}",
    params(("id" = i32, Path, description = "Tab ID")),
    request_body = RenameTabRequest,
    responses(
        (status = 200, description = "Tab renamed", body = ApiResponse<Tab>),
        (status = 404, description = "Not Found"),
    ),
    security(("admin_pin" = [])),
    tag = "Catalog"
)]
pub async fn rename_tab(
    State(state): State<AppState>,
    _admin: AdminGate,
    Path(id): Path<i32>,
    Json(payload): Json<RenameTabRequest>,
) -> AppResult<Json<ApiResponse<Tab>>> {
    let tab = catalog_service::rename_tab(&state.orm, id, &payload.name).await?;
    Ok(Json(ApiResponse::success("Tab renamed", tab, None)))
}

#[utoipa::path(
    post,
    path = "/api/catalog/tabs/reset",
    responses(
        (status = 200, description = "Tabs reset to defaults", body = ApiResponse<serde_json::Value>)
    ),
    security(("admin_pin" = [])),
    tag = "Catalog"
)]
pub async fn reset_tabs(
    State(state): State<AppState>,
    _admin: AdminGate,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    catalog_service::reset_tabs(&state.orm).await?;
    Ok(Json(ApiResponse::success(
        "Tabs reset",
        serde_json::json!({}),
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/catalog/sections",
    responses(
        (status = 200, description = "Menu sections in display order", body = ApiResponse<MenuSectionList>)
    ),
    tag = "Catalog"
)]
pub async fn list_sections(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<MenuSectionList>>> {
    let items = catalog_service::list_menu_sections(&state.orm).await?;
    let meta = Meta::count(items.len());
    Ok(Json(ApiResponse::success(
        "Menu sections",
        MenuSectionList { items },
        Some(meta),
    )))
}

#[utoipa::path(
    post,
    path = "/api/catalog/sections",
    request_body = NewMenuSectionRequest,
    responses(
        (status = 200, description = "Section appended", body = ApiResponse<MenuSection>),
        (status = 422, description = "Validation failed"),
    ),
    security(("admin_pin" = [])),
    tag = "Catalog"
)]
pub async fn add_section(
    State(state): State<AppState>,
    _admin: AdminGate,
    Json(payload): Json<NewMenuSectionRequest>,
) -> AppResult<Json<ApiResponse<MenuSection>>> {
    let section = catalog_service::add_menu_section(&state.orm, &payload.name).await?;
    Ok(Json(ApiResponse::success("Section created", section, None)))
}

#[utoipa::path(
    put,
    path = "/api/catalog/sections/{id}",
    params(("id" = i32, Path, description = "Section ID")),
    request_body = SaveMenuSectionRequest,
    responses(
        (status = 200, description = "Section saved", body = ApiResponse<MenuSection>),
        (status = 422, description = "Validation failed"),
    ),
    security(("admin_pin" = [])),
    tag = "Catalog"
)]
pub async fn save_section(
    State(state): State<AppState>,
    _admin: AdminGate,
    Path(id): Path<i32>,
    Json(payload): Json<SaveMenuSectionRequest>,
) -> AppResult<Json<ApiResponse<MenuSection>>> {
    let section = catalog_service::save_menu_section(&state.orm, id, payload).await?;
    Ok(Json(ApiResponse::success("Section saved", section, None)))
}

#[utoipa::path(
    delete,
    path = "/api/catalog/sections/{id}",
    params(("id" = i32, Path, description = "Section ID")),
    responses(
        (status = 200, description = "Section deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Not Found"),
    ),
    security(("admin_pin" = [])),
    tag = "Catalog"
)]
pub async fn delete_section(
    State(state): State<AppState>,
    _admin: AdminGate,
    Path(id): Path<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    if !catalog_service::delete_menu_section(&state.orm, id).await? {
        return Err(AppError::NotFound);
    }
    Ok(Json(ApiResponse::success(
        "Section deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    post,
    path = "/api/catalog/sections/{id}/move",
    params(("id" = i32, Path, description = "Section ID")),
    request_body = MoveMenuSectionRequest,
    responses(
        (status = 200, description = "Sections after the move", body = ApiResponse<MenuSectionList>),
        (status = 404, description = "Not Found"),
    ),
    security(("admin_pin" = [])),
    tag = "Catalog"
)]
pub async fn move_section(
    State(state): State<AppState>,
    _admin: AdminGate,
    Path(id): Path<i32>,
    Json(payload): Json<MoveMenuSectionRequest>,
) -> AppResult<Json<ApiResponse<MenuSectionList>>> {
    let items = catalog_service::move_menu_section(&state.orm, id, payload.direction).await?;
    let meta = Meta::count(items.len());
    Ok(Json(ApiResponse::success(
        "Section moved",
        MenuSectionList { items },
        Some(meta),
    )))
}
