use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Category, Item, MenuSection, Tab};

/// Every editable item field in one request, validated as a unit for both
/// add and full replace.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ItemRequest {
    pub category: Category,
    pub name: String,
    pub price: i64,
    #[serde(default)]
    pub description: String,
    pub img_blob_id: Option<String>,
    pub tab_id: Option<i32>,
    pub menu_section: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RenameTabRequest {
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NewMenuSectionRequest {
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveMenuSectionRequest {
    pub name: String,
    pub order: i32,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Up,
    Down,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MoveMenuSectionRequest {
    pub direction: MoveDirection,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ItemList {
    #[schema(value_type = Vec<Item>)]
    pub items: Vec<Item>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct TabList {
    #[schema(value_type = Vec<Tab>)]
    pub items: Vec<Tab>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct MenuSectionList {
    #[schema(value_type = Vec<MenuSection>)]
    pub items: Vec<MenuSection>,
}
