use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Catalog bucket an item belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[sea_orm(string_value = "promo")]
    Promo,
    #[sea_orm(string_value = "combo")]
    Combo,
    #[sea_orm(string_value = "menu")]
    Menu,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Promo => "promo",
            Category::Combo => "combo",
            Category::Menu => "menu",
        }
    }

    /// Promo and combo items hang off tabs; menu items hang off sections.
    pub fn uses_tabs(&self) -> bool {
        !matches!(self, Category::Menu)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub id: i32,
    pub category: Category,
    pub name: String,
    /// Minor units (cents).
    pub price: i64,
    pub description: String,
    pub img_blob_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub tab_id: Option<i32>,
    pub menu_section: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Tab {
    pub id: i32,
    pub category: Category,
    pub name: String,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuSection {
    pub id: i32,
    pub name: String,
    pub order: i32,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coupon {
    pub id: i32,
    pub code: String,
    pub percent: i32,
    pub amount: i64,
    pub min_subtotal: i64,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Theme {
    pub primary: String,
    pub secondary: String,
    pub bg_blob_id: Option<String>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: "#ff6a00".to_string(),
            secondary: "#222222".to_string(),
            bg_blob_id: None,
        }
    }
}

pub const DEFAULT_BIZ_NAME: &str = "Grill & Sazón";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Settings {
    pub biz_name: String,
    pub wa_number: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            biz_name: DEFAULT_BIZ_NAME.to_string(),
            wa_number: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredBlob {
    pub id: String,
    pub mime: String,
    pub data: Vec<u8>,
}
