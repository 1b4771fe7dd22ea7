use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    cart::CartState,
    models::{Coupon, Item, MenuSection, Settings, Tab, Theme},
};

pub const BACKUP_VERSION: &str = "v1";

/// Portable dump of the whole store.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub version: String,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub tabs: BackupTabs,
    #[serde(default)]
    pub menu_sections: Vec<MenuSection>,
    pub theme: Option<Theme>,
    pub settings: Option<Settings>,
    #[serde(default)]
    pub coupons: Vec<Coupon>,
    pub cart: Option<CartState>,
    #[serde(default)]
    pub blobs: Vec<BackupBlob>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BackupTabs {
    #[serde(default)]
    pub promo: Vec<Tab>,
    #[serde(default)]
    pub combo: Vec<Tab>,
    /// Always empty: menu items group by section, not by tab.
    #[serde(default)]
    pub menu: Vec<Tab>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackupBlob {
    pub id: String,
    /// `data:<mime>;base64,<payload>`
    pub data_url: String,
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct ImportSummary {
    pub blobs: usize,
    pub tabs: usize,
    pub menu_sections: usize,
    pub coupons: usize,
    pub skipped_coupons: Vec<String>,
    pub items: usize,
    pub cart_restored: bool,
}
