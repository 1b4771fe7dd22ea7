use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Settings, Theme};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ThemeRequest {
    pub primary: String,
    pub secondary: String,
    pub bg_blob_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SettingsRequest {
    #[serde(default)]
    pub biz_name: String,
    #[serde(default)]
    pub wa_number: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IngestedImage {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BlobCollection {
    pub removed: Vec<String>,
}

impl From<Theme> for ThemeRequest {
    fn from(theme: Theme) -> Self {
        Self {
            primary: theme.primary,
            secondary: theme.secondary,
            bg_blob_id: theme.bg_blob_id,
        }
    }
}

impl From<Settings> for SettingsRequest {
    fn from(settings: Settings) -> Self {
        Self {
            biz_name: settings.biz_name,
            wa_number: settings.wa_number,
        }
    }
}
