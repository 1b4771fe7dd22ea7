use serde::Deserialize;
use utoipa::ToSchema;

use crate::models::Category;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ItemQuery {
    pub category: Option<Category>,
    pub tab_id: Option<i32>,
    /// Menu section name.
    pub section: Option<String>,
    /// Case-insensitive match on name or description.
    pub q: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TabQuery {
    pub category: Category,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ImageQuery {
    /// Blob id prefix, `img` when absent.
    pub prefix: Option<String>,
}
