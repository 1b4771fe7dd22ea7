use sea_orm::entity::prelude::*;

use crate::models::Category;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub category: Category,
    pub name: String,
    pub price: i64,
    pub description: String,
    pub img_blob_id: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub tab_id: Option<i32>,
    pub menu_section: Option<String>,
}

// Tabs and sections are looked up by value; deleting them never cascades here.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
