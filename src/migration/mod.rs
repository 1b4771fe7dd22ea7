//! Versioned schema steps for the local store.
//!
//! Step N in [`Migrator::migrations`] is schema version N. Steps only add
//! tables and indexes, always with `IF NOT EXISTS`, so a store created by an
//! older build upgrades in place without touching existing rows.

use sea_orm_migration::prelude::*;

mod m0001_items_theme_blobs;
mod m0002_settings;
mod m0003_items_by_tab;
mod m0004_tabs;
mod m0005_menu_sections;
mod m0006_cart_coupons;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m0001_items_theme_blobs::Migration),
            Box::new(m0002_settings::Migration),
            Box::new(m0003_items_by_tab::Migration),
            Box::new(m0004_tabs::Migration),
            Box::new(m0005_menu_sections::Migration),
            Box::new(m0006_cart_coupons::Migration),
        ]
    }
}

/// Current schema version (number of steps).
pub fn schema_version() -> usize {
    Migrator::migrations().len()
}

#[derive(DeriveIden)]
pub(crate) enum Items {
    Table,
    Id,
    Category,
    Name,
    Price,
    Description,
    ImgBlobId,
    CreatedAt,
    TabId,
    MenuSection,
}
