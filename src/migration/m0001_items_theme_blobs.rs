use sea_orm_migration::prelude::*;

use super::Items;

#[derive(DeriveMigrationName)]
pub(super) struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Items::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Items::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Items::Category).string_len(16).not_null())
                    .col(ColumnDef::new(Items::Name).string().not_null())
                    .col(ColumnDef::new(Items::Price).big_integer().not_null())
                    .col(ColumnDef::new(Items::Description).text().not_null().default(""))
                    .col(ColumnDef::new(Items::ImgBlobId).string())
                    .col(
                        ColumnDef::new(Items::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Items::TabId).integer())
                    .col(ColumnDef::new(Items::MenuSection).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_items_category")
                    .table(Items::Table)
                    .col(Items::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Theme::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Theme::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Theme::Primary).string().not_null())
                    .col(ColumnDef::new(Theme::Secondary).string().not_null())
                    .col(ColumnDef::new(Theme::BgBlobId).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Blobs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Blobs::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Blobs::Mime).string().not_null())
                    .col(ColumnDef::new(Blobs::Data).blob().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Blobs::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Theme::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Items::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Theme {
    Table,
    Id,
    Primary,
    Secondary,
    BgBlobId,
}

#[derive(DeriveIden)]
enum Blobs {
    Table,
    Id,
    Mime,
    Data,
}
