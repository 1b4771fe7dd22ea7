use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub(super) struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tabs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tabs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tabs::Category).string_len(16).not_null())
                    .col(ColumnDef::new(Tabs::Name).string().not_null())
                    .col(ColumnDef::new(Tabs::Order).integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tabs_category")
                    .table(Tabs::Table)
                    .col(Tabs::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tabs_order")
                    .table(Tabs::Table)
                    .col(Tabs::Order)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tabs::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Tabs {
    Table,
    Id,
    Category,
    Name,
    Order,
}
