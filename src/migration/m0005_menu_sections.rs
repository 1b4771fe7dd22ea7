use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub(super) struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MenuSections::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MenuSections::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MenuSections::Name).string().not_null())
                    .col(ColumnDef::new(MenuSections::Order).integer().not_null())
                    .col(
                        ColumnDef::new(MenuSections::Enabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_menu_sections_order")
                    .table(MenuSections::Table)
                    .col(MenuSections::Order)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MenuSections::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MenuSections {
    Table,
    Id,
    Name,
    Order,
    Enabled,
}
