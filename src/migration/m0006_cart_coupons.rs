use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub(super) struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cart::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cart::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Cart::State).json().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Coupons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Coupons::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Coupons::Code).string().not_null())
                    .col(ColumnDef::new(Coupons::Percent).integer().not_null().default(0))
                    .col(ColumnDef::new(Coupons::Amount).big_integer().not_null().default(0))
                    .col(
                        ColumnDef::new(Coupons::MinSubtotal)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Coupons::ExpiresAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("idx_coupons_code")
                    .table(Coupons::Table)
                    .col(Coupons::Code)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Coupons::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cart::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Cart {
    Table,
    Id,
    State,
}

#[derive(DeriveIden)]
enum Coupons {
    Table,
    Id,
    Code,
    Percent,
    Amount,
    MinSubtotal,
    ExpiresAt,
}
