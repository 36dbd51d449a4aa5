use sea_orm_migration::prelude::*;

use crate::{AdminUsers, Counterparties, Warehouses};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Counterparties::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Counterparties::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Counterparties::Name).string().not_null())
                    .col(
                        ColumnDef::new(Counterparties::Kind)
                            .string_len(16)
                            .not_null()
                            .default("client"),
                    )
                    .col(ColumnDef::new(Counterparties::ContactPerson).string().null())
                    .col(ColumnDef::new(Counterparties::Phone).string_len(64).null())
                    .col(ColumnDef::new(Counterparties::Email).string().null())
                    .col(ColumnDef::new(Counterparties::Address).text().null())
                    .col(ColumnDef::new(Counterparties::TaxId).string_len(64).null())
                    .col(ColumnDef::new(Counterparties::Notes).text().null())
                    .col(
                        ColumnDef::new(Counterparties::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Counterparties::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_counterparties_name")
                    .table(Counterparties::Table)
                    .col(Counterparties::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Warehouses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Warehouses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Warehouses::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(Warehouses::Address).text().not_null())
                    .col(ColumnDef::new(Warehouses::City).string().not_null())
                    .col(ColumnDef::new(Warehouses::Country).string().not_null())
                    .col(ColumnDef::new(Warehouses::Phone).string_len(64).null())
                    .col(
                        ColumnDef::new(Warehouses::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Warehouses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Warehouses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AdminUsers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AdminUsers::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(AdminUsers::Username)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(AdminUsers::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(AdminUsers::ApiKeyHash)
                            .string_len(64)
                            .null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(AdminUsers::Role)
                            .string_len(16)
                            .not_null()
                            .default("manager"),
                    )
                    .col(
                        ColumnDef::new(AdminUsers::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(AdminUsers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(AdminUsers::LastLoginAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminUsers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Warehouses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Counterparties::Table).to_owned())
            .await
    }
}
