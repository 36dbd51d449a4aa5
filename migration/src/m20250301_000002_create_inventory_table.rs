use sea_orm_migration::prelude::*;

use crate::{Counterparties, WarehouseInventory, Warehouses};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WarehouseInventory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WarehouseInventory::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WarehouseInventory::WarehouseId).uuid().not_null())
                    .col(ColumnDef::new(WarehouseInventory::CounterpartyId).uuid().null())
                    .col(ColumnDef::new(WarehouseInventory::ProductName).string().not_null())
                    .col(ColumnDef::new(WarehouseInventory::Sku).string_len(64).null())
                    .col(ColumnDef::new(WarehouseInventory::Description).text().null())
                    .col(
                        ColumnDef::new(WarehouseInventory::Unit)
                            .string_len(16)
                            .not_null()
                            .default("pcs"),
                    )
                    .col(
                        ColumnDef::new(WarehouseInventory::Quantity)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(WarehouseInventory::Quantity).gte(0)),
                    )
                    .col(
                        ColumnDef::new(WarehouseInventory::AvailableQuantity)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(WarehouseInventory::AvailableQuantity).gte(0)),
                    )
                    .col(
                        ColumnDef::new(WarehouseInventory::Weight)
                            .decimal_len(14, 3)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WarehouseInventory::Volume)
                            .decimal_len(14, 4)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WarehouseInventory::ArrivedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WarehouseInventory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(WarehouseInventory::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_warehouse")
                            .from(WarehouseInventory::Table, WarehouseInventory::WarehouseId)
                            .to(Warehouses::Table, Warehouses::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_counterparty")
                            .from(WarehouseInventory::Table, WarehouseInventory::CounterpartyId)
                            .to(Counterparties::Table, Counterparties::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inventory_warehouse")
                    .table(WarehouseInventory::Table)
                    .col(WarehouseInventory::WarehouseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_inventory_available")
                    .table(WarehouseInventory::Table)
                    .col(WarehouseInventory::AvailableQuantity)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WarehouseInventory::Table).to_owned())
            .await
    }
}
