use sea_orm_migration::prelude::*;

use crate::{AdminUsers, Counterparties, CustomerTracking, OrderItems, Orders, WarehouseInventory};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn money(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .decimal_len(14, 2)
        .not_null()
        .default(0)
        .to_owned()
}

fn timestamp(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Orders::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Orders::OrderNumber)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Orders::Status)
                            .string_len(16)
                            .not_null()
                            .default("new"),
                    )
                    .col(ColumnDef::new(Orders::CounterpartyId).uuid().null())
                    .col(ColumnDef::new(Orders::Origin).string().not_null())
                    .col(ColumnDef::new(Orders::Destination).string().not_null())
                    .col(
                        ColumnDef::new(Orders::TransportType)
                            .string_len(16)
                            .not_null()
                            .default("auto"),
                    )
                    .col(ColumnDef::new(Orders::Comment).text().null())
                    .col(
                        ColumnDef::new(Orders::TotalQuantity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Orders::TotalWeight)
                            .decimal_len(14, 3)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Orders::TotalVolume)
                            .decimal_len(14, 4)
                            .not_null()
                            .default(0),
                    )
                    .col(money(Orders::TotalAmount))
                    .col(money(Orders::PaidAmount))
                    .col(money(Orders::RemainingAmount))
                    .col(ColumnDef::new(Orders::CreatedBy).uuid().null())
                    .col(timestamp(Orders::CreatedAt))
                    .col(timestamp(Orders::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_counterparty")
                            .from(Orders::Table, Orders::CounterpartyId)
                            .to(Counterparties::Table, Counterparties::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_created_by")
                            .from(Orders::Table, Orders::CreatedBy)
                            .to(AdminUsers::Table, AdminUsers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, col) in [
            ("idx_orders_status", Orders::Status),
            ("idx_orders_counterparty", Orders::CounterpartyId),
            ("idx_orders_created_at", Orders::CreatedAt),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Orders::Table)
                        .col(col)
                        .to_owned(),
                )
                .await?;
        }

        manager
            .create_table(
                Table::create()
                    .table(OrderItems::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(OrderItems::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(OrderItems::OrderId).uuid().not_null())
                    .col(ColumnDef::new(OrderItems::InventoryId).uuid().null())
                    .col(ColumnDef::new(OrderItems::ProductName).string().not_null())
                    .col(ColumnDef::new(OrderItems::Description).text().null())
                    .col(
                        ColumnDef::new(OrderItems::Quantity)
                            .integer()
                            .not_null()
                            .check(Expr::col(OrderItems::Quantity).gt(0)),
                    )
                    .col(money(OrderItems::UnitPrice))
                    .col(money(OrderItems::TotalAmount))
                    .col(
                        ColumnDef::new(OrderItems::Weight)
                            .decimal_len(14, 3)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(OrderItems::Volume)
                            .decimal_len(14, 4)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(OrderItems::TransportStatus)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(OrderItems::PaymentStatus)
                            .string_len(16)
                            .not_null()
                            .default("unpaid"),
                    )
                    .col(money(OrderItems::PaidAmount))
                    .col(money(OrderItems::RemainingAmount))
                    .col(
                        ColumnDef::new(OrderItems::FulfilledAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp(OrderItems::CreatedAt))
                    .col(timestamp(OrderItems::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_order")
                            .from(OrderItems::Table, OrderItems::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_inventory")
                            .from(OrderItems::Table, OrderItems::InventoryId)
                            .to(WarehouseInventory::Table, WarehouseInventory::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_order_items_order")
                    .table(OrderItems::Table)
                    .col(OrderItems::OrderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_order_items_inventory")
                    .table(OrderItems::Table)
                    .col(OrderItems::InventoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CustomerTracking::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CustomerTracking::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CustomerTracking::TrackingCode)
                            .string_len(16)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(CustomerTracking::OrderId).uuid().not_null())
                    .col(
                        ColumnDef::new(CustomerTracking::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(timestamp(CustomerTracking::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_tracking_order")
                            .from(CustomerTracking::Table, CustomerTracking::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CustomerTracking::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OrderItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await
    }
}
