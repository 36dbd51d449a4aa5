pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_directory_tables;
mod m20250301_000002_create_inventory_table;
mod m20250301_000003_create_order_tables;
mod m20250301_000004_create_change_history_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_directory_tables::Migration),
            Box::new(m20250301_000002_create_inventory_table::Migration),
            Box::new(m20250301_000003_create_order_tables::Migration),
            Box::new(m20250301_000004_create_change_history_table::Migration),
        ]
    }
}

#[derive(DeriveIden)]
pub(crate) enum Counterparties {
    Table,
    Id,
    Name,
    Kind,
    ContactPerson,
    Phone,
    Email,
    Address,
    TaxId,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Warehouses {
    Table,
    Id,
    Name,
    Address,
    City,
    Country,
    Phone,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum AdminUsers {
    Table,
    Id,
    Username,
    PasswordHash,
    ApiKeyHash,
    Role,
    IsActive,
    CreatedAt,
    LastLoginAt,
}

#[derive(DeriveIden)]
pub(crate) enum WarehouseInventory {
    Table,
    Id,
    WarehouseId,
    CounterpartyId,
    ProductName,
    Sku,
    Description,
    Unit,
    Quantity,
    AvailableQuantity,
    Weight,
    Volume,
    ArrivedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Orders {
    Table,
    Id,
    OrderNumber,
    Status,
    CounterpartyId,
    Origin,
    Destination,
    TransportType,
    Comment,
    TotalQuantity,
    TotalWeight,
    TotalVolume,
    TotalAmount,
    PaidAmount,
    RemainingAmount,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum OrderItems {
    Table,
    Id,
    OrderId,
    InventoryId,
    ProductName,
    Description,
    Quantity,
    UnitPrice,
    TotalAmount,
    Weight,
    Volume,
    TransportStatus,
    PaymentStatus,
    PaidAmount,
    RemainingAmount,
    FulfilledAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum CustomerTracking {
    Table,
    Id,
    TrackingCode,
    OrderId,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum ChangeHistory {
    Table,
    Id,
    EntityType,
    EntityId,
    Action,
    Field,
    OldValue,
    NewValue,
    ChangedBy,
    ChangedAt,
}
