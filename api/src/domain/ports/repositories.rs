//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::entities::{
    AdminUser, AdminUserId, ChangeHistory, Counterparty, CounterpartyFilter, CounterpartyId,
    CustomerTracking, EntityType, InventoryFilter, InventoryId, InventoryItem, NewAdminUser,
    NewChangeHistory, NewCounterparty, NewInventoryItem, NewOrder, NewWarehouse, Order,
    OrderFilter, OrderId, OrderItem, OrderItemId, OrderStatus, OrderTotals, TrackingId, Warehouse,
    WarehouseId,
};
use crate::error::DomainError;

/// Repository for Order entities
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Find an order by ID
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError>;

    /// Find an order by its human-facing number
    async fn find_by_number(&self, order_number: &str) -> Result<Option<Order>, DomainError>;

    /// List orders matching the filter, newest first
    async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, DomainError>;

    /// Count orders matching the filter (ignores limit/offset)
    async fn count(&self, filter: &OrderFilter) -> Result<u64, DomainError>;

    /// Create a new order with zero totals
    async fn create(&self, order: &NewOrder) -> Result<Order, DomainError>;

    /// Persist header fields and status
    async fn update(&self, order: &Order) -> Result<Order, DomainError>;

    /// Overwrite the computed totals
    async fn update_totals(&self, id: &OrderId, totals: &OrderTotals) -> Result<(), DomainError>;

    /// Delete an order
    async fn delete(&self, id: &OrderId) -> Result<(), DomainError>;

    /// Count orders in a given status
    async fn count_by_status(&self, status: OrderStatus) -> Result<u64, DomainError>;

    /// Count orders referencing a counterparty
    async fn count_by_counterparty(&self, id: &CounterpartyId) -> Result<u64, DomainError>;

    /// Sum of remaining amounts over orders that are not cancelled
    async fn sum_outstanding(&self) -> Result<Decimal, DomainError>;
}

/// Repository for OrderItem entities
#[async_trait]
pub trait OrderItemRepository: Send + Sync {
    /// Find an item by ID
    async fn find_by_id(&self, id: &OrderItemId) -> Result<Option<OrderItem>, DomainError>;

    /// All items of an order, oldest first
    async fn find_by_order(&self, order_id: &OrderId) -> Result<Vec<OrderItem>, DomainError>;

    /// Insert a fully computed item
    async fn create(&self, item: &OrderItem) -> Result<OrderItem, DomainError>;

    /// Persist every mutable field of an item
    async fn update(&self, item: &OrderItem) -> Result<OrderItem, DomainError>;

    /// Add `amount` to the paid amount in one atomic step, deriving the
    /// remaining amount and payment status. Fails with `Validation` when the
    /// payment would exceed the line total.
    async fn add_payment(&self, id: &OrderItemId, amount: Decimal)
        -> Result<OrderItem, DomainError>;

    /// Delete an item
    async fn delete(&self, id: &OrderItemId) -> Result<(), DomainError>;

    /// Count unfulfilled items still reserving stock from an inventory row
    async fn count_reserving(&self, inventory_id: &InventoryId) -> Result<u64, DomainError>;
}

/// Repository for warehouse inventory
///
/// `adjust_stock`, `reserve`, `release` and `consume` must be atomic with
/// respect to concurrent callers: each either applies fully or fails without
/// effect.
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Find an inventory row by ID
    async fn find_by_id(&self, id: &InventoryId) -> Result<Option<InventoryItem>, DomainError>;

    /// List inventory matching the filter
    async fn list(&self, filter: &InventoryFilter) -> Result<Vec<InventoryItem>, DomainError>;

    /// Create an inventory row
    async fn create(&self, item: &NewInventoryItem) -> Result<InventoryItem, DomainError>;

    /// Persist the descriptive fields of a row. Stock counts are left as
    /// stored; they only change through the movement methods below.
    async fn update(&self, item: &InventoryItem) -> Result<InventoryItem, DomainError>;

    /// Delete an inventory row
    async fn delete(&self, id: &InventoryId) -> Result<(), DomainError>;

    /// Count rows held in a warehouse
    async fn count_by_warehouse(&self, warehouse_id: &WarehouseId) -> Result<u64, DomainError>;

    /// Rows whose available quantity is at or below the threshold
    async fn list_low_stock(&self, threshold: i32) -> Result<Vec<InventoryItem>, DomainError>;

    /// Receive (positive) or write off (negative) stock: `delta` is added to
    /// both quantity and available quantity. Fails with `Conflict` when the
    /// available stock would go negative.
    async fn adjust_stock(&self, id: &InventoryId, delta: i32) -> Result<(), DomainError>;

    /// Take `quantity` out of the available stock.
    /// Fails with `Conflict` when not enough is available.
    async fn reserve(&self, id: &InventoryId, quantity: i32) -> Result<(), DomainError>;

    /// Return `quantity` to the available stock
    async fn release(&self, id: &InventoryId, quantity: i32) -> Result<(), DomainError>;

    /// Remove `quantity` of reserved stock from the warehouse
    async fn consume(&self, id: &InventoryId, quantity: i32) -> Result<(), DomainError>;
}

/// Repository for Warehouse entities
#[async_trait]
pub trait WarehouseRepository: Send + Sync {
    async fn find_by_id(&self, id: &WarehouseId) -> Result<Option<Warehouse>, DomainError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Warehouse>, DomainError>;

    /// List warehouses ordered by name
    async fn list(&self, active_only: bool) -> Result<Vec<Warehouse>, DomainError>;

    async fn create(&self, warehouse: &NewWarehouse) -> Result<Warehouse, DomainError>;

    async fn update(&self, warehouse: &Warehouse) -> Result<Warehouse, DomainError>;

    async fn delete(&self, id: &WarehouseId) -> Result<(), DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}

/// Repository for Counterparty entities
#[async_trait]
pub trait CounterpartyRepository: Send + Sync {
    async fn find_by_id(&self, id: &CounterpartyId) -> Result<Option<Counterparty>, DomainError>;

    /// List counterparties matching the filter, ordered by name
    async fn list(&self, filter: &CounterpartyFilter) -> Result<Vec<Counterparty>, DomainError>;

    async fn create(&self, counterparty: &NewCounterparty) -> Result<Counterparty, DomainError>;

    async fn update(&self, counterparty: &Counterparty) -> Result<Counterparty, DomainError>;

    async fn delete(&self, id: &CounterpartyId) -> Result<(), DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}

/// Repository for AdminUser entities
#[async_trait]
pub trait AdminUserRepository: Send + Sync {
    async fn find_by_id(&self, id: &AdminUserId) -> Result<Option<AdminUser>, DomainError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>, DomainError>;

    /// Find an active user by API key hash
    async fn find_by_api_key_hash(&self, hash: &str) -> Result<Option<AdminUser>, DomainError>;

    async fn list(&self) -> Result<Vec<AdminUser>, DomainError>;

    async fn create(&self, user: &NewAdminUser) -> Result<AdminUser, DomainError>;

    /// Replace the API key hash and record the login time
    async fn record_login(&self, id: &AdminUserId, api_key_hash: &str)
        -> Result<(), DomainError>;

    async fn update_password(&self, id: &AdminUserId, password_hash: &str)
        -> Result<(), DomainError>;

    /// Activate or deactivate a user; deactivation also revokes the API key
    async fn set_active(&self, id: &AdminUserId, active: bool) -> Result<(), DomainError>;

    async fn count(&self) -> Result<u64, DomainError>;
}

/// Repository for the change history audit log
#[async_trait]
pub trait ChangeHistoryRepository: Send + Sync {
    /// Append entries; an empty slice is a no-op
    async fn record(&self, entries: &[NewChangeHistory]) -> Result<(), DomainError>;

    /// History of one entity, newest first
    async fn list_by_entity(
        &self,
        entity_type: EntityType,
        entity_id: &Uuid,
    ) -> Result<Vec<ChangeHistory>, DomainError>;

    /// Most recent entries across all entities, newest first
    async fn list_recent(
        &self,
        entity_type: Option<EntityType>,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<ChangeHistory>, DomainError>;
}

/// Repository for public tracking codes
#[async_trait]
pub trait TrackingRepository: Send + Sync {
    async fn find_by_id(&self, id: &TrackingId) -> Result<Option<CustomerTracking>, DomainError>;

    async fn find_by_code(&self, code: &str) -> Result<Option<CustomerTracking>, DomainError>;

    async fn find_by_order(&self, order_id: &OrderId)
        -> Result<Vec<CustomerTracking>, DomainError>;

    async fn create(&self, code: &str, order_id: &OrderId)
        -> Result<CustomerTracking, DomainError>;

    async fn deactivate(&self, id: &TrackingId) -> Result<(), DomainError>;

    async fn delete_by_order(&self, order_id: &OrderId) -> Result<(), DomainError>;
}
