//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod admin_user;
pub mod change_history;
pub mod counterparty;
pub mod inventory;
pub mod order;
pub mod order_item;
pub mod tracking;
pub mod warehouse;

pub use admin_user::{AdminRole, AdminUser, AdminUserId, NewAdminUser};
pub use change_history::{
    lifecycle_entry, update_entries, Auditable, ChangeAction, ChangeHistory, ChangeHistoryId,
    EntityType, NewChangeHistory,
};
pub use counterparty::{
    validate_email, Counterparty, CounterpartyChanges, CounterpartyFilter, CounterpartyId,
    CounterpartyKind, NewCounterparty,
};
pub use inventory::{
    check_measures, InventoryChanges, InventoryFilter, InventoryId, InventoryItem, NewInventoryItem,
};
pub use order::{
    NewOrder, Order, OrderChanges, OrderFilter, OrderId, OrderStatus, OrderTotals, TransportType,
};
pub use order_item::{
    check_column, column_limit, validate_line, NewOrderItem, OrderItem, OrderItemChanges,
    OrderItemId, PaymentStatus, TransportStatus, MAX_LINE_QUANTITY, MONEY_SCALE, VOLUME_SCALE,
    WEIGHT_SCALE,
};
pub use tracking::{
    normalize_code, CustomerTracking, PublicTrackingView, TrackingId, TRACKING_ALPHABET,
    TRACKING_CODE_LEN,
};
pub use warehouse::{NewWarehouse, Warehouse, WarehouseChanges, WarehouseId};
