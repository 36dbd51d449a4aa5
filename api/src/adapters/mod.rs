//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod postgres;

pub use postgres::{
    PostgresAdminUserRepository, PostgresChangeHistoryRepository, PostgresCounterpartyRepository,
    PostgresInventoryRepository, PostgresOrderItemRepository, PostgresOrderRepository,
    PostgresTrackingRepository, PostgresWarehouseRepository,
};
