//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod admin_user_repo;
pub mod change_history_repo;
pub mod counterparty_repo;
pub mod inventory_repo;
pub mod order_item_repo;
pub mod order_repo;
pub mod tracking_repo;
pub mod warehouse_repo;

#[cfg(test)]
mod integration_tests;

pub use admin_user_repo::PostgresAdminUserRepository;
pub use change_history_repo::PostgresChangeHistoryRepository;
pub use counterparty_repo::PostgresCounterpartyRepository;
pub use inventory_repo::PostgresInventoryRepository;
pub use order_item_repo::PostgresOrderItemRepository;
pub use order_repo::PostgresOrderRepository;
pub use tracking_repo::PostgresTrackingRepository;
pub use warehouse_repo::PostgresWarehouseRepository;
