//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities and ports; every mutation
//! ends with a totals refresh (for order lines) and a change-history write.

pub mod admin_service;
pub mod counterparty_service;
pub mod dashboard_service;
pub mod history_service;
pub mod inventory_service;
pub mod order_item_service;
pub mod order_service;
pub mod tracking_service;
pub mod warehouse_service;

pub use admin_service::AdminService;
pub use counterparty_service::CounterpartyService;
pub use dashboard_service::{DashboardService, DashboardSummary};
pub use history_service::HistoryService;
pub use inventory_service::{CreateInventoryItem, InventoryService};
pub use order_item_service::OrderItemService;
pub use order_service::{CreateOrder, OrderDetails, OrderService};
pub use tracking_service::TrackingService;
pub use warehouse_service::WarehouseService;
