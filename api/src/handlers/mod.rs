//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

use serde::{Deserialize, Deserializer, Serialize};

pub mod auth;
pub mod counterparties;
pub mod dashboard;
pub mod history;
pub mod inventory;
pub mod order_items;
pub mod orders;
pub mod tracking;
pub mod warehouses;

pub use auth::{change_password, create_user, deactivate_user, list_users, login, me};
pub use counterparties::{
    create_counterparty, delete_counterparty, get_counterparty, list_counterparties,
    update_counterparty,
};
pub use dashboard::get_dashboard;
pub use history::{entity_history, recent_history};
pub use inventory::{
    adjust_inventory, create_inventory, delete_inventory, get_inventory, list_inventory,
    low_stock, update_inventory,
};
pub use order_items::{
    add_item, delete_item, fulfill_item, get_item, list_items, record_payment, update_item,
};
pub use orders::{
    change_status, create_order, delete_order, get_order, list_orders, recalculate_order,
    update_order,
};
pub use tracking::{issue_tracking, list_tracking, revoke_tracking, track};
pub use warehouses::{
    create_warehouse, delete_warehouse, get_warehouse, list_warehouses, update_warehouse,
};

/// Page size used when a list request does not set `limit`
pub const DEFAULT_LIMIT: u64 = 20;

/// Largest page a list request may ask for
pub const MAX_LIMIT: u64 = 100;

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

/// Keep a requested page size within `1..=MAX_LIMIT`
pub fn clamp_limit(limit: u64) -> u64 {
    limit.clamp(1, MAX_LIMIT)
}

/// A page of results with the total count before paging
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

/// Distinguish an absent field from an explicit `null` in PATCH bodies:
/// absent → `None`, `null` → `Some(None)`, value → `Some(Some(v))`.
/// Use with `#[serde(default, deserialize_with = "nullable")]`.
pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
