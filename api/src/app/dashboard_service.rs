//! Dashboard service
//!
//! One-call summary for the back-office landing page.

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::entities::{ChangeHistory, OrderStatus};
use crate::domain::ports::{
    ChangeHistoryRepository, CounterpartyRepository, InventoryRepository, OrderRepository,
    WarehouseRepository,
};
use crate::error::AppError;

/// Number of history entries shown on the dashboard
const RECENT_CHANGES: u64 = 10;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    /// Order count per status, every status present
    pub orders_by_status: BTreeMap<String, u64>,
    pub total_orders: u64,
    /// Sum of `remaining_amount` over orders that are not cancelled
    pub outstanding_amount: Decimal,
    pub warehouses: u64,
    pub counterparties: u64,
    pub low_stock_threshold: i32,
    pub low_stock_items: u64,
    pub recent_changes: Vec<ChangeHistory>,
}

pub struct DashboardService<O, V, W, C, H>
where
    O: OrderRepository,
    V: InventoryRepository,
    W: WarehouseRepository,
    C: CounterpartyRepository,
    H: ChangeHistoryRepository,
{
    orders: Arc<O>,
    inventory: Arc<V>,
    warehouses: Arc<W>,
    counterparties: Arc<C>,
    history: Arc<H>,
    low_stock_threshold: i32,
}

impl<O, V, W, C, H> DashboardService<O, V, W, C, H>
where
    O: OrderRepository,
    V: InventoryRepository,
    W: WarehouseRepository,
    C: CounterpartyRepository,
    H: ChangeHistoryRepository,
{
    pub fn new(
        orders: Arc<O>,
        inventory: Arc<V>,
        warehouses: Arc<W>,
        counterparties: Arc<C>,
        history: Arc<H>,
        low_stock_threshold: i32,
    ) -> Self {
        Self {
            orders,
            inventory,
            warehouses,
            counterparties,
            history,
            low_stock_threshold,
        }
    }

    pub async fn summary(&self) -> Result<DashboardSummary, AppError> {
        let mut orders_by_status = BTreeMap::new();
        for status in OrderStatus::ALL {
            let count = self.orders.count_by_status(status).await?;
            orders_by_status.insert(status.to_string(), count);
        }
        let total_orders = orders_by_status.values().sum();

        let low_stock = self.inventory.list_low_stock(self.low_stock_threshold).await?;

        Ok(DashboardSummary {
            orders_by_status,
            total_orders,
            outstanding_amount: self.orders.sum_outstanding().await?,
            warehouses: self.warehouses.count().await?,
            counterparties: self.counterparties.count().await?,
            low_stock_threshold: self.low_stock_threshold,
            low_stock_items: low_stock.len() as u64,
            recent_changes: self.history.list_recent(None, RECENT_CHANGES, 0).await?,
        })
    }
}
