//! Order service
//!
//! Order headers, status changes and the derived totals. Totals are always
//! recomputed from the items; nothing else writes them.

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use serde::Serialize;

use crate::app::history_service::record_history;
use crate::domain::entities::{
    lifecycle_entry, update_entries, AdminUserId, ChangeAction, CounterpartyId, NewOrder, Order,
    OrderChanges, OrderFilter, OrderId, OrderItem, OrderStatus, OrderTotals, TransportType,
};
use crate::domain::ports::{
    ChangeHistoryRepository, CounterpartyRepository, InventoryRepository, OrderItemRepository,
    OrderRepository, TrackingRepository,
};
use crate::error::{AppError, DomainError};

/// Attempts at finding a free generated order number
const ORDER_NUMBER_ATTEMPTS: usize = 5;

/// Input for creating an order
#[derive(Debug, Clone)]
pub struct CreateOrder {
    /// Generated when absent
    pub order_number: Option<String>,
    pub counterparty_id: Option<CounterpartyId>,
    pub origin: String,
    pub destination: String,
    pub transport_type: TransportType,
    pub comment: Option<String>,
}

/// An order together with its cargo lines
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Generate a human-facing order number: `FD-YYYYMMDD-NNNN`
pub fn generate_order_number() -> String {
    let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
    format!("FD-{}-{:04}", Utc::now().format("%Y%m%d"), suffix)
}

/// Recompute an order's totals from its current items and store them.
pub(crate) async fn refresh_totals<O, I>(
    orders: &O,
    items: &I,
    order_id: &OrderId,
) -> Result<OrderTotals, DomainError>
where
    O: OrderRepository + ?Sized,
    I: OrderItemRepository + ?Sized,
{
    let lines = items.find_by_order(order_id).await?;
    let totals = OrderTotals::from_items(&lines)?;
    orders.update_totals(order_id, &totals).await?;

    tracing::debug!(
        order_id = %order_id,
        items = lines.len(),
        total_amount = %totals.total_amount,
        "Recomputed order totals"
    );
    Ok(totals)
}

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }
    Ok(())
}

/// Service for managing orders
pub struct OrderService<O, I, V, C, T, H>
where
    O: OrderRepository,
    I: OrderItemRepository,
    V: InventoryRepository,
    C: CounterpartyRepository,
    T: TrackingRepository,
    H: ChangeHistoryRepository,
{
    orders: Arc<O>,
    items: Arc<I>,
    inventory: Arc<V>,
    counterparties: Arc<C>,
    tracking: Arc<T>,
    history: Arc<H>,
}

impl<O, I, V, C, T, H> OrderService<O, I, V, C, T, H>
where
    O: OrderRepository,
    I: OrderItemRepository,
    V: InventoryRepository,
    C: CounterpartyRepository,
    T: TrackingRepository,
    H: ChangeHistoryRepository,
{
    pub fn new(
        orders: Arc<O>,
        items: Arc<I>,
        inventory: Arc<V>,
        counterparties: Arc<C>,
        tracking: Arc<T>,
        history: Arc<H>,
    ) -> Self {
        Self {
            orders,
            items,
            inventory,
            counterparties,
            tracking,
            history,
        }
    }

    async fn ensure_counterparty(&self, id: Option<CounterpartyId>) -> Result<(), AppError> {
        if let Some(id) = id {
            if self.counterparties.find_by_id(&id).await?.is_none() {
                return Err(AppError::Domain(DomainError::Validation(format!(
                    "Counterparty {} does not exist",
                    id
                ))));
            }
        }
        Ok(())
    }

    async fn next_order_number(&self) -> Result<String, AppError> {
        for _ in 0..ORDER_NUMBER_ATTEMPTS {
            let candidate = generate_order_number();
            if self.orders.find_by_number(&candidate).await?.is_none() {
                return Ok(candidate);
            }
        }
        Err(AppError::Internal(
            "Could not allocate a free order number".to_string(),
        ))
    }

    /// Create an order with zero totals in status `new`
    pub async fn create(
        &self,
        input: CreateOrder,
        actor: Option<AdminUserId>,
    ) -> Result<Order, AppError> {
        require_text("Origin", &input.origin)?;
        require_text("Destination", &input.destination)?;
        self.ensure_counterparty(input.counterparty_id).await?;

        let order_number = match input.order_number.map(|n| n.trim().to_string()) {
            Some(number) if !number.is_empty() => {
                if self.orders.find_by_number(&number).await?.is_some() {
                    return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                        "Order number {}",
                        number
                    ))));
                }
                number
            }
            _ => self.next_order_number().await?,
        };

        let order = self
            .orders
            .create(&NewOrder {
                order_number,
                counterparty_id: input.counterparty_id,
                origin: input.origin.trim().to_string(),
                destination: input.destination.trim().to_string(),
                transport_type: input.transport_type,
                comment: input.comment,
                created_by: actor,
            })
            .await?;

        record_history(
            self.history.as_ref(),
            vec![lifecycle_entry(&order, ChangeAction::Create, actor)],
        )
        .await;

        tracing::info!(order_id = %order.id, order_number = %order.order_number, "Order created");
        Ok(order)
    }

    /// Get an order by ID
    pub async fn get(&self, id: &OrderId) -> Result<Order, AppError> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {}", id)))
    }

    /// Get an order with its items
    pub async fn get_with_items(&self, id: &OrderId) -> Result<OrderDetails, AppError> {
        let order = self.get(id).await?;
        let items = self.items.find_by_order(id).await?;
        Ok(OrderDetails { order, items })
    }

    /// List orders and the total number matching the filter
    pub async fn list(&self, filter: &OrderFilter) -> Result<(Vec<Order>, u64), AppError> {
        let orders = self.orders.list(filter).await?;
        let total = self.orders.count(filter).await?;
        Ok((orders, total))
    }

    /// Edit header fields of an open order
    pub async fn update(
        &self,
        id: &OrderId,
        changes: OrderChanges,
        actor: Option<AdminUserId>,
    ) -> Result<Order, AppError> {
        let before = self.get(id).await?;
        if !before.is_editable() {
            return Err(AppError::Domain(DomainError::Conflict(format!(
                "Order {} is {} and can no longer be edited",
                before.order_number, before.status
            ))));
        }
        if let Some(origin) = &changes.origin {
            require_text("Origin", origin)?;
        }
        if let Some(destination) = &changes.destination {
            require_text("Destination", destination)?;
        }
        if let Some(counterparty_id) = changes.counterparty_id {
            self.ensure_counterparty(counterparty_id).await?;
        }

        let mut after = before.clone();
        changes.apply(&mut after);
        let updated = self.orders.update(&after).await?;

        record_history(
            self.history.as_ref(),
            update_entries(&before, &updated, actor),
        )
        .await;

        Ok(updated)
    }

    /// Move an order to another status
    pub async fn change_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        actor: Option<AdminUserId>,
    ) -> Result<Order, AppError> {
        let before = self.get(id).await?;
        if !before.can_transition_to(status) {
            return Err(AppError::Domain(DomainError::Conflict(format!(
                "Order {} cannot move from {} to {}",
                before.order_number, before.status, status
            ))));
        }

        let mut after = before.clone();
        after.status = status;
        let updated = self.orders.update(&after).await?;

        record_history(
            self.history.as_ref(),
            update_entries(&before, &updated, actor),
        )
        .await;

        tracing::info!(
            order_id = %id,
            from = %before.status,
            to = %status,
            "Order status changed"
        );
        Ok(updated)
    }

    /// Delete an order that has not shipped anything from stock.
    ///
    /// Reservations held by its items are released and its tracking codes
    /// removed.
    pub async fn delete(&self, id: &OrderId, actor: Option<AdminUserId>) -> Result<(), AppError> {
        let order = self.get(id).await?;
        let items = self.items.find_by_order(id).await?;

        if items.iter().any(|i| i.is_fulfilled()) {
            return Err(AppError::Domain(DomainError::Conflict(format!(
                "Order {} has shipped items and cannot be deleted",
                order.order_number
            ))));
        }

        let mut entries = Vec::with_capacity(items.len() + 1);
        for item in &items {
            let reserved = item.reserved_quantity();
            if let Some(inventory_id) = item.inventory_id.filter(|_| reserved > 0) {
                self.inventory.release(&inventory_id, reserved).await?;
            }
            self.items.delete(&item.id).await?;
            entries.push(lifecycle_entry(item, ChangeAction::Delete, actor));
        }

        self.tracking.delete_by_order(id).await?;
        self.orders.delete(id).await?;
        entries.push(lifecycle_entry(&order, ChangeAction::Delete, actor));

        record_history(self.history.as_ref(), entries).await;

        tracing::info!(order_id = %id, items = items.len(), "Order deleted");
        Ok(())
    }

    /// Recompute and store totals, returning the refreshed order
    pub async fn recalculate(&self, id: &OrderId) -> Result<Order, AppError> {
        self.get(id).await?;
        refresh_totals(self.orders.as_ref(), self.items.as_ref(), id).await?;
        self.get(id).await
    }
}
