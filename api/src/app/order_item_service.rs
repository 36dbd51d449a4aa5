//! Order item service
//!
//! The cargo-line lifecycle. Every mutation follows the same sequence:
//! validate against the parent order, move stock, persist the line, recompute
//! the order totals, then append to the change history.
//!
//! Stock accounting for lines sourced from warehouse inventory:
//! - while unfulfilled, a line holds `quantity` units reserved
//!   (taken out of `available_quantity`);
//! - leaving `pending` fulfills the line once: the reserved units leave the
//!   warehouse (`quantity` drops) and `fulfilled_at` is set;
//! - a fulfilled line never gives stock back.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use crate::app::history_service::record_history;
use crate::app::order_service::refresh_totals;
use crate::domain::entities::{
    check_column, lifecycle_entry, update_entries, AdminUserId, ChangeAction, InventoryId,
    NewOrderItem, Order, OrderId, OrderItem, OrderItemChanges, OrderItemId, OrderTotals,
    PaymentStatus, TransportStatus, MONEY_SCALE,
};
use crate::domain::ports::{
    ChangeHistoryRepository, InventoryRepository, OrderItemRepository, OrderRepository,
};
use crate::error::{AppError, DomainError};

/// A single change to warehouse stock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockMove {
    Reserve(InventoryId, i32),
    Release(InventoryId, i32),
    Consume(InventoryId, i32),
}

/// Reservation changes needed to go from `before` to `after`.
///
/// When the source row changes, the new reservation comes first so a failure
/// leaves the old one untouched.
pub fn reservation_moves(before: &OrderItem, after: &OrderItem) -> Vec<StockMove> {
    let old = before.reserved_quantity();
    let new = after.reserved_quantity();

    match (before.inventory_id, after.inventory_id) {
        (Some(from), Some(to)) if from == to => match new - old {
            delta if delta > 0 => vec![StockMove::Reserve(to, delta)],
            delta if delta < 0 => vec![StockMove::Release(to, -delta)],
            _ => Vec::new(),
        },
        (from, to) => {
            let mut moves = Vec::new();
            if let Some(to) = to.filter(|_| new > 0) {
                moves.push(StockMove::Reserve(to, new));
            }
            if let Some(from) = from.filter(|_| old > 0) {
                moves.push(StockMove::Release(from, old));
            }
            moves
        }
    }
}

async fn apply_move<V>(inventory: &V, stock_move: StockMove) -> Result<(), DomainError>
where
    V: InventoryRepository + ?Sized,
{
    match stock_move {
        StockMove::Reserve(id, qty) => inventory.reserve(&id, qty).await,
        StockMove::Release(id, qty) => inventory.release(&id, qty).await,
        StockMove::Consume(id, qty) => inventory.consume(&id, qty).await,
    }
}

/// Apply stock moves in order. On failure, moves already applied are undone
/// in reverse. Consumption is always last and therefore never undone.
pub(crate) async fn apply_moves<V>(inventory: &V, moves: &[StockMove]) -> Result<(), AppError>
where
    V: InventoryRepository + ?Sized,
{
    for (applied, stock_move) in moves.iter().enumerate() {
        if let Err(e) = apply_move(inventory, *stock_move).await {
            if matches!(e, DomainError::Conflict(_)) {
                tracing::warn!(?stock_move, error = %e, "Stock movement rejected");
            }

            for undo in moves[..applied].iter().rev() {
                let inverse = match *undo {
                    StockMove::Reserve(id, qty) => StockMove::Release(id, qty),
                    StockMove::Release(id, qty) => StockMove::Reserve(id, qty),
                    StockMove::Consume(..) => continue,
                };
                if let Err(undo_err) = apply_move(inventory, inverse).await {
                    tracing::error!(?inverse, error = %undo_err, "Failed to undo stock movement");
                }
            }
            return Err(e.into());
        }
    }
    Ok(())
}

/// Service for managing order items
pub struct OrderItemService<O, I, V, H>
where
    O: OrderRepository,
    I: OrderItemRepository,
    V: InventoryRepository,
    H: ChangeHistoryRepository,
{
    orders: Arc<O>,
    items: Arc<I>,
    inventory: Arc<V>,
    history: Arc<H>,
}

impl<O, I, V, H> OrderItemService<O, I, V, H>
where
    O: OrderRepository,
    I: OrderItemRepository,
    V: InventoryRepository,
    H: ChangeHistoryRepository,
{
    pub fn new(orders: Arc<O>, items: Arc<I>, inventory: Arc<V>, history: Arc<H>) -> Self {
        Self {
            orders,
            items,
            inventory,
            history,
        }
    }

    /// Load the parent order and make sure its lines may still change
    async fn open_order(&self, order_id: &OrderId) -> Result<Order, AppError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {}", order_id)))?;

        if !order.is_editable() {
            return Err(AppError::Domain(DomainError::Conflict(format!(
                "Order {} is {}; its items can no longer change",
                order.order_number, order.status
            ))));
        }
        Ok(order)
    }

    /// Check that a stock source exists and can cover `quantity`
    async fn check_source(&self, id: &InventoryId, quantity: i32) -> Result<(), AppError> {
        let row = self.inventory.find_by_id(id).await?.ok_or_else(|| {
            AppError::Domain(DomainError::Validation(format!(
                "Inventory item {} does not exist",
                id
            )))
        })?;

        if row.available_quantity < quantity {
            return Err(AppError::Domain(DomainError::Conflict(format!(
                "Only {} {} of '{}' available, {} requested",
                row.available_quantity, row.unit, row.product_name, quantity
            ))));
        }
        Ok(())
    }

    /// Make sure the order totals still fit once `line` is stored
    async fn check_order_totals(&self, line: &OrderItem) -> Result<(), AppError> {
        let mut lines = self.items.find_by_order(&line.order_id).await?;
        match lines.iter_mut().find(|existing| existing.id == line.id) {
            Some(existing) => *existing = line.clone(),
            None => lines.push(line.clone()),
        }
        OrderTotals::from_items(&lines)?;
        Ok(())
    }

    /// Get an item by ID
    pub async fn get(&self, id: &OrderItemId) -> Result<OrderItem, AppError> {
        self.items
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order item {}", id)))
    }

    /// Items of an order, oldest first
    pub async fn list_for_order(&self, order_id: &OrderId) -> Result<Vec<OrderItem>, AppError> {
        if self.orders.find_by_id(order_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Order {}", order_id)));
        }
        Ok(self.items.find_by_order(order_id).await?)
    }

    /// Add a cargo line, reserving stock when it is sourced from inventory
    pub async fn add(
        &self,
        input: NewOrderItem,
        actor: Option<AdminUserId>,
    ) -> Result<OrderItem, AppError> {
        self.open_order(&input.order_id).await?;

        if input.product_name.trim().is_empty() {
            return Err(AppError::BadRequest("Product name is required".to_string()));
        }

        let now = Utc::now();
        let mut item = OrderItem {
            id: OrderItemId::new(),
            order_id: input.order_id,
            inventory_id: input.inventory_id,
            product_name: input.product_name.trim().to_string(),
            description: input.description,
            quantity: input.quantity,
            unit_price: input.unit_price,
            total_amount: Decimal::ZERO,
            weight: input.weight,
            volume: input.volume,
            transport_status: TransportStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            paid_amount: input.paid_amount,
            remaining_amount: Decimal::ZERO,
            fulfilled_at: None,
            created_at: now,
            updated_at: now,
        };
        item.recalculate()?;
        self.check_order_totals(&item).await?;

        let moves = match item.inventory_id {
            Some(source) => {
                self.check_source(&source, item.quantity).await?;
                vec![StockMove::Reserve(source, item.quantity)]
            }
            None => Vec::new(),
        };
        apply_moves(self.inventory.as_ref(), &moves).await?;

        let created = match self.items.create(&item).await {
            Ok(created) => created,
            Err(e) => {
                if let Some(source) = item.inventory_id {
                    if let Err(undo) = self.inventory.release(&source, item.quantity).await {
                        tracing::error!(inventory_id = %source, error = %undo, "Failed to release reservation");
                    }
                }
                return Err(e.into());
            }
        };

        refresh_totals(self.orders.as_ref(), self.items.as_ref(), &created.order_id).await?;
        record_history(
            self.history.as_ref(),
            vec![lifecycle_entry(&created, ChangeAction::Create, actor)],
        )
        .await;

        tracing::info!(
            order_id = %created.order_id,
            item_id = %created.id,
            inventory_id = ?created.inventory_id,
            quantity = created.quantity,
            "Order item added"
        );
        Ok(created)
    }

    /// Edit a cargo line. Quantity and source changes move the reservation;
    /// leaving `pending` fulfills an inventory-sourced line.
    pub async fn update(
        &self,
        id: &OrderItemId,
        changes: OrderItemChanges,
        actor: Option<AdminUserId>,
    ) -> Result<OrderItem, AppError> {
        let before = self.get(id).await?;
        self.open_order(&before.order_id).await?;

        if before.is_fulfilled() && changes.touches_stock(&before) {
            return Err(AppError::Domain(DomainError::Conflict(
                "Item has already left the warehouse; quantity and source are fixed".to_string(),
            )));
        }
        if changes
            .product_name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(AppError::BadRequest("Product name is required".to_string()));
        }

        let mut after = before.clone();
        changes.apply(&mut after);
        after.recalculate()?;
        self.check_order_totals(&after).await?;

        if let Some(source) = after.inventory_id.filter(|s| before.inventory_id != Some(*s)) {
            self.check_source(&source, after.quantity).await?;
        }

        let mut moves = reservation_moves(&before, &after);
        if let Some(next) = changes.transport_status {
            if let Some(source) = after.inventory_id.filter(|_| after.fulfills_on(next)) {
                moves.push(StockMove::Consume(source, after.quantity));
                after.fulfilled_at = Some(Utc::now());
            }
            after.transport_status = next;
        }

        apply_moves(self.inventory.as_ref(), &moves).await?;
        let updated = self.items.update(&after).await.map_err(|e| {
            tracing::error!(item_id = %id, ?moves, error = %e, "Item not saved after stock moved");
            e
        })?;

        refresh_totals(self.orders.as_ref(), self.items.as_ref(), &updated.order_id).await?;
        record_history(
            self.history.as_ref(),
            update_entries(&before, &updated, actor),
        )
        .await;

        if updated.fulfilled_at != before.fulfilled_at {
            tracing::info!(
                item_id = %id,
                inventory_id = ?updated.inventory_id,
                quantity = updated.quantity,
                "Order item fulfilled from stock"
            );
        }
        Ok(updated)
    }

    /// Add a payment to a line. The amount is added in storage, so concurrent
    /// payments never overwrite each other.
    pub async fn record_payment(
        &self,
        id: &OrderItemId,
        amount: Decimal,
        actor: Option<AdminUserId>,
    ) -> Result<OrderItem, AppError> {
        if amount <= Decimal::ZERO {
            return Err(AppError::Domain(DomainError::Validation(
                "Payment amount must be positive".to_string(),
            )));
        }
        check_column("Payment amount", amount, MONEY_SCALE)?;

        let before = self.get(id).await?;
        self.open_order(&before.order_id).await?;

        let updated = self.items.add_payment(id, amount).await?;

        refresh_totals(self.orders.as_ref(), self.items.as_ref(), &updated.order_id).await?;
        record_history(
            self.history.as_ref(),
            update_entries(&before, &updated, actor),
        )
        .await;

        tracing::info!(
            item_id = %id,
            amount = %amount,
            payment_status = %updated.payment_status,
            "Payment recorded"
        );
        Ok(updated)
    }

    /// Ship a pending line
    pub async fn fulfill(
        &self,
        id: &OrderItemId,
        actor: Option<AdminUserId>,
    ) -> Result<OrderItem, AppError> {
        let item = self.get(id).await?;
        if item.transport_status != TransportStatus::Pending {
            return Err(AppError::Domain(DomainError::Conflict(format!(
                "Item is already {}",
                item.transport_status
            ))));
        }

        self.update(
            id,
            OrderItemChanges {
                transport_status: Some(TransportStatus::Shipped),
                ..Default::default()
            },
            actor,
        )
        .await
    }

    /// Remove a line. Unfulfilled lines give their reservation back.
    pub async fn delete(&self, id: &OrderItemId, actor: Option<AdminUserId>) -> Result<(), AppError> {
        let item = self.get(id).await?;
        self.open_order(&item.order_id).await?;

        let reserved = item.reserved_quantity();
        if let Some(source) = item.inventory_id.filter(|_| reserved > 0) {
            self.inventory.release(&source, reserved).await?;
        }
        self.items.delete(id).await?;

        refresh_totals(self.orders.as_ref(), self.items.as_ref(), &item.order_id).await?;
        record_history(
            self.history.as_ref(),
            vec![lifecycle_entry(&item, ChangeAction::Delete, actor)],
        )
        .await;

        tracing::info!(order_id = %item.order_id, item_id = %id, released = reserved, "Order item deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{InventoryItem, OrderStatus, MAX_LINE_QUANTITY};
    use crate::test_utils::*;
    use rust_decimal_macros::dec;

    type TestService = OrderItemService<
        InMemoryOrderRepository,
        InMemoryOrderItemRepository,
        InMemoryInventoryRepository,
        InMemoryChangeHistoryRepository,
    >;

    struct Harness {
        service: TestService,
        order: Order,
        row: InventoryItem,
        orders: Arc<InMemoryOrderRepository>,
        items: Arc<InMemoryOrderItemRepository>,
        inventory: Arc<InMemoryInventoryRepository>,
        history: Arc<InMemoryChangeHistoryRepository>,
    }

    fn harness_with(order: Order) -> Harness {
        let row = test_inventory_item(test_warehouse().id);
        let orders = Arc::new(InMemoryOrderRepository::new().with_order(order.clone()));
        let items = Arc::new(InMemoryOrderItemRepository::new());
        let inventory = Arc::new(InMemoryInventoryRepository::new().with_row(row.clone()));
        let history = Arc::new(InMemoryChangeHistoryRepository::new());
        let service = OrderItemService::new(
            orders.clone(),
            items.clone(),
            inventory.clone(),
            history.clone(),
        );
        Harness {
            service,
            order,
            row,
            orders,
            items,
            inventory,
            history,
        }
    }

    fn harness() -> Harness {
        harness_with(test_order())
    }

    fn new_line(order_id: OrderId, inventory_id: Option<InventoryId>, quantity: i32) -> NewOrderItem {
        NewOrderItem {
            order_id,
            inventory_id,
            product_name: "LED panel 60x60".to_string(),
            description: None,
            quantity,
            unit_price: dec!(12.50),
            weight: dec!(4.25) * Decimal::from(quantity),
            volume: dec!(0.036) * Decimal::from(quantity),
            paid_amount: Decimal::ZERO,
        }
    }

    fn stock(h: &Harness) -> InventoryItem {
        h.inventory.get(&h.row.id).unwrap()
    }

    #[test]
    fn moves_for_quantity_change_on_same_row() {
        let mut before = test_order_item(OrderId::new());
        let source = InventoryId::new();
        before.inventory_id = Some(source);
        let mut after = before.clone();

        after.quantity = 15;
        assert_eq!(
            reservation_moves(&before, &after),
            vec![StockMove::Reserve(source, 5)]
        );

        after.quantity = 4;
        assert_eq!(
            reservation_moves(&before, &after),
            vec![StockMove::Release(source, 6)]
        );

        after.quantity = before.quantity;
        assert!(reservation_moves(&before, &after).is_empty());
    }

    #[test]
    fn moves_for_source_change_reserve_before_release() {
        let mut before = test_order_item(OrderId::new());
        let old = InventoryId::new();
        let new = InventoryId::new();
        before.inventory_id = Some(old);
        let mut after = before.clone();
        after.inventory_id = Some(new);
        after.quantity = 12;

        assert_eq!(
            reservation_moves(&before, &after),
            vec![StockMove::Reserve(new, 12), StockMove::Release(old, 10)]
        );

        after.inventory_id = None;
        assert_eq!(
            reservation_moves(&before, &after),
            vec![StockMove::Release(old, 10)]
        );
    }

    #[test]
    fn fulfilled_lines_need_no_moves() {
        let mut before = test_order_item(OrderId::new());
        before.inventory_id = Some(InventoryId::new());
        before.fulfilled_at = Some(Utc::now());
        let mut after = before.clone();
        after.unit_price = dec!(99);

        assert!(reservation_moves(&before, &after).is_empty());
    }

    #[tokio::test]
    async fn add_reserves_stock_and_updates_totals() {
        let h = harness();

        let item = h
            .service
            .add(new_line(h.order.id, Some(h.row.id), 30), None)
            .await
            .unwrap();

        assert_eq!(item.total_amount, dec!(375.00));
        assert_eq!(item.payment_status, PaymentStatus::Unpaid);
        assert_eq!(stock(&h).available_quantity, 70);
        assert_eq!(stock(&h).quantity, 100);

        let order = h.orders.get(&h.order.id).unwrap();
        assert_eq!(order.totals.total_quantity, 30);
        assert_eq!(order.totals.total_amount, dec!(375.00));
        assert_eq!(order.totals.remaining_amount, dec!(375.00));
        assert_eq!(h.history.entries_for(item.id.0).len(), 1);
    }

    #[tokio::test]
    async fn add_without_enough_stock_is_a_conflict() {
        let h = harness();

        let err = h
            .service
            .add(new_line(h.order.id, Some(h.row.id), 101), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Domain(DomainError::Conflict(_))));
        assert_eq!(stock(&h).available_quantity, 100);
        assert!(h.items.find_by_order(&h.order.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_with_unknown_source_fails_validation() {
        let h = harness();

        let err = h
            .service
            .add(new_line(h.order.id, Some(InventoryId::new()), 1), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Domain(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn add_rejects_overpayment_and_bad_numbers() {
        let h = harness();

        let mut overpaid = new_line(h.order.id, None, 2);
        overpaid.paid_amount = dec!(25.01);
        assert!(h.service.add(overpaid, None).await.is_err());

        let zero = new_line(h.order.id, None, 0);
        assert!(h.service.add(zero, None).await.is_err());

        let mut negative_price = new_line(h.order.id, None, 1);
        negative_price.unit_price = dec!(-1);
        assert!(h.service.add(negative_price, None).await.is_err());
    }

    #[tokio::test]
    async fn closed_orders_reject_new_items() {
        let h = harness_with(test_order_with_status(OrderStatus::Cancelled));

        let err = h
            .service
            .add(new_line(h.order.id, None, 1), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Domain(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn quantity_change_adjusts_reservation_by_delta() {
        let h = harness();
        let item = h
            .service
            .add(new_line(h.order.id, Some(h.row.id), 10), None)
            .await
            .unwrap();

        h.service
            .update(
                &item.id,
                OrderItemChanges {
                    quantity: Some(25),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(stock(&h).available_quantity, 75);

        h.service
            .update(
                &item.id,
                OrderItemChanges {
                    quantity: Some(5),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(stock(&h).available_quantity, 95);
        assert_eq!(h.orders.get(&h.order.id).unwrap().totals.total_quantity, 5);
    }

    #[tokio::test]
    async fn switching_source_moves_reservation() {
        let h = harness();
        let item = h
            .service
            .add(new_line(h.order.id, Some(h.row.id), 10), None)
            .await
            .unwrap();

        // Unknown row: validation error, reservation untouched
        let err = h
            .service
            .update(
                &item.id,
                OrderItemChanges {
                    inventory_id: Some(Some(InventoryId::new())),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::Validation(_))));
        assert_eq!(stock(&h).available_quantity, 90);

        // Dropping the source gives the reservation back
        let updated = h
            .service
            .update(
                &item.id,
                OrderItemChanges {
                    inventory_id: Some(None),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();
        assert!(updated.inventory_id.is_none());
        assert_eq!(stock(&h).available_quantity, 100);
    }

    #[tokio::test]
    async fn fulfill_consumes_reserved_stock_once() {
        let h = harness();
        let item = h
            .service
            .add(new_line(h.order.id, Some(h.row.id), 10), None)
            .await
            .unwrap();

        let shipped = h.service.fulfill(&item.id, None).await.unwrap();

        assert_eq!(shipped.transport_status, TransportStatus::Shipped);
        assert!(shipped.fulfilled_at.is_some());
        assert_eq!(stock(&h).quantity, 90);
        assert_eq!(stock(&h).available_quantity, 90);

        // Further transport progress does not touch stock again
        h.service
            .update(
                &item.id,
                OrderItemChanges {
                    transport_status: Some(TransportStatus::Delivered),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(stock(&h).quantity, 90);
        assert_eq!(stock(&h).available_quantity, 90);

        assert!(matches!(
            h.service.fulfill(&item.id, None).await,
            Err(AppError::Domain(DomainError::Conflict(_)))
        ));
    }

    #[tokio::test]
    async fn fulfilled_items_keep_quantity_and_source() {
        let h = harness();
        let item = h
            .service
            .add(new_line(h.order.id, Some(h.row.id), 10), None)
            .await
            .unwrap();
        h.service.fulfill(&item.id, None).await.unwrap();

        let err = h
            .service
            .update(
                &item.id,
                OrderItemChanges {
                    quantity: Some(11),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::Conflict(_))));

        // Price edits are still fine
        let repriced = h
            .service
            .update(
                &item.id,
                OrderItemChanges {
                    unit_price: Some(dec!(13)),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(repriced.total_amount, dec!(130));
    }

    #[tokio::test]
    async fn payments_accumulate_and_cannot_exceed_total() {
        let h = harness();
        let item = h
            .service
            .add(new_line(h.order.id, None, 8), None)
            .await
            .unwrap();
        assert_eq!(item.total_amount, dec!(100.00));

        let partial = h
            .service
            .record_payment(&item.id, dec!(40), None)
            .await
            .unwrap();
        assert_eq!(partial.payment_status, PaymentStatus::PartiallyPaid);
        assert_eq!(partial.remaining_amount, dec!(60.00));

        let full = h
            .service
            .record_payment(&item.id, dec!(60), None)
            .await
            .unwrap();
        assert_eq!(full.payment_status, PaymentStatus::Paid);
        assert_eq!(full.remaining_amount, Decimal::ZERO);

        let order = h.orders.get(&h.order.id).unwrap();
        assert_eq!(order.totals.paid_amount, dec!(100.00));
        assert_eq!(
            order.totals.total_amount,
            order.totals.paid_amount + order.totals.remaining_amount
        );

        assert!(h
            .service
            .record_payment(&item.id, dec!(0.01), None)
            .await
            .is_err());
        assert!(h
            .service
            .record_payment(&item.id, dec!(-5), None)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn concurrent_payments_cannot_overpay() {
        let h = harness();
        let item = h
            .service
            .add(new_line(h.order.id, None, 8), None)
            .await
            .unwrap();

        let (first, second) = tokio::join!(
            h.service.record_payment(&item.id, dec!(60), None),
            h.service.record_payment(&item.id, dec!(60), None),
        );

        assert_eq!([first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count(), 1);
        let stored = h.items.get(&item.id).unwrap();
        assert_eq!(stored.paid_amount, dec!(60));
        assert_eq!(stored.remaining_amount, dec!(40));
        assert_eq!(h.orders.get(&h.order.id).unwrap().totals.paid_amount, dec!(60));
    }

    #[tokio::test]
    async fn payment_is_added_to_the_stored_amount() {
        let h = harness();
        let item = h
            .service
            .add(new_line(h.order.id, None, 8), None)
            .await
            .unwrap();
        // Another writer pays after this item was read
        h.items.add_payment(&item.id, dec!(30)).await.unwrap();

        let paid = h
            .service
            .record_payment(&item.id, dec!(50), None)
            .await
            .unwrap();

        assert_eq!(paid.paid_amount, dec!(80));
        assert_eq!(paid.remaining_amount, dec!(20));
        assert_eq!(paid.payment_status, PaymentStatus::PartiallyPaid);
    }

    #[tokio::test]
    async fn payment_rejects_sub_cent_and_out_of_range_amounts() {
        let h = harness();
        let item = h
            .service
            .add(new_line(h.order.id, None, 8), None)
            .await
            .unwrap();

        for amount in [dec!(0.001), dec!(10.005), Decimal::MAX] {
            let err = h
                .service
                .record_payment(&item.id, amount, None)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Domain(DomainError::Validation(_))));
        }
        assert_eq!(h.items.get(&item.id).unwrap().paid_amount, Decimal::ZERO);
    }

    #[tokio::test]
    async fn add_rejects_price_beyond_column_range() {
        let h = harness();
        let mut line = new_line(h.order.id, Some(h.row.id), 2);
        line.unit_price = Decimal::MAX;

        let err = h.service.add(line, None).await.unwrap_err();

        assert!(matches!(err, AppError::Domain(DomainError::Validation(_))));
        assert!(h.items.find_by_order(&h.order.id).await.unwrap().is_empty());
        assert_eq!(stock(&h).available_quantity, 100);
    }

    #[tokio::test]
    async fn add_rejects_values_finer_than_the_columns() {
        let h = harness();

        let mut price = new_line(h.order.id, None, 1);
        price.unit_price = dec!(12.505);
        let mut paid = new_line(h.order.id, None, 1);
        paid.paid_amount = dec!(0.001);
        let mut weight = new_line(h.order.id, None, 1);
        weight.weight = dec!(4.2505);
        let mut volume = new_line(h.order.id, None, 1);
        volume.volume = dec!(0.03605);

        for line in [price, paid, weight, volume] {
            let err = h.service.add(line, None).await.unwrap_err();
            assert!(matches!(err, AppError::Domain(DomainError::Validation(_))));
        }
        assert!(h.items.find_by_order(&h.order.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_rejects_quantity_above_line_cap() {
        let h = harness();

        let err = h
            .service
            .add(new_line(h.order.id, None, MAX_LINE_QUANTITY + 1), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Domain(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn add_rejects_order_total_beyond_column_range() {
        let h = harness();
        let mut big = new_line(h.order.id, None, 600);
        big.unit_price = dec!(999999999.99);
        big.weight = Decimal::ZERO;
        big.volume = Decimal::ZERO;
        h.service.add(big.clone(), None).await.unwrap();

        let err = h.service.add(big, None).await.unwrap_err();

        assert!(matches!(err, AppError::Domain(DomainError::Validation(_))));
        assert_eq!(h.items.find_by_order(&h.order.id).await.unwrap().len(), 1);
        let order = h.orders.get(&h.order.id).unwrap();
        assert_eq!(order.totals.total_amount, dec!(599999999994.00));
    }

    #[tokio::test]
    async fn add_rejects_order_quantity_overflow() {
        let h = harness();
        let mut stored = test_order_item(h.order.id);
        stored.quantity = i32::MAX;
        stored.unit_price = Decimal::ZERO;
        stored.total_amount = Decimal::ZERO;
        stored.remaining_amount = Decimal::ZERO;
        h.items.create(&stored).await.unwrap();

        let err = h
            .service
            .add(new_line(h.order.id, Some(h.row.id), 1), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Domain(DomainError::Validation(_))));
        assert_eq!(h.items.find_by_order(&h.order.id).await.unwrap().len(), 1);
        assert_eq!(stock(&h).available_quantity, 100);
    }

    #[tokio::test]
    async fn update_rejects_order_total_beyond_column_range() {
        let h = harness();
        let mut big = new_line(h.order.id, None, 600);
        big.unit_price = dec!(999999999.99);
        h.service.add(big, None).await.unwrap();
        let small = h
            .service
            .add(new_line(h.order.id, None, 1), None)
            .await
            .unwrap();

        let err = h
            .service
            .update(
                &small.id,
                OrderItemChanges {
                    quantity: Some(600),
                    unit_price: Some(dec!(999999999.99)),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Domain(DomainError::Validation(_))));
        let unchanged = h.items.get(&small.id).unwrap();
        assert_eq!((unchanged.quantity, unchanged.unit_price), (1, dec!(12.50)));
    }

    #[tokio::test]
    async fn price_cut_below_paid_is_rejected() {
        let h = harness();
        let item = h
            .service
            .add(new_line(h.order.id, None, 8), None)
            .await
            .unwrap();
        h.service
            .record_payment(&item.id, dec!(100), None)
            .await
            .unwrap();

        let result = h
            .service
            .update(
                &item.id,
                OrderItemChanges {
                    unit_price: Some(dec!(10)),
                    ..Default::default()
                },
                None,
            )
            .await;

        assert!(result.is_err());
        assert_eq!(h.items.get(&item.id).unwrap().unit_price, dec!(12.50));
    }

    #[tokio::test]
    async fn delete_releases_unfulfilled_reservation() {
        let h = harness();
        let item = h
            .service
            .add(new_line(h.order.id, Some(h.row.id), 10), None)
            .await
            .unwrap();

        h.service.delete(&item.id, None).await.unwrap();

        assert_eq!(stock(&h).available_quantity, 100);
        assert_eq!(h.orders.get(&h.order.id).unwrap().totals.total_quantity, 0);
        let actions: Vec<ChangeAction> = h
            .history
            .entries_for(item.id.0)
            .into_iter()
            .map(|e| e.action)
            .collect();
        assert_eq!(actions, vec![ChangeAction::Create, ChangeAction::Delete]);
    }

    #[tokio::test]
    async fn delete_of_fulfilled_item_keeps_stock_out() {
        let h = harness();
        let item = h
            .service
            .add(new_line(h.order.id, Some(h.row.id), 10), None)
            .await
            .unwrap();
        h.service.fulfill(&item.id, None).await.unwrap();

        h.service.delete(&item.id, None).await.unwrap();

        assert_eq!(stock(&h).quantity, 90);
        assert_eq!(stock(&h).available_quantity, 90);
    }

    #[tokio::test]
    async fn update_history_lists_changed_fields() {
        let h = harness();
        let item = h
            .service
            .add(new_line(h.order.id, None, 2), None)
            .await
            .unwrap();

        h.service
            .update(
                &item.id,
                OrderItemChanges {
                    product_name: Some("LED panel 60x120".to_string()),
                    quantity: Some(3),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();

        let fields: Vec<String> = h
            .history
            .entries_for(item.id.0)
            .into_iter()
            .filter_map(|e| e.field)
            .collect();
        assert_eq!(fields, vec!["product_name", "quantity"]);
    }
}
