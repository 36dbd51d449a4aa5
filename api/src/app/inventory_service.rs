//! Inventory service
//!
//! Warehouse stock rows. Manual edits to `quantity` keep the reserved amount
//! constant; only order items move reservations. Stock counts are changed
//! with guarded deltas on the stored row, never by writing back a snapshot.

use std::sync::Arc;

use crate::app::history_service::record_history;
use crate::domain::entities::{
    check_measures, lifecycle_entry, update_entries, AdminUserId, ChangeAction, InventoryChanges, InventoryFilter,
    InventoryId, InventoryItem, NewInventoryItem,
};
use crate::domain::ports::{
    ChangeHistoryRepository, InventoryRepository, OrderItemRepository, WarehouseRepository,
};
use crate::error::{AppError, DomainError};

/// Unit used when none is given
pub const DEFAULT_UNIT: &str = "pcs";

/// Input for creating an inventory row
#[derive(Debug, Clone)]
pub struct CreateInventoryItem {
    pub item: NewInventoryItem,
    /// Defaults to `quantity`
    pub available_quantity: Option<i32>,
}

/// Service for managing warehouse inventory
pub struct InventoryService<V, W, I, H>
where
    V: InventoryRepository,
    W: WarehouseRepository,
    I: OrderItemRepository,
    H: ChangeHistoryRepository,
{
    inventory: Arc<V>,
    warehouses: Arc<W>,
    items: Arc<I>,
    history: Arc<H>,
}

impl<V, W, I, H> InventoryService<V, W, I, H>
where
    V: InventoryRepository,
    W: WarehouseRepository,
    I: OrderItemRepository,
    H: ChangeHistoryRepository,
{
    pub fn new(inventory: Arc<V>, warehouses: Arc<W>, items: Arc<I>, history: Arc<H>) -> Self {
        Self {
            inventory,
            warehouses,
            items,
            history,
        }
    }

    /// Receive goods into an active warehouse
    pub async fn create(
        &self,
        input: CreateInventoryItem,
        actor: Option<AdminUserId>,
    ) -> Result<InventoryItem, AppError> {
        let mut new_item = input.item;

        if new_item.product_name.trim().is_empty() {
            return Err(AppError::BadRequest("Product name is required".to_string()));
        }
        if new_item.quantity < 0 {
            return Err(AppError::Domain(DomainError::Validation(
                "Quantity cannot be negative".to_string(),
            )));
        }

        check_measures(new_item.weight, new_item.volume)?;

        let warehouse = self
            .warehouses
            .find_by_id(&new_item.warehouse_id)
            .await?
            .ok_or_else(|| {
                AppError::Domain(DomainError::Validation(format!(
                    "Warehouse {} does not exist",
                    new_item.warehouse_id
                )))
            })?;
        if !warehouse.is_active {
            return Err(AppError::Domain(DomainError::Conflict(format!(
                "Warehouse '{}' is not active",
                warehouse.name
            ))));
        }

        new_item.available_quantity = input.available_quantity.unwrap_or(new_item.quantity);
        if new_item.available_quantity < 0 || new_item.available_quantity > new_item.quantity {
            return Err(AppError::Domain(DomainError::Validation(format!(
                "Available quantity {} must be between 0 and {}",
                new_item.available_quantity, new_item.quantity
            ))));
        }
        new_item.product_name = new_item.product_name.trim().to_string();
        if new_item.unit.trim().is_empty() {
            new_item.unit = DEFAULT_UNIT.to_string();
        }

        let item = self.inventory.create(&new_item).await?;

        record_history(
            self.history.as_ref(),
            vec![lifecycle_entry(&item, ChangeAction::Create, actor)],
        )
        .await;

        tracing::info!(
            inventory_id = %item.id,
            warehouse_id = %item.warehouse_id,
            quantity = item.quantity,
            "Inventory received"
        );
        Ok(item)
    }

    /// Get an inventory row by ID
    pub async fn get(&self, id: &InventoryId) -> Result<InventoryItem, AppError> {
        self.inventory
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Inventory item {}", id)))
    }

    pub async fn list(&self, filter: &InventoryFilter) -> Result<Vec<InventoryItem>, AppError> {
        Ok(self.inventory.list(filter).await?)
    }

    /// Edit descriptive fields and the physical quantity. A quantity change
    /// is applied as a delta on the stored row, so reservations made since
    /// the row was read are kept.
    pub async fn update(
        &self,
        id: &InventoryId,
        changes: InventoryChanges,
        actor: Option<AdminUserId>,
    ) -> Result<InventoryItem, AppError> {
        let before = self.get(id).await?;
        if changes
            .product_name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(AppError::BadRequest("Product name is required".to_string()));
        }

        let mut after = before.clone();
        changes.apply(&mut after)?;
        after.check_invariants()?;

        let delta = after.quantity - before.quantity;
        if delta != 0 {
            self.inventory.adjust_stock(id, delta).await?;
        }
        let saved = self.inventory.update(&after).await?;

        record_history(self.history.as_ref(), update_entries(&before, &saved, actor)).await;
        Ok(saved)
    }

    /// Receive (positive) or write off (negative) stock
    pub async fn adjust(
        &self,
        id: &InventoryId,
        delta: i32,
        actor: Option<AdminUserId>,
    ) -> Result<InventoryItem, AppError> {
        if delta == 0 {
            return Err(AppError::BadRequest("Adjustment cannot be zero".to_string()));
        }
        let before = self.get(id).await?;
        // Early answer from the snapshot; the stored row has the final say
        before.clone().adjust(delta)?;

        self.inventory.adjust_stock(id, delta).await?;
        let saved = self.get(id).await?;

        record_history(self.history.as_ref(), update_entries(&before, &saved, actor)).await;
        tracing::info!(inventory_id = %id, delta, quantity = saved.quantity, "Stock adjusted");
        Ok(saved)
    }

    /// Delete a row nobody reserves from
    pub async fn delete(&self, id: &InventoryId, actor: Option<AdminUserId>) -> Result<(), AppError> {
        let item = self.get(id).await?;

        let reserving = self.items.count_reserving(id).await?;
        if reserving > 0 {
            return Err(AppError::Domain(DomainError::Conflict(format!(
                "{} order item(s) still reserve stock from this row",
                reserving
            ))));
        }

        self.inventory.delete(id).await?;
        record_history(
            self.history.as_ref(),
            vec![lifecycle_entry(&item, ChangeAction::Delete, actor)],
        )
        .await;

        tracing::info!(inventory_id = %id, "Inventory row deleted");
        Ok(())
    }

    /// Rows with `available_quantity <= threshold`
    pub async fn low_stock(&self, threshold: i32) -> Result<Vec<InventoryItem>, AppError> {
        if threshold < 0 {
            return Err(AppError::BadRequest(
                "Threshold cannot be negative".to_string(),
            ));
        }
        Ok(self.inventory.list_low_stock(threshold).await?)
    }
}
