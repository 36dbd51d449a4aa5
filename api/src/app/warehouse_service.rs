//! Warehouse service

use std::sync::Arc;

use crate::app::history_service::record_history;
use crate::domain::entities::{
    lifecycle_entry, update_entries, AdminUserId, ChangeAction, NewWarehouse, Warehouse,
    WarehouseChanges, WarehouseId,
};
use crate::domain::ports::{ChangeHistoryRepository, InventoryRepository, WarehouseRepository};
use crate::error::{AppError, DomainError};

pub struct WarehouseService<W, V, H>
where
    W: WarehouseRepository,
    V: InventoryRepository,
    H: ChangeHistoryRepository,
{
    warehouses: Arc<W>,
    inventory: Arc<V>,
    history: Arc<H>,
}

impl<W, V, H> WarehouseService<W, V, H>
where
    W: WarehouseRepository,
    V: InventoryRepository,
    H: ChangeHistoryRepository,
{
    pub fn new(warehouses: Arc<W>, inventory: Arc<V>, history: Arc<H>) -> Self {
        Self {
            warehouses,
            inventory,
            history,
        }
    }

    async fn ensure_name_free(&self, name: &str, except: Option<WarehouseId>) -> Result<(), AppError> {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("Warehouse name is required".to_string()));
        }
        match self.warehouses.find_by_name(name.trim()).await? {
            Some(existing) if Some(existing.id) != except => Err(AppError::Domain(
                DomainError::AlreadyExists(format!("Warehouse '{}'", name.trim())),
            )),
            _ => Ok(()),
        }
    }

    pub async fn create(
        &self,
        mut input: NewWarehouse,
        actor: Option<AdminUserId>,
    ) -> Result<Warehouse, AppError> {
        self.ensure_name_free(&input.name, None).await?;
        input.name = input.name.trim().to_string();

        let warehouse = self.warehouses.create(&input).await?;
        record_history(
            self.history.as_ref(),
            vec![lifecycle_entry(&warehouse, ChangeAction::Create, actor)],
        )
        .await;

        tracing::info!(warehouse_id = %warehouse.id, name = %warehouse.name, "Warehouse created");
        Ok(warehouse)
    }

    pub async fn get(&self, id: &WarehouseId) -> Result<Warehouse, AppError> {
        self.warehouses
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Warehouse {}", id)))
    }

    pub async fn list(&self, active_only: bool) -> Result<Vec<Warehouse>, AppError> {
        Ok(self.warehouses.list(active_only).await?)
    }

    pub async fn update(
        &self,
        id: &WarehouseId,
        mut changes: WarehouseChanges,
        actor: Option<AdminUserId>,
    ) -> Result<Warehouse, AppError> {
        let before = self.get(id).await?;
        if let Some(name) = changes.name.take() {
            self.ensure_name_free(&name, Some(before.id)).await?;
            changes.name = Some(name.trim().to_string());
        }

        let mut after = before.clone();
        changes.apply(&mut after);
        let saved = self.warehouses.update(&after).await?;

        record_history(self.history.as_ref(), update_entries(&before, &saved, actor)).await;
        Ok(saved)
    }

    /// Delete an empty warehouse
    pub async fn delete(&self, id: &WarehouseId, actor: Option<AdminUserId>) -> Result<(), AppError> {
        let warehouse = self.get(id).await?;

        let rows = self.inventory.count_by_warehouse(id).await?;
        if rows > 0 {
            return Err(AppError::Domain(DomainError::Conflict(format!(
                "Warehouse '{}' still holds {} inventory row(s)",
                warehouse.name, rows
            ))));
        }

        self.warehouses.delete(id).await?;
        record_history(
            self.history.as_ref(),
            vec![lifecycle_entry(&warehouse, ChangeAction::Delete, actor)],
        )
        .await;

        tracing::info!(warehouse_id = %id, "Warehouse deleted");
        Ok(())
    }
}
