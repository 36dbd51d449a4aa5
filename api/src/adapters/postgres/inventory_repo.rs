//! PostgreSQL adapter for InventoryRepository
//!
//! Stock movements are single conditional UPDATE statements so concurrent
//! reservations can never drive `available_quantity` below zero.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, Statement,
};
use uuid::Uuid;

use crate::domain::entities::{
    CounterpartyId, InventoryFilter, InventoryId, InventoryItem, NewInventoryItem, WarehouseId,
};
use crate::domain::ports::InventoryRepository;
use crate::entity::warehouse_inventory;
use crate::error::DomainError;

/// PostgreSQL implementation of InventoryRepository
pub struct PostgresInventoryRepository {
    db: DatabaseConnection,
}

impl PostgresInventoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Run a guarded stock update binding `$1 = quantity, $2 = id`. Zero
    /// affected rows means either the row is gone or the guard failed; the
    /// two are told apart with a lookup.
    async fn guarded_update(
        &self,
        sql: &str,
        id: &InventoryId,
        quantity: i32,
        conflict: impl FnOnce() -> String,
    ) -> Result<(), DomainError> {
        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            sql,
            [quantity.into(), id.0.into()],
        );

        let result = self
            .db
            .execute(stmt)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if result.rows_affected() > 0 {
            return Ok(());
        }

        match self.find_by_id(id).await? {
            Some(_) => Err(DomainError::Conflict(conflict())),
            None => Err(DomainError::NotFound(format!("Inventory item {}", id))),
        }
    }
}

fn require_positive(quantity: i32) -> Result<(), DomainError> {
    if quantity <= 0 {
        return Err(DomainError::Validation(
            "Stock movement must be positive".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl InventoryRepository for PostgresInventoryRepository {
    async fn find_by_id(&self, id: &InventoryId) -> Result<Option<InventoryItem>, DomainError> {
        let result = warehouse_inventory::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(&self, filter: &InventoryFilter) -> Result<Vec<InventoryItem>, DomainError> {
        let mut query = warehouse_inventory::Entity::find();

        if let Some(warehouse_id) = filter.warehouse_id {
            query = query.filter(warehouse_inventory::Column::WarehouseId.eq(warehouse_id.0));
        }
        if let Some(counterparty_id) = filter.counterparty_id {
            query =
                query.filter(warehouse_inventory::Column::CounterpartyId.eq(counterparty_id.0));
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(
                sea_orm::Condition::any()
                    .add(warehouse_inventory::Column::ProductName.contains(search))
                    .add(warehouse_inventory::Column::Sku.contains(search)),
            );
        }
        if filter.only_available {
            query = query.filter(warehouse_inventory::Column::AvailableQuantity.gt(0));
        }

        let results = query
            .order_by_asc(warehouse_inventory::Column::ProductName)
            .limit(filter.limit)
            .offset(filter.offset)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, item: &NewInventoryItem) -> Result<InventoryItem, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = warehouse_inventory::ActiveModel {
            id: Set(Uuid::new_v4()),
            warehouse_id: Set(item.warehouse_id.0),
            counterparty_id: Set(item.counterparty_id.map(|c| c.0)),
            product_name: Set(item.product_name.clone()),
            sku: Set(item.sku.clone()),
            description: Set(item.description.clone()),
            unit: Set(item.unit.clone()),
            quantity: Set(item.quantity),
            available_quantity: Set(item.available_quantity),
            weight: Set(item.weight),
            volume: Set(item.volume),
            arrived_at: Set(item.arrived_at.map(|t| t.fixed_offset())),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn update(&self, item: &InventoryItem) -> Result<InventoryItem, DomainError> {
        let result = warehouse_inventory::ActiveModel {
            id: Set(item.id.0),
            warehouse_id: Set(item.warehouse_id.0),
            counterparty_id: Set(item.counterparty_id.map(|c| c.0)),
            product_name: Set(item.product_name.clone()),
            sku: Set(item.sku.clone()),
            description: Set(item.description.clone()),
            unit: Set(item.unit.clone()),
            weight: Set(item.weight),
            volume: Set(item.volume),
            arrived_at: Set(item.arrived_at.map(|t| t.fixed_offset())),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn delete(&self, id: &InventoryId) -> Result<(), DomainError> {
        let result = warehouse_inventory::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound(format!("Inventory item {}", id)));
        }
        Ok(())
    }

    async fn count_by_warehouse(&self, warehouse_id: &WarehouseId) -> Result<u64, DomainError> {
        warehouse_inventory::Entity::find()
            .filter(warehouse_inventory::Column::WarehouseId.eq(warehouse_id.0))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    async fn list_low_stock(&self, threshold: i32) -> Result<Vec<InventoryItem>, DomainError> {
        let results = warehouse_inventory::Entity::find()
            .filter(warehouse_inventory::Column::AvailableQuantity.lte(threshold))
            .order_by_asc(warehouse_inventory::Column::AvailableQuantity)
            .order_by_asc(warehouse_inventory::Column::ProductName)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn adjust_stock(&self, id: &InventoryId, delta: i32) -> Result<(), DomainError> {
        if delta == 0 {
            return Err(DomainError::Validation(
                "Adjustment cannot be zero".to_string(),
            ));
        }
        self.guarded_update(
            "UPDATE warehouse_inventory \
             SET quantity = quantity + $1, available_quantity = available_quantity + $1, \
                 updated_at = NOW() \
             WHERE id = $2 AND available_quantity + $1 >= 0",
            id,
            delta,
            || format!("Cannot write off {}: more than is available", -delta),
        )
        .await
    }

    async fn reserve(&self, id: &InventoryId, quantity: i32) -> Result<(), DomainError> {
        require_positive(quantity)?;
        self.guarded_update(
            "UPDATE warehouse_inventory \
             SET available_quantity = available_quantity - $1, updated_at = NOW() \
             WHERE id = $2 AND available_quantity >= $1",
            id,
            quantity,
            || format!("Not enough stock available to reserve {}", quantity),
        )
        .await
    }

    async fn release(&self, id: &InventoryId, quantity: i32) -> Result<(), DomainError> {
        require_positive(quantity)?;
        self.guarded_update(
            "UPDATE warehouse_inventory \
             SET available_quantity = available_quantity + $1, updated_at = NOW() \
             WHERE id = $2 AND available_quantity + $1 <= quantity",
            id,
            quantity,
            || format!("Cannot release {}: more than is reserved", quantity),
        )
        .await
    }

    async fn consume(&self, id: &InventoryId, quantity: i32) -> Result<(), DomainError> {
        require_positive(quantity)?;
        self.guarded_update(
            "UPDATE warehouse_inventory \
             SET quantity = quantity - $1, updated_at = NOW() \
             WHERE id = $2 AND quantity - available_quantity >= $1",
            id,
            quantity,
            || format!("Cannot ship {}: more than is reserved", quantity),
        )
        .await
    }
}

/// Convert SeaORM model to domain entity
impl From<warehouse_inventory::Model> for InventoryItem {
    fn from(model: warehouse_inventory::Model) -> Self {
        InventoryItem {
            id: InventoryId(model.id),
            warehouse_id: WarehouseId(model.warehouse_id),
            counterparty_id: model.counterparty_id.map(CounterpartyId),
            product_name: model.product_name,
            sku: model.sku,
            description: model.description,
            unit: model.unit,
            quantity: model.quantity,
            available_quantity: model.available_quantity,
            weight: model.weight,
            volume: model.volume,
            arrived_at: model.arrived_at.map(|dt| dt.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
