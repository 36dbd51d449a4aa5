//! PostgreSQL adapter for WarehouseRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::entities::{NewWarehouse, Warehouse, WarehouseId};
use crate::domain::ports::WarehouseRepository;
use crate::entity::warehouses;
use crate::error::DomainError;

/// PostgreSQL implementation of WarehouseRepository
pub struct PostgresWarehouseRepository {
    db: DatabaseConnection,
}

impl PostgresWarehouseRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WarehouseRepository for PostgresWarehouseRepository {
    async fn find_by_id(&self, id: &WarehouseId) -> Result<Option<Warehouse>, DomainError> {
        let result = warehouses::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Warehouse>, DomainError> {
        let result = warehouses::Entity::find()
            .filter(warehouses::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(&self, active_only: bool) -> Result<Vec<Warehouse>, DomainError> {
        let mut query = warehouses::Entity::find();
        if active_only {
            query = query.filter(warehouses::Column::IsActive.eq(true));
        }

        let results = query
            .order_by_asc(warehouses::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, warehouse: &NewWarehouse) -> Result<Warehouse, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = warehouses::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(warehouse.name.clone()),
            address: Set(warehouse.address.clone()),
            city: Set(warehouse.city.clone()),
            country: Set(warehouse.country.clone()),
            phone: Set(warehouse.phone.clone()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn update(&self, warehouse: &Warehouse) -> Result<Warehouse, DomainError> {
        let result = warehouses::ActiveModel {
            id: Set(warehouse.id.0),
            name: Set(warehouse.name.clone()),
            address: Set(warehouse.address.clone()),
            city: Set(warehouse.city.clone()),
            country: Set(warehouse.country.clone()),
            phone: Set(warehouse.phone.clone()),
            is_active: Set(warehouse.is_active),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn delete(&self, id: &WarehouseId) -> Result<(), DomainError> {
        let result = warehouses::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound(format!("Warehouse {}", id)));
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        warehouses::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }
}

/// Convert SeaORM model to domain entity
impl From<warehouses::Model> for Warehouse {
    fn from(model: warehouses::Model) -> Self {
        Warehouse {
            id: WarehouseId(model.id),
            name: model.name,
            address: model.address,
            city: model.city,
            country: model.country,
            phone: model.phone,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
