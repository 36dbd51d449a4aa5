//! PostgreSQL adapter for TrackingRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::entities::{CustomerTracking, OrderId, TrackingId};
use crate::domain::ports::TrackingRepository;
use crate::entity::customer_tracking;
use crate::error::DomainError;

/// PostgreSQL implementation of TrackingRepository
pub struct PostgresTrackingRepository {
    db: DatabaseConnection,
}

impl PostgresTrackingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TrackingRepository for PostgresTrackingRepository {
    async fn find_by_id(&self, id: &TrackingId) -> Result<Option<CustomerTracking>, DomainError> {
        let result = customer_tracking::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<CustomerTracking>, DomainError> {
        let result = customer_tracking::Entity::find()
            .filter(customer_tracking::Column::TrackingCode.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_order(
        &self,
        order_id: &OrderId,
    ) -> Result<Vec<CustomerTracking>, DomainError> {
        let results = customer_tracking::Entity::find()
            .filter(customer_tracking::Column::OrderId.eq(order_id.0))
            .order_by_desc(customer_tracking::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(
        &self,
        code: &str,
        order_id: &OrderId,
    ) -> Result<CustomerTracking, DomainError> {
        let model = customer_tracking::ActiveModel {
            id: Set(Uuid::new_v4()),
            tracking_code: Set(code.to_string()),
            order_id: Set(order_id.0),
            is_active: Set(true),
            created_at: Set(Utc::now().fixed_offset()),
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            let msg = e.to_string();
            if msg.contains("duplicate key") {
                DomainError::AlreadyExists(format!("Tracking code {}", code))
            } else {
                DomainError::Database(msg)
            }
        })?;

        Ok(result.into())
    }

    async fn deactivate(&self, id: &TrackingId) -> Result<(), DomainError> {
        customer_tracking::ActiveModel {
            id: Set(id.0),
            is_active: Set(false),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete_by_order(&self, order_id: &OrderId) -> Result<(), DomainError> {
        customer_tracking::Entity::delete_many()
            .filter(customer_tracking::Column::OrderId.eq(order_id.0))
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }
}

/// Convert SeaORM model to domain entity
impl From<customer_tracking::Model> for CustomerTracking {
    fn from(model: customer_tracking::Model) -> Self {
        CustomerTracking {
            id: TrackingId(model.id),
            tracking_code: model.tracking_code,
            order_id: OrderId(model.order_id),
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
