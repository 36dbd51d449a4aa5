//! PostgreSQL adapter for ChangeHistoryRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::domain::entities::{
    AdminUserId, ChangeAction, ChangeHistory, ChangeHistoryId, EntityType, NewChangeHistory,
};
use crate::domain::ports::ChangeHistoryRepository;
use crate::entity::change_history;
use crate::error::DomainError;

/// PostgreSQL implementation of ChangeHistoryRepository
pub struct PostgresChangeHistoryRepository {
    db: DatabaseConnection,
}

impl PostgresChangeHistoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ChangeHistoryRepository for PostgresChangeHistoryRepository {
    async fn record(&self, entries: &[NewChangeHistory]) -> Result<(), DomainError> {
        if entries.is_empty() {
            return Ok(());
        }

        let now = Utc::now().fixed_offset();
        let models = entries.iter().map(|entry| change_history::ActiveModel {
            id: Set(Uuid::new_v4()),
            entity_type: Set(entry.entity_type.to_string()),
            entity_id: Set(entry.entity_id),
            action: Set(entry.action.to_string()),
            field: Set(entry.field.clone()),
            old_value: Set(entry.old_value.clone()),
            new_value: Set(entry.new_value.clone()),
            changed_by: Set(entry.changed_by.map(|u| u.0)),
            changed_at: Set(now),
        });

        change_history::Entity::insert_many(models)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn list_by_entity(
        &self,
        entity_type: EntityType,
        entity_id: &Uuid,
    ) -> Result<Vec<ChangeHistory>, DomainError> {
        let results = change_history::Entity::find()
            .filter(change_history::Column::EntityType.eq(entity_type.to_string()))
            .filter(change_history::Column::EntityId.eq(*entity_id))
            .order_by_desc(change_history::Column::ChangedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn list_recent(
        &self,
        entity_type: Option<EntityType>,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<ChangeHistory>, DomainError> {
        let mut query = change_history::Entity::find();
        if let Some(entity_type) = entity_type {
            query = query.filter(change_history::Column::EntityType.eq(entity_type.to_string()));
        }

        let results = query
            .order_by_desc(change_history::Column::ChangedAt)
            .limit(limit)
            .offset(offset)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

/// Convert SeaORM model to domain entity
impl From<change_history::Model> for ChangeHistory {
    fn from(model: change_history::Model) -> Self {
        ChangeHistory {
            id: ChangeHistoryId(model.id),
            entity_type: model.entity_type.parse().unwrap_or(EntityType::Order),
            entity_id: model.entity_id,
            action: model.action.parse().unwrap_or(ChangeAction::Update),
            field: model.field,
            old_value: model.old_value,
            new_value: model.new_value,
            changed_by: model.changed_by.map(AdminUserId),
            changed_at: model.changed_at.with_timezone(&Utc),
        }
    }
}
