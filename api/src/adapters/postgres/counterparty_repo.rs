//! PostgreSQL adapter for CounterpartyRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::domain::entities::{
    Counterparty, CounterpartyFilter, CounterpartyId, CounterpartyKind, NewCounterparty,
};
use crate::domain::ports::CounterpartyRepository;
use crate::entity::counterparties;
use crate::error::DomainError;

/// PostgreSQL implementation of CounterpartyRepository
pub struct PostgresCounterpartyRepository {
    db: DatabaseConnection,
}

impl PostgresCounterpartyRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CounterpartyRepository for PostgresCounterpartyRepository {
    async fn find_by_id(&self, id: &CounterpartyId) -> Result<Option<Counterparty>, DomainError> {
        let result = counterparties::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(&self, filter: &CounterpartyFilter) -> Result<Vec<Counterparty>, DomainError> {
        let mut query = counterparties::Entity::find();

        // "both" counterparties show up under either role
        if let Some(kind) = filter.kind {
            query = query.filter(
                counterparties::Column::Kind
                    .is_in([kind.to_string(), CounterpartyKind::Both.to_string()]),
            );
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            query = query.filter(
                Condition::any()
                    .add(counterparties::Column::Name.contains(search))
                    .add(counterparties::Column::ContactPerson.contains(search))
                    .add(counterparties::Column::Email.contains(search))
                    .add(counterparties::Column::TaxId.contains(search)),
            );
        }

        let results = query
            .order_by_asc(counterparties::Column::Name)
            .limit(filter.limit)
            .offset(filter.offset)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, counterparty: &NewCounterparty) -> Result<Counterparty, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = counterparties::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(counterparty.name.clone()),
            kind: Set(counterparty.kind.to_string()),
            contact_person: Set(counterparty.contact_person.clone()),
            phone: Set(counterparty.phone.clone()),
            email: Set(counterparty.email.clone()),
            address: Set(counterparty.address.clone()),
            tax_id: Set(counterparty.tax_id.clone()),
            notes: Set(counterparty.notes.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn update(&self, counterparty: &Counterparty) -> Result<Counterparty, DomainError> {
        let result = counterparties::ActiveModel {
            id: Set(counterparty.id.0),
            name: Set(counterparty.name.clone()),
            kind: Set(counterparty.kind.to_string()),
            contact_person: Set(counterparty.contact_person.clone()),
            phone: Set(counterparty.phone.clone()),
            email: Set(counterparty.email.clone()),
            address: Set(counterparty.address.clone()),
            tax_id: Set(counterparty.tax_id.clone()),
            notes: Set(counterparty.notes.clone()),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn delete(&self, id: &CounterpartyId) -> Result<(), DomainError> {
        let result = counterparties::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound(format!("Counterparty {}", id)));
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        counterparties::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }
}

/// Convert SeaORM model to domain entity
impl From<counterparties::Model> for Counterparty {
    fn from(model: counterparties::Model) -> Self {
        Counterparty {
            id: CounterpartyId(model.id),
            name: model.name,
            kind: model.kind.parse().unwrap_or(CounterpartyKind::Client),
            contact_person: model.contact_person,
            phone: model.phone,
            email: model.email,
            address: model.address,
            tax_id: model.tax_id,
            notes: model.notes,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
