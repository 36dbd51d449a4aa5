//! PostgreSQL adapter for OrderRepository

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use crate::domain::entities::{
    AdminUserId, CounterpartyId, NewOrder, Order, OrderFilter, OrderId, OrderStatus, OrderTotals,
    TransportType,
};
use crate::domain::ports::OrderRepository;
use crate::entity::orders;
use crate::error::DomainError;

/// PostgreSQL implementation of OrderRepository
pub struct PostgresOrderRepository {
    db: DatabaseConnection,
}

impl PostgresOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Apply the filter's WHERE clauses (no ordering or paging)
fn filtered(filter: &OrderFilter) -> Select<orders::Entity> {
    let mut query = orders::Entity::find();

    if let Some(status) = filter.status {
        query = query.filter(orders::Column::Status.eq(status.to_string()));
    }
    if let Some(counterparty_id) = filter.counterparty_id {
        query = query.filter(orders::Column::CounterpartyId.eq(counterparty_id.0));
    }
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        query = query.filter(
            Condition::any()
                .add(orders::Column::OrderNumber.contains(search))
                .add(orders::Column::Origin.contains(search))
                .add(orders::Column::Destination.contains(search))
                .add(orders::Column::Comment.contains(search)),
        );
    }

    query
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError> {
        let result = orders::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_number(&self, order_number: &str) -> Result<Option<Order>, DomainError> {
        let result = orders::Entity::find()
            .filter(orders::Column::OrderNumber.eq(order_number))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, DomainError> {
        let results = filtered(filter)
            .order_by_desc(orders::Column::CreatedAt)
            .limit(filter.limit)
            .offset(filter.offset)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn count(&self, filter: &OrderFilter) -> Result<u64, DomainError> {
        filtered(filter)
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    async fn create(&self, order: &NewOrder) -> Result<Order, DomainError> {
        let now = Utc::now().fixed_offset();

        let model = orders::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_number: Set(order.order_number.clone()),
            status: Set(OrderStatus::New.to_string()),
            counterparty_id: Set(order.counterparty_id.map(|c| c.0)),
            origin: Set(order.origin.clone()),
            destination: Set(order.destination.clone()),
            transport_type: Set(order.transport_type.to_string()),
            comment: Set(order.comment.clone()),
            total_quantity: Set(0),
            total_weight: Set(Decimal::ZERO),
            total_volume: Set(Decimal::ZERO),
            total_amount: Set(Decimal::ZERO),
            paid_amount: Set(Decimal::ZERO),
            remaining_amount: Set(Decimal::ZERO),
            created_by: Set(order.created_by.map(|u| u.0)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            let msg = e.to_string();
            if msg.contains("duplicate key") {
                DomainError::AlreadyExists(format!("Order number {}", order.order_number))
            } else {
                DomainError::Database(msg)
            }
        })?;

        Ok(result.into())
    }

    async fn update(&self, order: &Order) -> Result<Order, DomainError> {
        let result = orders::ActiveModel {
            id: Set(order.id.0),
            status: Set(order.status.to_string()),
            counterparty_id: Set(order.counterparty_id.map(|c| c.0)),
            origin: Set(order.origin.clone()),
            destination: Set(order.destination.clone()),
            transport_type: Set(order.transport_type.to_string()),
            comment: Set(order.comment.clone()),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn update_totals(&self, id: &OrderId, totals: &OrderTotals) -> Result<(), DomainError> {
        orders::ActiveModel {
            id: Set(id.0),
            total_quantity: Set(totals.total_quantity),
            total_weight: Set(totals.total_weight),
            total_volume: Set(totals.total_volume),
            total_amount: Set(totals.total_amount),
            paid_amount: Set(totals.paid_amount),
            remaining_amount: Set(totals.remaining_amount),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, id: &OrderId) -> Result<(), DomainError> {
        let result = orders::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound(format!("Order {}", id)));
        }
        Ok(())
    }

    async fn count_by_status(&self, status: OrderStatus) -> Result<u64, DomainError> {
        orders::Entity::find()
            .filter(orders::Column::Status.eq(status.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    async fn count_by_counterparty(&self, id: &CounterpartyId) -> Result<u64, DomainError> {
        orders::Entity::find()
            .filter(orders::Column::CounterpartyId.eq(id.0))
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    async fn sum_outstanding(&self) -> Result<Decimal, DomainError> {
        let result: Option<Option<Decimal>> = orders::Entity::find()
            .filter(orders::Column::Status.ne(OrderStatus::Cancelled.to_string()))
            .select_only()
            .column_as(Expr::col(orders::Column::RemainingAmount).sum(), "sum")
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.flatten().unwrap_or(Decimal::ZERO))
    }
}

/// Convert SeaORM model to domain entity
impl From<orders::Model> for Order {
    fn from(model: orders::Model) -> Self {
        Order {
            id: OrderId(model.id),
            order_number: model.order_number,
            status: model.status.parse().unwrap_or(OrderStatus::New),
            counterparty_id: model.counterparty_id.map(CounterpartyId),
            origin: model.origin,
            destination: model.destination,
            transport_type: model.transport_type.parse().unwrap_or(TransportType::Auto),
            comment: model.comment,
            totals: OrderTotals {
                total_quantity: model.total_quantity,
                total_weight: model.total_weight,
                total_volume: model.total_volume,
                total_amount: model.total_amount,
                paid_amount: model.paid_amount,
                remaining_amount: model.remaining_amount,
            },
            created_by: model.created_by.map(AdminUserId),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
