//! PostgreSQL adapter for OrderItemRepository

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, Statement,
};

use crate::domain::entities::{
    InventoryId, OrderId, OrderItem, OrderItemId, PaymentStatus, TransportStatus,
};
use crate::domain::ports::OrderItemRepository;
use crate::entity::order_items;
use crate::error::DomainError;

/// PostgreSQL implementation of OrderItemRepository
pub struct PostgresOrderItemRepository {
    db: DatabaseConnection,
}

impl PostgresOrderItemRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_active_model(item: &OrderItem) -> order_items::ActiveModel {
    order_items::ActiveModel {
        id: Set(item.id.0),
        order_id: Set(item.order_id.0),
        inventory_id: Set(item.inventory_id.map(|i| i.0)),
        product_name: Set(item.product_name.clone()),
        description: Set(item.description.clone()),
        quantity: Set(item.quantity),
        unit_price: Set(item.unit_price),
        total_amount: Set(item.total_amount),
        weight: Set(item.weight),
        volume: Set(item.volume),
        transport_status: Set(item.transport_status.to_string()),
        payment_status: Set(item.payment_status.to_string()),
        paid_amount: Set(item.paid_amount),
        remaining_amount: Set(item.remaining_amount),
        fulfilled_at: Set(item.fulfilled_at.map(|t| t.fixed_offset())),
        created_at: Set(item.created_at.fixed_offset()),
        updated_at: Set(item.updated_at.fixed_offset()),
    }
}

#[async_trait]
impl OrderItemRepository for PostgresOrderItemRepository {
    async fn find_by_id(&self, id: &OrderItemId) -> Result<Option<OrderItem>, DomainError> {
        let result = order_items::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_order(&self, order_id: &OrderId) -> Result<Vec<OrderItem>, DomainError> {
        let results = order_items::Entity::find()
            .filter(order_items::Column::OrderId.eq(order_id.0))
            .order_by_asc(order_items::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, item: &OrderItem) -> Result<OrderItem, DomainError> {
        let result = to_active_model(item)
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn update(&self, item: &OrderItem) -> Result<OrderItem, DomainError> {
        let mut model = to_active_model(item);
        model.updated_at = Set(Utc::now().fixed_offset());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.into())
    }

    async fn add_payment(
        &self,
        id: &OrderItemId,
        amount: Decimal,
    ) -> Result<OrderItem, DomainError> {
        // The guard and the sum are evaluated on the stored row, so
        // concurrent payments serialize on the row lock.
        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            "UPDATE order_items \
             SET paid_amount = paid_amount + $1, \
                 remaining_amount = total_amount - (paid_amount + $1), \
                 payment_status = CASE WHEN paid_amount + $1 >= total_amount \
                     THEN 'paid' ELSE 'partially_paid' END, \
                 updated_at = NOW() \
             WHERE id = $2 AND paid_amount + $1 <= total_amount",
            [amount.into(), id.0.into()],
        );

        let result = self
            .db
            .execute(stmt)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        let item = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Order item {}", id)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::Validation(format!(
                "Payment of {} exceeds the remaining {}",
                amount, item.remaining_amount
            )));
        }
        Ok(item)
    }

    async fn delete(&self, id: &OrderItemId) -> Result<(), DomainError> {
        let result = order_items::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound(format!("Order item {}", id)));
        }
        Ok(())
    }

    async fn count_reserving(&self, inventory_id: &InventoryId) -> Result<u64, DomainError> {
        order_items::Entity::find()
            .filter(order_items::Column::InventoryId.eq(inventory_id.0))
            .filter(order_items::Column::FulfilledAt.is_null())
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }
}

/// Convert SeaORM model to domain entity
impl From<order_items::Model> for OrderItem {
    fn from(model: order_items::Model) -> Self {
        OrderItem {
            id: OrderItemId(model.id),
            order_id: OrderId(model.order_id),
            inventory_id: model.inventory_id.map(InventoryId),
            product_name: model.product_name,
            description: model.description,
            quantity: model.quantity,
            unit_price: model.unit_price,
            total_amount: model.total_amount,
            weight: model.weight,
            volume: model.volume,
            transport_status: model
                .transport_status
                .parse()
                .unwrap_or(TransportStatus::Pending),
            payment_status: model
                .payment_status
                .parse()
                .unwrap_or_else(|_| PaymentStatus::from_amounts(model.total_amount, model.paid_amount)),
            paid_amount: model.paid_amount,
            remaining_amount: model.remaining_amount,
            fulfilled_at: model.fulfilled_at.map(|dt| dt.with_timezone(&Utc)),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}
