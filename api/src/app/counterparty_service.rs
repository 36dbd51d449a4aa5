//! Counterparty service
//!
//! Clients and suppliers. A counterparty referenced by orders cannot be
//! deleted.

use std::sync::Arc;

use crate::app::history_service::record_history;
use crate::domain::entities::{
    lifecycle_entry, update_entries, validate_email, AdminUserId, ChangeAction, Counterparty,
    CounterpartyChanges, CounterpartyFilter, CounterpartyId, NewCounterparty,
};
use crate::domain::ports::{ChangeHistoryRepository, CounterpartyRepository, OrderRepository};
use crate::error::{AppError, DomainError};

pub struct CounterpartyService<C, O, H>
where
    C: CounterpartyRepository,
    O: OrderRepository,
    H: ChangeHistoryRepository,
{
    counterparties: Arc<C>,
    orders: Arc<O>,
    history: Arc<H>,
}

impl<C, O, H> CounterpartyService<C, O, H>
where
    C: CounterpartyRepository,
    O: OrderRepository,
    H: ChangeHistoryRepository,
{
    pub fn new(counterparties: Arc<C>, orders: Arc<O>, history: Arc<H>) -> Self {
        Self {
            counterparties,
            orders,
            history,
        }
    }

    pub async fn create(
        &self,
        mut input: NewCounterparty,
        actor: Option<AdminUserId>,
    ) -> Result<Counterparty, AppError> {
        if input.name.trim().is_empty() {
            return Err(AppError::BadRequest("Name is required".to_string()));
        }
        validate_email(input.email.as_deref())?;
        input.name = input.name.trim().to_string();

        let counterparty = self.counterparties.create(&input).await?;
        record_history(
            self.history.as_ref(),
            vec![lifecycle_entry(&counterparty, ChangeAction::Create, actor)],
        )
        .await;

        tracing::info!(counterparty_id = %counterparty.id, kind = %counterparty.kind, "Counterparty created");
        Ok(counterparty)
    }

    pub async fn get(&self, id: &CounterpartyId) -> Result<Counterparty, AppError> {
        self.counterparties
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Counterparty {}", id)))
    }

    pub async fn list(&self, filter: &CounterpartyFilter) -> Result<Vec<Counterparty>, AppError> {
        Ok(self.counterparties.list(filter).await?)
    }

    pub async fn update(
        &self,
        id: &CounterpartyId,
        changes: CounterpartyChanges,
        actor: Option<AdminUserId>,
    ) -> Result<Counterparty, AppError> {
        let before = self.get(id).await?;

        let mut after = before.clone();
        changes.apply(&mut after);
        if after.name.trim().is_empty() {
            return Err(AppError::BadRequest("Name is required".to_string()));
        }
        validate_email(after.email.as_deref())?;

        let saved = self.counterparties.update(&after).await?;
        record_history(self.history.as_ref(), update_entries(&before, &saved, actor)).await;
        Ok(saved)
    }

    pub async fn delete(
        &self,
        id: &CounterpartyId,
        actor: Option<AdminUserId>,
    ) -> Result<(), AppError> {
        let counterparty = self.get(id).await?;

        let orders = self.orders.count_by_counterparty(id).await?;
        if orders > 0 {
            return Err(AppError::Domain(DomainError::Conflict(format!(
                "'{}' is referenced by {} order(s)",
                counterparty.name, orders
            ))));
        }

        self.counterparties.delete(id).await?;
        record_history(
            self.history.as_ref(),
            vec![lifecycle_entry(&counterparty, ChangeAction::Delete, actor)],
        )
        .await;

        tracing::info!(counterparty_id = %id, "Counterparty deleted");
        Ok(())
    }
}
