//! Tracking service
//!
//! Public tracking codes. Admins issue and revoke codes; anyone holding an
//! active code can see the shipment's progress through `lookup`.

use std::sync::Arc;

use rand::Rng;

use crate::app::history_service::record_history;
use crate::domain::entities::{
    lifecycle_entry, normalize_code, update_entries, AdminUserId, ChangeAction, CustomerTracking,
    OrderId, PublicTrackingView, TrackingId, TRACKING_ALPHABET, TRACKING_CODE_LEN,
};
use crate::domain::ports::{
    ChangeHistoryRepository, OrderItemRepository, OrderRepository, TrackingRepository,
};
use crate::error::{AppError, DomainError};

/// Attempts at drawing an unused code
const CODE_ATTEMPTS: usize = 5;

/// Draw a random tracking code from the unambiguous alphabet
pub fn generate_tracking_code() -> String {
    let mut rng = rand::thread_rng();
    (0..TRACKING_CODE_LEN)
        .map(|_| TRACKING_ALPHABET[rng.gen_range(0..TRACKING_ALPHABET.len())] as char)
        .collect()
}

pub struct TrackingService<T, O, I, H>
where
    T: TrackingRepository,
    O: OrderRepository,
    I: OrderItemRepository,
    H: ChangeHistoryRepository,
{
    tracking: Arc<T>,
    orders: Arc<O>,
    items: Arc<I>,
    history: Arc<H>,
}

impl<T, O, I, H> TrackingService<T, O, I, H>
where
    T: TrackingRepository,
    O: OrderRepository,
    I: OrderItemRepository,
    H: ChangeHistoryRepository,
{
    pub fn new(tracking: Arc<T>, orders: Arc<O>, items: Arc<I>, history: Arc<H>) -> Self {
        Self {
            tracking,
            orders,
            items,
            history,
        }
    }

    async fn ensure_order(&self, order_id: &OrderId) -> Result<(), AppError> {
        match self.orders.find_by_id(order_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("Order {}", order_id))),
        }
    }

    /// Issue a new code for an order
    pub async fn issue(
        &self,
        order_id: &OrderId,
        actor: Option<AdminUserId>,
    ) -> Result<CustomerTracking, AppError> {
        self.ensure_order(order_id).await?;

        for _ in 0..CODE_ATTEMPTS {
            let code = generate_tracking_code();
            match self.tracking.create(&code, order_id).await {
                Ok(tracking) => {
                    record_history(
                        self.history.as_ref(),
                        vec![lifecycle_entry(&tracking, ChangeAction::Create, actor)],
                    )
                    .await;
                    tracing::info!(order_id = %order_id, tracking_id = %tracking.id, "Tracking code issued");
                    return Ok(tracking);
                }
                Err(DomainError::AlreadyExists(_)) => {
                    tracing::debug!("Tracking code collision, drawing again");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(AppError::Internal(
            "Could not allocate a free tracking code".to_string(),
        ))
    }

    /// Codes of an order, newest first
    pub async fn list_for_order(
        &self,
        order_id: &OrderId,
    ) -> Result<Vec<CustomerTracking>, AppError> {
        self.ensure_order(order_id).await?;
        Ok(self.tracking.find_by_order(order_id).await?)
    }

    /// Deactivate a code; the public lookup stops working immediately
    pub async fn revoke(
        &self,
        id: &TrackingId,
        actor: Option<AdminUserId>,
    ) -> Result<CustomerTracking, AppError> {
        let before = self
            .tracking
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tracking code {}", id)))?;

        self.tracking.deactivate(id).await?;
        let after = CustomerTracking {
            is_active: false,
            ..before.clone()
        };

        record_history(self.history.as_ref(), update_entries(&before, &after, actor)).await;
        tracing::info!(tracking_id = %id, "Tracking code revoked");
        Ok(after)
    }

    /// Public lookup. Malformed, unknown and revoked codes all read as 404.
    pub async fn lookup(&self, code: &str) -> Result<PublicTrackingView, AppError> {
        let not_found = || AppError::NotFound("Tracking code".to_string());

        let code = normalize_code(code).ok_or_else(not_found)?;
        let tracking = self
            .tracking
            .find_by_code(&code)
            .await?
            .filter(|t| t.is_active)
            .ok_or_else(not_found)?;

        let order = self
            .orders
            .find_by_id(&tracking.order_id)
            .await?
            .ok_or_else(not_found)?;
        let items = self.items.find_by_order(&order.id).await?;

        Ok(PublicTrackingView::new(code, &order, &items))
    }
}
