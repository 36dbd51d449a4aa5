//! Order handlers
//!
//! Endpoints for order headers, status and totals.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{clamp_limit, default_limit, nullable, Page};
use crate::app::{CreateOrder, OrderDetails};
use crate::domain::entities::{
    AdminUser, CounterpartyId, Order, OrderChanges, OrderFilter, OrderId, OrderStatus,
    TransportType,
};
use crate::error::AppError;
use crate::AppState;

/// Query parameters for listing orders
#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<OrderStatus>,
    pub counterparty_id: Option<Uuid>,
    /// Matches order number, origin, destination and comment
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

impl ListOrdersQuery {
    fn into_filter(self) -> OrderFilter {
        OrderFilter {
            status: self.status,
            counterparty_id: self.counterparty_id.map(CounterpartyId),
            search: self.search.filter(|s| !s.trim().is_empty()),
            limit: clamp_limit(self.limit),
            offset: self.offset,
        }
    }
}

/// Request to create an order
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Generated as `FD-YYYYMMDD-NNNN` when omitted
    pub order_number: Option<String>,
    pub counterparty_id: Option<Uuid>,
    pub origin: String,
    pub destination: String,
    pub transport_type: TransportType,
    pub comment: Option<String>,
}

/// Request to edit order header fields
#[derive(Debug, Default, Deserialize)]
pub struct UpdateOrderRequest {
    #[serde(default, deserialize_with = "nullable")]
    pub counterparty_id: Option<Option<Uuid>>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub transport_type: Option<TransportType>,
    #[serde(default, deserialize_with = "nullable")]
    pub comment: Option<Option<String>>,
}

impl From<UpdateOrderRequest> for OrderChanges {
    fn from(request: UpdateOrderRequest) -> Self {
        OrderChanges {
            counterparty_id: request.counterparty_id.map(|c| c.map(CounterpartyId)),
            origin: request.origin,
            destination: request.destination,
            transport_type: request.transport_type,
            comment: request.comment,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: OrderStatus,
}

/// GET /admin/orders
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<Page<Order>>, AppError> {
    let filter = query.into_filter();
    let (items, total) = state.order_service.list(&filter).await?;

    Ok(Json(Page {
        items,
        total,
        limit: filter.limit,
        offset: filter.offset,
    }))
}

/// POST /admin/orders
pub async fn create_order(
    State(state): State<AppState>,
    Extension(user): Extension<AdminUser>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = state
        .order_service
        .create(
            CreateOrder {
                order_number: request.order_number,
                counterparty_id: request.counterparty_id.map(CounterpartyId),
                origin: request.origin,
                destination: request.destination,
                transport_type: request.transport_type,
                comment: request.comment,
            },
            Some(user.id),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /admin/orders/:id
///
/// The order with all of its items.
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderDetails>, AppError> {
    Ok(Json(state.order_service.get_with_items(&OrderId(id)).await?))
}

/// PATCH /admin/orders/:id
pub async fn update_order(
    State(state): State<AppState>,
    Extension(user): Extension<AdminUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateOrderRequest>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .order_service
        .update(&OrderId(id), request.into(), Some(user.id))
        .await?;
    Ok(Json(order))
}

/// POST /admin/orders/:id/status
pub async fn change_status(
    State(state): State<AppState>,
    Extension(user): Extension<AdminUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChangeStatusRequest>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .order_service
        .change_status(&OrderId(id), request.status, Some(user.id))
        .await?;
    Ok(Json(order))
}

/// POST /admin/orders/:id/recalculate
///
/// Recompute the totals from the items. Normally not needed; every item
/// change already does this.
pub async fn recalculate_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(state.order_service.recalculate(&OrderId(id)).await?))
}

/// DELETE /admin/orders/:id
pub async fn delete_order(
    State(state): State<AppState>,
    Extension(user): Extension<AdminUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .order_service
        .delete(&OrderId(id), Some(user.id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
