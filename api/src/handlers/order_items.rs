//! Order item handlers
//!
//! Cargo lines are created under their order and addressed directly
//! afterwards.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use super::nullable;
use crate::domain::entities::{
    AdminUser, InventoryId, NewOrderItem, OrderId, OrderItem, OrderItemChanges, OrderItemId,
    TransportStatus,
};
use crate::error::AppError;
use crate::AppState;

/// Request to add a cargo line to an order
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    /// Reserve the quantity from this inventory row
    pub inventory_id: Option<Uuid>,
    pub product_name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    /// Line weight in kg
    #[serde(default)]
    pub weight: Decimal,
    /// Line volume in m³
    #[serde(default)]
    pub volume: Decimal,
    #[serde(default)]
    pub paid_amount: Decimal,
}

/// Request to edit a cargo line
#[derive(Debug, Default, Deserialize)]
pub struct UpdateItemRequest {
    #[serde(default, deserialize_with = "nullable")]
    pub inventory_id: Option<Option<Uuid>>,
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub quantity: Option<i32>,
    pub unit_price: Option<Decimal>,
    pub weight: Option<Decimal>,
    pub volume: Option<Decimal>,
    pub paid_amount: Option<Decimal>,
    pub transport_status: Option<TransportStatus>,
}

impl From<UpdateItemRequest> for OrderItemChanges {
    fn from(request: UpdateItemRequest) -> Self {
        OrderItemChanges {
            inventory_id: request.inventory_id.map(|i| i.map(InventoryId)),
            product_name: request.product_name,
            description: request.description,
            quantity: request.quantity,
            unit_price: request.unit_price,
            weight: request.weight,
            volume: request.volume,
            paid_amount: request.paid_amount,
            transport_status: request.transport_status,
        }
    }
}

/// Request to register a payment against a line
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub amount: Decimal,
}

/// GET /admin/orders/:id/items
pub async fn list_items(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Vec<OrderItem>>, AppError> {
    let items = state
        .order_item_service
        .list_for_order(&OrderId(order_id))
        .await?;
    Ok(Json(items))
}

/// POST /admin/orders/:id/items
pub async fn add_item(
    State(state): State<AppState>,
    Extension(user): Extension<AdminUser>,
    Path(order_id): Path<Uuid>,
    Json(request): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<OrderItem>), AppError> {
    let item = state
        .order_item_service
        .add(
            NewOrderItem {
                order_id: OrderId(order_id),
                inventory_id: request.inventory_id.map(InventoryId),
                product_name: request.product_name,
                description: request.description,
                quantity: request.quantity,
                unit_price: request.unit_price,
                weight: request.weight,
                volume: request.volume,
                paid_amount: request.paid_amount,
            },
            Some(user.id),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /admin/order-items/:id
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderItem>, AppError> {
    Ok(Json(state.order_item_service.get(&OrderItemId(id)).await?))
}

/// PATCH /admin/order-items/:id
pub async fn update_item(
    State(state): State<AppState>,
    Extension(user): Extension<AdminUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<OrderItem>, AppError> {
    let item = state
        .order_item_service
        .update(&OrderItemId(id), request.into(), Some(user.id))
        .await?;
    Ok(Json(item))
}

/// POST /admin/order-items/:id/payments
pub async fn record_payment(
    State(state): State<AppState>,
    Extension(user): Extension<AdminUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<PaymentRequest>,
) -> Result<Json<OrderItem>, AppError> {
    let item = state
        .order_item_service
        .record_payment(&OrderItemId(id), request.amount, Some(user.id))
        .await?;
    Ok(Json(item))
}

/// POST /admin/order-items/:id/fulfill
///
/// Ship a pending line, taking its reserved stock out of the warehouse.
pub async fn fulfill_item(
    State(state): State<AppState>,
    Extension(user): Extension<AdminUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderItem>, AppError> {
    let item = state
        .order_item_service
        .fulfill(&OrderItemId(id), Some(user.id))
        .await?;
    Ok(Json(item))
}

/// DELETE /admin/order-items/:id
pub async fn delete_item(
    State(state): State<AppState>,
    Extension(user): Extension<AdminUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .order_item_service
        .delete(&OrderItemId(id), Some(user.id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
