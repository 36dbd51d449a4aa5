//! Inventory handlers
//!
//! Warehouse stock. Reservations are never edited here; they follow the
//! order items that hold them.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use super::{clamp_limit, default_limit, nullable};
use crate::app::inventory_service::DEFAULT_UNIT;
use crate::app::CreateInventoryItem;
use crate::domain::entities::{
    AdminUser, CounterpartyId, InventoryChanges, InventoryFilter, InventoryId, InventoryItem,
    NewInventoryItem, WarehouseId,
};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListInventoryQuery {
    pub warehouse_id: Option<Uuid>,
    pub counterparty_id: Option<Uuid>,
    /// Matches product name and SKU
    pub search: Option<String>,
    #[serde(default)]
    pub only_available: bool,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

#[derive(Debug, Deserialize)]
pub struct LowStockQuery {
    /// Defaults to the configured threshold
    pub threshold: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateInventoryRequest {
    pub warehouse_id: Uuid,
    pub counterparty_id: Option<Uuid>,
    pub product_name: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    #[serde(default = "default_unit")]
    pub unit: String,
    pub quantity: i32,
    /// Defaults to `quantity`
    pub available_quantity: Option<i32>,
    /// Per-unit weight in kg
    pub weight: Option<Decimal>,
    /// Per-unit volume in m³
    pub volume: Option<Decimal>,
    pub arrived_at: Option<DateTime<Utc>>,
}

fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateInventoryRequest {
    #[serde(default, deserialize_with = "nullable")]
    pub counterparty_id: Option<Option<Uuid>>,
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub sku: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub unit: Option<String>,
    /// New physical quantity; reservations are kept
    pub quantity: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub weight: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "nullable")]
    pub volume: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "nullable")]
    pub arrived_at: Option<Option<DateTime<Utc>>>,
}

impl From<UpdateInventoryRequest> for InventoryChanges {
    fn from(request: UpdateInventoryRequest) -> Self {
        InventoryChanges {
            counterparty_id: request.counterparty_id.map(|c| c.map(CounterpartyId)),
            product_name: request.product_name,
            sku: request.sku,
            description: request.description,
            unit: request.unit,
            quantity: request.quantity,
            weight: request.weight,
            volume: request.volume,
            arrived_at: request.arrived_at,
        }
    }
}

/// Signed stock movement: positive for receipts, negative for write-offs
#[derive(Debug, Deserialize)]
pub struct AdjustRequest {
    pub delta: i32,
}

/// GET /admin/inventory
pub async fn list_inventory(
    State(state): State<AppState>,
    Query(query): Query<ListInventoryQuery>,
) -> Result<Json<Vec<InventoryItem>>, AppError> {
    let filter = InventoryFilter {
        warehouse_id: query.warehouse_id.map(WarehouseId),
        counterparty_id: query.counterparty_id.map(CounterpartyId),
        search: query.search.filter(|s| !s.trim().is_empty()),
        only_available: query.only_available,
        limit: clamp_limit(query.limit),
        offset: query.offset,
    };
    Ok(Json(state.inventory_service.list(&filter).await?))
}

/// GET /admin/inventory/low-stock
pub async fn low_stock(
    State(state): State<AppState>,
    Query(query): Query<LowStockQuery>,
) -> Result<Json<Vec<InventoryItem>>, AppError> {
    let threshold = query
        .threshold
        .unwrap_or(state.config.low_stock_threshold);
    Ok(Json(state.inventory_service.low_stock(threshold).await?))
}

/// POST /admin/inventory
pub async fn create_inventory(
    State(state): State<AppState>,
    Extension(user): Extension<AdminUser>,
    Json(request): Json<CreateInventoryRequest>,
) -> Result<(StatusCode, Json<InventoryItem>), AppError> {
    let input = CreateInventoryItem {
        item: NewInventoryItem {
            warehouse_id: WarehouseId(request.warehouse_id),
            counterparty_id: request.counterparty_id.map(CounterpartyId),
            product_name: request.product_name,
            sku: request.sku,
            description: request.description,
            unit: request.unit,
            quantity: request.quantity,
            available_quantity: request.available_quantity.unwrap_or(request.quantity),
            weight: request.weight,
            volume: request.volume,
            arrived_at: request.arrived_at,
        },
        available_quantity: request.available_quantity,
    };
    let item = state
        .inventory_service
        .create(input, Some(user.id))
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /admin/inventory/:id
pub async fn get_inventory(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InventoryItem>, AppError> {
    Ok(Json(state.inventory_service.get(&InventoryId(id)).await?))
}

/// PATCH /admin/inventory/:id
pub async fn update_inventory(
    State(state): State<AppState>,
    Extension(user): Extension<AdminUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateInventoryRequest>,
) -> Result<Json<InventoryItem>, AppError> {
    let item = state
        .inventory_service
        .update(&InventoryId(id), request.into(), Some(user.id))
        .await?;
    Ok(Json(item))
}

/// POST /admin/inventory/:id/adjust
pub async fn adjust_inventory(
    State(state): State<AppState>,
    Extension(user): Extension<AdminUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<AdjustRequest>,
) -> Result<Json<InventoryItem>, AppError> {
    let item = state
        .inventory_service
        .adjust(&InventoryId(id), request.delta, Some(user.id))
        .await?;
    Ok(Json(item))
}

/// DELETE /admin/inventory/:id
pub async fn delete_inventory(
    State(state): State<AppState>,
    Extension(user): Extension<AdminUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .inventory_service
        .delete(&InventoryId(id), Some(user.id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
