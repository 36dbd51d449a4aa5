//! Warehouse handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::nullable;
use crate::domain::entities::{AdminUser, NewWarehouse, Warehouse, WarehouseChanges, WarehouseId};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListWarehousesQuery {
    #[serde(default)]
    pub active_only: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateWarehouseRequest {
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub phone: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateWarehouseRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub phone: Option<Option<String>>,
    pub is_active: Option<bool>,
}

/// GET /admin/warehouses
pub async fn list_warehouses(
    State(state): State<AppState>,
    Query(query): Query<ListWarehousesQuery>,
) -> Result<Json<Vec<Warehouse>>, AppError> {
    Ok(Json(state.warehouse_service.list(query.active_only).await?))
}

/// POST /admin/warehouses
pub async fn create_warehouse(
    State(state): State<AppState>,
    Extension(user): Extension<AdminUser>,
    Json(request): Json<CreateWarehouseRequest>,
) -> Result<(StatusCode, Json<Warehouse>), AppError> {
    let warehouse = state
        .warehouse_service
        .create(
            NewWarehouse {
                name: request.name,
                address: request.address,
                city: request.city,
                country: request.country,
                phone: request.phone,
            },
            Some(user.id),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(warehouse)))
}

/// GET /admin/warehouses/:id
pub async fn get_warehouse(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Warehouse>, AppError> {
    Ok(Json(state.warehouse_service.get(&WarehouseId(id)).await?))
}

/// PATCH /admin/warehouses/:id
pub async fn update_warehouse(
    State(state): State<AppState>,
    Extension(user): Extension<AdminUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateWarehouseRequest>,
) -> Result<Json<Warehouse>, AppError> {
    let changes = WarehouseChanges {
        name: request.name,
        address: request.address,
        city: request.city,
        country: request.country,
        phone: request.phone,
        is_active: request.is_active,
    };
    let warehouse = state
        .warehouse_service
        .update(&WarehouseId(id), changes, Some(user.id))
        .await?;
    Ok(Json(warehouse))
}

/// DELETE /admin/warehouses/:id
pub async fn delete_warehouse(
    State(state): State<AppState>,
    Extension(user): Extension<AdminUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .warehouse_service
        .delete(&WarehouseId(id), Some(user.id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
