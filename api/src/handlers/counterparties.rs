//! Counterparty handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{clamp_limit, default_limit, nullable};
use crate::domain::entities::{
    AdminUser, Counterparty, CounterpartyChanges, CounterpartyFilter, CounterpartyId,
    CounterpartyKind, NewCounterparty,
};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListCounterpartiesQuery {
    /// `both` counterparties match either kind
    pub kind: Option<CounterpartyKind>,
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

#[derive(Debug, Deserialize)]
pub struct CreateCounterpartyRequest {
    pub name: String,
    pub kind: CounterpartyKind,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub tax_id: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCounterpartyRequest {
    pub name: Option<String>,
    pub kind: Option<CounterpartyKind>,
    #[serde(default, deserialize_with = "nullable")]
    pub contact_person: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub tax_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub notes: Option<Option<String>>,
}

/// GET /admin/counterparties
pub async fn list_counterparties(
    State(state): State<AppState>,
    Query(query): Query<ListCounterpartiesQuery>,
) -> Result<Json<Vec<Counterparty>>, AppError> {
    let filter = CounterpartyFilter {
        kind: query.kind,
        search: query.search.filter(|s| !s.trim().is_empty()),
        limit: clamp_limit(query.limit),
        offset: query.offset,
    };
    Ok(Json(state.counterparty_service.list(&filter).await?))
}

/// POST /admin/counterparties
pub async fn create_counterparty(
    State(state): State<AppState>,
    Extension(user): Extension<AdminUser>,
    Json(request): Json<CreateCounterpartyRequest>,
) -> Result<(StatusCode, Json<Counterparty>), AppError> {
    let counterparty = state
        .counterparty_service
        .create(
            NewCounterparty {
                name: request.name,
                kind: request.kind,
                contact_person: request.contact_person,
                phone: request.phone,
                email: request.email,
                address: request.address,
                tax_id: request.tax_id,
                notes: request.notes,
            },
            Some(user.id),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(counterparty)))
}

/// GET /admin/counterparties/:id
pub async fn get_counterparty(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Counterparty>, AppError> {
    Ok(Json(
        state.counterparty_service.get(&CounterpartyId(id)).await?,
    ))
}

/// PATCH /admin/counterparties/:id
pub async fn update_counterparty(
    State(state): State<AppState>,
    Extension(user): Extension<AdminUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCounterpartyRequest>,
) -> Result<Json<Counterparty>, AppError> {
    let changes = CounterpartyChanges {
        name: request.name,
        kind: request.kind,
        contact_person: request.contact_person,
        phone: request.phone,
        email: request.email,
        address: request.address,
        tax_id: request.tax_id,
        notes: request.notes,
    };
    let counterparty = state
        .counterparty_service
        .update(&CounterpartyId(id), changes, Some(user.id))
        .await?;
    Ok(Json(counterparty))
}

/// DELETE /admin/counterparties/:id
pub async fn delete_counterparty(
    State(state): State<AppState>,
    Extension(user): Extension<AdminUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .counterparty_service
        .delete(&CounterpartyId(id), Some(user.id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
