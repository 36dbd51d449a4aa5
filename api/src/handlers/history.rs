//! Change history handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{clamp_limit, default_limit};
use crate::domain::entities::{ChangeHistory, EntityType};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RecentHistoryQuery {
    pub entity_type: Option<EntityType>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

/// GET /admin/history
pub async fn recent_history(
    State(state): State<AppState>,
    Query(query): Query<RecentHistoryQuery>,
) -> Result<Json<Vec<ChangeHistory>>, AppError> {
    let entries = state
        .history_service
        .recent(query.entity_type, clamp_limit(query.limit), query.offset)
        .await?;
    Ok(Json(entries))
}

/// GET /admin/history/:entity_type/:entity_id
///
/// Accepts `order-item` as well as `order_item`.
pub async fn entity_history(
    State(state): State<AppState>,
    Path((entity_type, entity_id)): Path<(String, Uuid)>,
) -> Result<Json<Vec<ChangeHistory>>, AppError> {
    let entity_type: EntityType = entity_type.parse().map_err(AppError::BadRequest)?;
    let entries = state
        .history_service
        .for_entity(entity_type, &entity_id)
        .await?;
    Ok(Json(entries))
}
