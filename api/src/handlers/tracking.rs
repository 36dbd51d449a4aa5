//! Tracking handlers
//!
//! `GET /track/:code` is public; the rest sit behind admin auth.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::domain::entities::{AdminUser, CustomerTracking, OrderId, PublicTrackingView, TrackingId};
use crate::error::AppError;
use crate::AppState;

/// GET /track/:code
pub async fn track(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<PublicTrackingView>, AppError> {
    Ok(Json(state.tracking_service.lookup(&code).await?))
}

/// GET /admin/orders/:id/tracking
pub async fn list_tracking(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<Vec<CustomerTracking>>, AppError> {
    let codes = state
        .tracking_service
        .list_for_order(&OrderId(order_id))
        .await?;
    Ok(Json(codes))
}

/// POST /admin/orders/:id/tracking
pub async fn issue_tracking(
    State(state): State<AppState>,
    Extension(user): Extension<AdminUser>,
    Path(order_id): Path<Uuid>,
) -> Result<(StatusCode, Json<CustomerTracking>), AppError> {
    let tracking = state
        .tracking_service
        .issue(&OrderId(order_id), Some(user.id))
        .await?;
    Ok((StatusCode::CREATED, Json(tracking)))
}

/// DELETE /admin/tracking/:id
///
/// Revokes the code; the record stays for the history.
pub async fn revoke_tracking(
    State(state): State<AppState>,
    Extension(user): Extension<AdminUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomerTracking>, AppError> {
    let tracking = state
        .tracking_service
        .revoke(&TrackingId(id), Some(user.id))
        .await?;
    Ok(Json(tracking))
}
