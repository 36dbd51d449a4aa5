//! Dashboard handler

use axum::{extract::State, Json};

use crate::app::DashboardSummary;
use crate::error::AppError;
use crate::AppState;

/// GET /admin/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, AppError> {
    Ok(Json(state.dashboard_service.summary().await?))
}
