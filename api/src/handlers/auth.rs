//! Auth and user handlers
//!
//! Password login issues the API key used for every `/admin` call.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{AdminRole, AdminUser, AdminUserId};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response for a successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Only shown once; send as `Authorization: Bearer <api_key>`
    pub api_key: String,
    pub user: AdminUser,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: AdminRole,
}

fn default_role() -> AdminRole {
    AdminRole::Manager
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let (user, api_key) = state
        .admin_service
        .login(&request.username, &request.password)
        .await?;

    Ok(Json(LoginResponse { api_key, user }))
}

/// GET /admin/me
pub async fn me(Extension(user): Extension<AdminUser>) -> Json<AdminUser> {
    Json(user)
}

/// POST /admin/me/password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<AdminUser>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    state
        .admin_service
        .change_password(&user, &request.current_password, &request.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /admin/users
pub async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<AdminUser>,
) -> Result<Json<Vec<AdminUser>>, AppError> {
    Ok(Json(state.admin_service.list(&user).await?))
}

/// POST /admin/users
pub async fn create_user(
    State(state): State<AppState>,
    Extension(user): Extension<AdminUser>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<AdminUser>), AppError> {
    let created = state
        .admin_service
        .create_user(&user, &request.username, &request.password, request.role)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /admin/users/:id/deactivate
pub async fn deactivate_user(
    State(state): State<AppState>,
    Extension(user): Extension<AdminUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<AdminUser>, AppError> {
    let deactivated = state
        .admin_service
        .deactivate(&user, &AdminUserId(id))
        .await?;
    Ok(Json(deactivated))
}
