//! Admin service
//!
//! Back-office accounts: bootstrap, password login, API-key authentication
//! and user management.

use std::sync::Arc;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::app::history_service::record_history;
use crate::domain::entities::{
    lifecycle_entry, update_entries, AdminRole, AdminUser, AdminUserId, ChangeAction, NewAdminUser,
};
use crate::domain::ports::{AdminUserRepository, ChangeHistoryRepository};
use crate::error::{AppError, DomainError};

/// Prefix of every issued API key
pub const API_KEY_PREFIX: &str = "fd-";

pub const MIN_PASSWORD_LEN: usize = 8;

/// Service for managing admin users
pub struct AdminService<U, H>
where
    U: AdminUserRepository,
    H: ChangeHistoryRepository,
{
    users: Arc<U>,
    history: Arc<H>,
}

impl<U, H> AdminService<U, H>
where
    U: AdminUserRepository,
    H: ChangeHistoryRepository,
{
    pub fn new(users: Arc<U>, history: Arc<H>) -> Self {
        Self { users, history }
    }

    /// Create the first admin when no active admin exists yet.
    ///
    /// Returns the created user, or `None` when an admin is already present.
    pub async fn bootstrap(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<AdminUser>, AppError> {
        let users = self.users.list().await?;
        if users.iter().any(AdminUser::can_manage_users) {
            return Ok(None);
        }

        let admin = self.insert(username, password, AdminRole::Admin, None).await?;
        tracing::info!(username = %admin.username, "Bootstrapped admin user");
        Ok(Some(admin))
    }

    /// Check a username and password and issue a fresh API key.
    ///
    /// Returns (user, api_key); the key is only shown once and replaces any
    /// previous one.
    pub async fn login(&self, username: &str, password: &str) -> Result<(AdminUser, String), AppError> {
        let user = self
            .users
            .find_by_username(username.trim())
            .await?
            .filter(|u| u.is_active);

        let user = match user {
            Some(user) if verify_password(password, &user.password_hash) => user,
            _ => {
                tracing::warn!(username = %username.trim(), "Failed login attempt");
                return Err(AppError::Domain(DomainError::Unauthorized(
                    "Invalid username or password".to_string(),
                )));
            }
        };

        let api_key = generate_api_key();
        self.users
            .record_login(&user.id, &hash_api_key(&api_key))
            .await?;

        tracing::info!(user_id = %user.id, "Admin logged in");
        Ok((user, api_key))
    }

    /// Resolve a bearer API key to an active user
    pub async fn authenticate(&self, api_key: &str) -> Result<AdminUser, AppError> {
        if !api_key.starts_with(API_KEY_PREFIX) {
            return Err(AppError::Unauthorized);
        }
        self.users
            .find_by_api_key_hash(&hash_api_key(api_key))
            .await?
            .ok_or(AppError::Unauthorized)
    }

    pub async fn get(&self, id: &AdminUserId) -> Result<AdminUser, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {}", id)))
    }

    /// Create a user (admins only)
    pub async fn create_user(
        &self,
        actor: &AdminUser,
        username: &str,
        password: &str,
        role: AdminRole,
    ) -> Result<AdminUser, AppError> {
        require_manager(actor)?;
        let user = self
            .insert(username, password, role, Some(actor.id))
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, created_by = %actor.id, "Admin user created");
        Ok(user)
    }

    /// List users (admins only)
    pub async fn list(&self, actor: &AdminUser) -> Result<Vec<AdminUser>, AppError> {
        require_manager(actor)?;
        Ok(self.users.list().await?)
    }

    /// Deactivate a user and revoke their API key (admins only)
    pub async fn deactivate(&self, actor: &AdminUser, id: &AdminUserId) -> Result<AdminUser, AppError> {
        require_manager(actor)?;
        if actor.id == *id {
            return Err(AppError::BadRequest(
                "You cannot deactivate your own account".to_string(),
            ));
        }

        let before = self.get(id).await?;
        self.users.set_active(id, false).await?;
        let after = self.get(id).await?;

        record_history(
            self.history.as_ref(),
            update_entries(&before, &after, Some(actor.id)),
        )
        .await;

        tracing::info!(user_id = %id, by = %actor.id, "Admin user deactivated");
        Ok(after)
    }

    /// Change the caller's own password
    pub async fn change_password(
        &self,
        actor: &AdminUser,
        current: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if !verify_password(current, &actor.password_hash) {
            return Err(AppError::Domain(DomainError::Unauthorized(
                "Current password is incorrect".to_string(),
            )));
        }
        check_password(new_password)?;

        let hash = hash_password(new_password)?;
        self.users.update_password(&actor.id, &hash).await?;

        tracing::info!(user_id = %actor.id, "Password changed");
        Ok(())
    }

    async fn insert(
        &self,
        username: &str,
        password: &str,
        role: AdminRole,
        actor: Option<AdminUserId>,
    ) -> Result<AdminUser, AppError> {
        let username = username.trim();
        if username.len() < 3 || username.len() > 50 {
            return Err(AppError::BadRequest(
                "Username must be between 3 and 50 characters".to_string(),
            ));
        }
        check_password(password)?;

        if self.users.find_by_username(username).await?.is_some() {
            return Err(AppError::Domain(DomainError::AlreadyExists(format!(
                "User '{}'",
                username
            ))));
        }

        let user = self
            .users
            .create(&NewAdminUser {
                username: username.to_string(),
                password_hash: hash_password(password)?,
                role,
            })
            .await?;

        record_history(
            self.history.as_ref(),
            vec![lifecycle_entry(&user, ChangeAction::Create, actor)],
        )
        .await;
        Ok(user)
    }
}

fn require_manager(actor: &AdminUser) -> Result<(), AppError> {
    if actor.can_manage_users() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

fn check_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Domain(DomainError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        ))));
    }
    Ok(())
}

/// Hash a password with Argon2id and a random salt
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt_bytes: [u8; 16] = rand::thread_rng().gen();
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AppError::Internal(format!("Failed to encode salt: {}", e)))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Check a password against a stored Argon2 hash; malformed hashes never match
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    PasswordHash::new(password_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Generate a random API key
fn generate_api_key() -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    format!("{}{}", API_KEY_PREFIX, hex::encode(bytes))
}

/// Hash an API key for storage
pub fn hash_api_key(api_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    hex::encode(hasher.finalize())
}
