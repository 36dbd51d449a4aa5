//! Admin user domain entity
//!
//! Back-office staff. Passwords are stored as Argon2 hashes and API keys as
//! SHA-256 hashes; neither plaintext ever reaches the database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::change_history::{Auditable, EntityType};

/// Unique identifier for an admin user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdminUserId(pub Uuid);

impl AdminUserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AdminUserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for AdminUserId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for AdminUserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Back-office role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    /// Full access, including user management
    Admin,
    /// Day-to-day order and stock work
    Manager,
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdminRole::Admin => write!(f, "admin"),
            AdminRole::Manager => write!(f, "manager"),
        }
    }
}

impl std::str::FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(AdminRole::Admin),
            "manager" => Ok(AdminRole::Manager),
            _ => Err(format!("Unknown admin role: {}", s)),
        }
    }
}

/// A back-office user
#[derive(Debug, Clone, Serialize)]
pub struct AdminUser {
    pub id: AdminUserId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub api_key_hash: Option<String>,
    pub role: AdminRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl AdminUser {
    pub fn can_manage_users(&self) -> bool {
        self.is_active && self.role == AdminRole::Admin
    }
}

impl Auditable for AdminUser {
    const ENTITY_TYPE: EntityType = EntityType::AdminUser;

    fn entity_id(&self) -> Uuid {
        self.id.0
    }

    fn audit_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("username", Some(self.username.clone())),
            ("role", Some(self.role.to_string())),
            ("is_active", Some(self.is_active.to_string())),
        ]
    }
}

/// Data needed to create an admin user
#[derive(Debug, Clone)]
pub struct NewAdminUser {
    pub username: String,
    pub password_hash: String,
    pub role: AdminRole,
}
