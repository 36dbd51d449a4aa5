//! PostgreSQL adapter for AdminUserRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::entities::{AdminRole, AdminUser, AdminUserId, NewAdminUser};
use crate::domain::ports::AdminUserRepository;
use crate::entity::admin_users;
use crate::error::DomainError;

/// PostgreSQL implementation of AdminUserRepository
pub struct PostgresAdminUserRepository {
    db: DatabaseConnection,
}

impl PostgresAdminUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AdminUserRepository for PostgresAdminUserRepository {
    async fn find_by_id(&self, id: &AdminUserId) -> Result<Option<AdminUser>, DomainError> {
        let result = admin_users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>, DomainError> {
        let result = admin_users::Entity::find()
            .filter(admin_users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_api_key_hash(&self, hash: &str) -> Result<Option<AdminUser>, DomainError> {
        let result = admin_users::Entity::find()
            .filter(admin_users::Column::ApiKeyHash.eq(hash))
            .filter(admin_users::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(&self) -> Result<Vec<AdminUser>, DomainError> {
        let results = admin_users::Entity::find()
            .order_by_asc(admin_users::Column::Username)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, user: &NewAdminUser) -> Result<AdminUser, DomainError> {
        let model = admin_users::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(user.username.clone()),
            password_hash: Set(user.password_hash.clone()),
            api_key_hash: Set(None),
            role: Set(user.role.to_string()),
            is_active: Set(true),
            created_at: Set(Utc::now().fixed_offset()),
            last_login_at: Set(None),
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            let msg = e.to_string();
            if msg.contains("duplicate key") {
                DomainError::AlreadyExists(format!("User '{}'", user.username))
            } else {
                DomainError::Database(msg)
            }
        })?;

        Ok(result.into())
    }

    async fn record_login(
        &self,
        id: &AdminUserId,
        api_key_hash: &str,
    ) -> Result<(), DomainError> {
        admin_users::ActiveModel {
            id: Set(id.0),
            api_key_hash: Set(Some(api_key_hash.to_string())),
            last_login_at: Set(Some(Utc::now().fixed_offset())),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn update_password(
        &self,
        id: &AdminUserId,
        password_hash: &str,
    ) -> Result<(), DomainError> {
        admin_users::ActiveModel {
            id: Set(id.0),
            password_hash: Set(password_hash.to_string()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn set_active(&self, id: &AdminUserId, active: bool) -> Result<(), DomainError> {
        let mut model = admin_users::ActiveModel {
            id: Set(id.0),
            is_active: Set(active),
            ..Default::default()
        };
        if !active {
            model.api_key_hash = Set(None);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))?;

        Ok(())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        admin_users::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| DomainError::Database(e.to_string()))
    }
}

/// Convert SeaORM model to domain entity
impl From<admin_users::Model> for AdminUser {
    fn from(model: admin_users::Model) -> Self {
        AdminUser {
            id: AdminUserId(model.id),
            username: model.username,
            password_hash: model.password_hash,
            api_key_hash: model.api_key_hash,
            role: model.role.parse().unwrap_or(AdminRole::Manager),
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
            last_login_at: model.last_login_at.map(|dt| dt.with_timezone(&Utc)),
        }
    }
}
