//! Change history domain entity
//!
//! A generic audit trail keyed by entity type and id. Updates are stored as
//! one row per changed field so the history reads like a field-level log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::admin_user::AdminUserId;

/// Unique identifier for a change history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeHistoryId(pub Uuid);

impl ChangeHistoryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ChangeHistoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ChangeHistoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of record a history entry refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Order,
    OrderItem,
    Warehouse,
    Inventory,
    Counterparty,
    AdminUser,
    Tracking,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Order => write!(f, "order"),
            EntityType::OrderItem => write!(f, "order_item"),
            EntityType::Warehouse => write!(f, "warehouse"),
            EntityType::Inventory => write!(f, "inventory"),
            EntityType::Counterparty => write!(f, "counterparty"),
            EntityType::AdminUser => write!(f, "admin_user"),
            EntityType::Tracking => write!(f, "tracking"),
        }
    }
}

impl std::str::FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "order" => Ok(EntityType::Order),
            "order_item" => Ok(EntityType::OrderItem),
            "warehouse" => Ok(EntityType::Warehouse),
            "inventory" => Ok(EntityType::Inventory),
            "counterparty" => Ok(EntityType::Counterparty),
            "admin_user" => Ok(EntityType::AdminUser),
            "tracking" => Ok(EntityType::Tracking),
            _ => Err(format!("Unknown entity type: {}", s)),
        }
    }
}

/// What happened to the entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeAction::Create => write!(f, "create"),
            ChangeAction::Update => write!(f, "update"),
            ChangeAction::Delete => write!(f, "delete"),
        }
    }
}

impl std::str::FromStr for ChangeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "create" => Ok(ChangeAction::Create),
            "update" => Ok(ChangeAction::Update),
            "delete" => Ok(ChangeAction::Delete),
            _ => Err(format!("Unknown change action: {}", s)),
        }
    }
}

/// One audit log entry
#[derive(Debug, Clone, Serialize)]
pub struct ChangeHistory {
    pub id: ChangeHistoryId,
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    pub action: ChangeAction,
    pub field: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub changed_by: Option<AdminUserId>,
    pub changed_at: DateTime<Utc>,
}

/// Data needed to record a history entry
#[derive(Debug, Clone, PartialEq)]
pub struct NewChangeHistory {
    pub entity_type: EntityType,
    pub entity_id: Uuid,
    pub action: ChangeAction,
    pub field: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub changed_by: Option<AdminUserId>,
}

/// A record that can be written to the change history.
///
/// `audit_fields` returns a stable, ordered snapshot of the user-visible
/// fields; derived values (totals, timestamps) are left out.
pub trait Auditable {
    const ENTITY_TYPE: EntityType;

    fn entity_id(&self) -> Uuid;

    fn audit_fields(&self) -> Vec<(&'static str, Option<String>)>;
}

/// A single field that differs between two snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: &'static str,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// Compare two snapshots of the same record field by field
pub fn diff_fields<T: Auditable>(before: &T, after: &T) -> Vec<FieldChange> {
    before
        .audit_fields()
        .into_iter()
        .zip(after.audit_fields())
        .filter(|((_, old), (_, new))| old != new)
        .map(|((field, old_value), (_, new_value))| FieldChange {
            field,
            old_value,
            new_value,
        })
        .collect()
}

/// Build the history rows for an update; empty when nothing changed
pub fn update_entries<T: Auditable>(
    before: &T,
    after: &T,
    changed_by: Option<AdminUserId>,
) -> Vec<NewChangeHistory> {
    diff_fields(before, after)
        .into_iter()
        .map(|change| NewChangeHistory {
            entity_type: T::ENTITY_TYPE,
            entity_id: after.entity_id(),
            action: ChangeAction::Update,
            field: Some(change.field.to_string()),
            old_value: change.old_value,
            new_value: change.new_value,
            changed_by,
        })
        .collect()
}

/// Build the single history row for a create or delete
pub fn lifecycle_entry<T: Auditable>(
    record: &T,
    action: ChangeAction,
    changed_by: Option<AdminUserId>,
) -> NewChangeHistory {
    NewChangeHistory {
        entity_type: T::ENTITY_TYPE,
        entity_id: record.entity_id(),
        action,
        field: None,
        old_value: None,
        new_value: None,
        changed_by,
    }
}
