//! Warehouse domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::change_history::{Auditable, EntityType};

/// Unique identifier for a warehouse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WarehouseId(pub Uuid);

impl WarehouseId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WarehouseId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for WarehouseId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for WarehouseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A consolidation warehouse (typically in China) holding client stock
#[derive(Debug, Clone, Serialize)]
pub struct Warehouse {
    pub id: WarehouseId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Auditable for Warehouse {
    const ENTITY_TYPE: EntityType = EntityType::Warehouse;

    fn entity_id(&self) -> Uuid {
        self.id.0
    }

    fn audit_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("name", Some(self.name.clone())),
            ("address", Some(self.address.clone())),
            ("city", Some(self.city.clone())),
            ("country", Some(self.country.clone())),
            ("phone", self.phone.clone()),
            ("is_active", Some(self.is_active.to_string())),
        ]
    }
}

/// Data needed to create a warehouse
#[derive(Debug, Clone)]
pub struct NewWarehouse {
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub phone: Option<String>,
}

/// Editable fields of a warehouse
#[derive(Debug, Clone, Default)]
pub struct WarehouseChanges {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub phone: Option<Option<String>>,
    pub is_active: Option<bool>,
}

impl WarehouseChanges {
    pub fn apply(&self, warehouse: &mut Warehouse) {
        if let Some(name) = &self.name {
            warehouse.name = name.clone();
        }
        if let Some(address) = &self.address {
            warehouse.address = address.clone();
        }
        if let Some(city) = &self.city {
            warehouse.city = city.clone();
        }
        if let Some(country) = &self.country {
            warehouse.country = country.clone();
        }
        if let Some(phone) = &self.phone {
            warehouse.phone = phone.clone();
        }
        if let Some(is_active) = self.is_active {
            warehouse.is_active = is_active;
        }
    }
}
