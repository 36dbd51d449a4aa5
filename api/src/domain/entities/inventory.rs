//! Warehouse inventory domain entity
//!
//! Stock records held per warehouse. `quantity` is what physically sits in
//! the warehouse; `available_quantity` is what is not yet reserved by order
//! items. The difference is the reserved amount.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::change_history::{Auditable, EntityType};
use super::counterparty::CounterpartyId;
use super::order_item::{check_column, VOLUME_SCALE, WEIGHT_SCALE};
use super::warehouse::WarehouseId;
use crate::error::DomainError;

/// Unique identifier for an inventory row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InventoryId(pub Uuid);

impl InventoryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InventoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for InventoryId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for InventoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stock of one product in one warehouse
#[derive(Debug, Clone, Serialize)]
pub struct InventoryItem {
    pub id: InventoryId,
    pub warehouse_id: WarehouseId,
    /// Owner of the goods, if tracked
    pub counterparty_id: Option<CounterpartyId>,
    pub product_name: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub unit: String,
    pub quantity: i32,
    pub available_quantity: i32,
    /// Per-unit weight in kg
    pub weight: Option<Decimal>,
    /// Per-unit volume in m³
    pub volume: Option<Decimal>,
    pub arrived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    pub fn reserved_quantity(&self) -> i32 {
        self.quantity - self.available_quantity
    }

    /// Change the physical quantity while keeping reservations intact.
    ///
    /// Fails when the new quantity would not cover what is already reserved.
    pub fn set_quantity(&mut self, quantity: i32) -> Result<(), DomainError> {
        let reserved = self.reserved_quantity();
        if quantity < reserved {
            return Err(DomainError::Conflict(format!(
                "Quantity {} is below the {} {} reserved by orders",
                quantity, reserved, self.unit
            )));
        }
        self.quantity = quantity;
        self.available_quantity = quantity - reserved;
        Ok(())
    }

    /// Apply a signed stock movement (receipt or write-off)
    pub fn adjust(&mut self, delta: i32) -> Result<(), DomainError> {
        let quantity = self
            .quantity
            .checked_add(delta)
            .ok_or_else(|| DomainError::Validation("Quantity overflow".to_string()))?;
        self.set_quantity(quantity)
    }

    pub fn check_invariants(&self) -> Result<(), DomainError> {
        if self.available_quantity < 0 || self.available_quantity > self.quantity {
            return Err(DomainError::Validation(format!(
                "Available quantity {} must be between 0 and {}",
                self.available_quantity, self.quantity
            )));
        }
        check_measures(self.weight, self.volume)
    }
}

/// Optional weight and volume must fit their columns and not be negative
pub fn check_measures(weight: Option<Decimal>, volume: Option<Decimal>) -> Result<(), DomainError> {
    if weight.is_some_and(|w| w.is_sign_negative()) || volume.is_some_and(|v| v.is_sign_negative())
    {
        return Err(DomainError::Validation(
            "Weight and volume cannot be negative".to_string(),
        ));
    }
    if let Some(weight) = weight {
        check_column("Weight", weight, WEIGHT_SCALE)?;
    }
    if let Some(volume) = volume {
        check_column("Volume", volume, VOLUME_SCALE)?;
    }
    Ok(())
}

impl Auditable for InventoryItem {
    const ENTITY_TYPE: EntityType = EntityType::Inventory;

    fn entity_id(&self) -> Uuid {
        self.id.0
    }

    fn audit_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("warehouse_id", Some(self.warehouse_id.to_string())),
            ("counterparty_id", self.counterparty_id.map(|c| c.to_string())),
            ("product_name", Some(self.product_name.clone())),
            ("sku", self.sku.clone()),
            ("description", self.description.clone()),
            ("unit", Some(self.unit.clone())),
            ("quantity", Some(self.quantity.to_string())),
            ("available_quantity", Some(self.available_quantity.to_string())),
            ("weight", self.weight.map(|w| w.to_string())),
            ("volume", self.volume.map(|v| v.to_string())),
            ("arrived_at", self.arrived_at.map(|t| t.to_rfc3339())),
        ]
    }
}

/// Data needed to create an inventory row
#[derive(Debug, Clone)]
pub struct NewInventoryItem {
    pub warehouse_id: WarehouseId,
    pub counterparty_id: Option<CounterpartyId>,
    pub product_name: String,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub unit: String,
    pub quantity: i32,
    pub available_quantity: i32,
    pub weight: Option<Decimal>,
    pub volume: Option<Decimal>,
    pub arrived_at: Option<DateTime<Utc>>,
}

/// Editable fields of an inventory row
#[derive(Debug, Clone, Default)]
pub struct InventoryChanges {
    pub counterparty_id: Option<Option<CounterpartyId>>,
    pub product_name: Option<String>,
    pub sku: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub unit: Option<String>,
    pub quantity: Option<i32>,
    pub weight: Option<Option<Decimal>>,
    pub volume: Option<Option<Decimal>>,
    pub arrived_at: Option<Option<DateTime<Utc>>>,
}

impl InventoryChanges {
    pub fn apply(&self, item: &mut InventoryItem) -> Result<(), DomainError> {
        if let Some(counterparty_id) = self.counterparty_id {
            item.counterparty_id = counterparty_id;
        }
        if let Some(product_name) = &self.product_name {
            item.product_name = product_name.clone();
        }
        if let Some(sku) = &self.sku {
            item.sku = sku.clone();
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
        if let Some(unit) = &self.unit {
            item.unit = unit.clone();
        }
        if let Some(weight) = self.weight {
            item.weight = weight;
        }
        if let Some(volume) = self.volume {
            item.volume = volume;
        }
        if let Some(arrived_at) = self.arrived_at {
            item.arrived_at = arrived_at;
        }
        if let Some(quantity) = self.quantity {
            if quantity < 0 {
                return Err(DomainError::Validation(
                    "Quantity cannot be negative".to_string(),
                ));
            }
            item.set_quantity(quantity)?;
        }
        Ok(())
    }
}

/// Filters for listing inventory
#[derive(Debug, Clone, Default)]
pub struct InventoryFilter {
    pub warehouse_id: Option<WarehouseId>,
    pub counterparty_id: Option<CounterpartyId>,
    pub search: Option<String>,
    pub only_available: bool,
    pub limit: u64,
    pub offset: u64,
}
