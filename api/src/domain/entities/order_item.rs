//! Order item domain entity
//!
//! A single cargo line within an order: product, quantity, pricing, and its
//! transport and payment progress. Items sourced from warehouse inventory
//! carry the inventory row they reserve from.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::change_history::{Auditable, EntityType};
use super::inventory::InventoryId;
use super::order::OrderId;
use crate::error::DomainError;

/// Unique identifier for an order item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderItemId(pub Uuid);

impl OrderItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for OrderItemId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for OrderItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the cargo line is on its way to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportStatus {
    Pending,
    Shipped,
    InTransit,
    Arrived,
    Delivered,
}

impl std::fmt::Display for TransportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportStatus::Pending => write!(f, "pending"),
            TransportStatus::Shipped => write!(f, "shipped"),
            TransportStatus::InTransit => write!(f, "in_transit"),
            TransportStatus::Arrived => write!(f, "arrived"),
            TransportStatus::Delivered => write!(f, "delivered"),
        }
    }
}

impl std::str::FromStr for TransportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(TransportStatus::Pending),
            "shipped" => Ok(TransportStatus::Shipped),
            "in_transit" => Ok(TransportStatus::InTransit),
            "arrived" => Ok(TransportStatus::Arrived),
            "delivered" => Ok(TransportStatus::Delivered),
            _ => Err(format!("Unknown transport status: {}", s)),
        }
    }
}

/// Payment progress of a line, always derived from its amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    PartiallyPaid,
    Paid,
}

impl PaymentStatus {
    pub fn from_amounts(total: Decimal, paid: Decimal) -> Self {
        if paid >= total {
            PaymentStatus::Paid
        } else if paid.is_zero() {
            PaymentStatus::Unpaid
        } else {
            PaymentStatus::PartiallyPaid
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Unpaid => write!(f, "unpaid"),
            PaymentStatus::PartiallyPaid => write!(f, "partially_paid"),
            PaymentStatus::Paid => write!(f, "paid"),
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unpaid" => Ok(PaymentStatus::Unpaid),
            "partially_paid" => Ok(PaymentStatus::PartiallyPaid),
            "paid" => Ok(PaymentStatus::Paid),
            _ => Err(format!("Unknown payment status: {}", s)),
        }
    }
}

/// A cargo line within an order
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    /// Inventory row this line is sourced from, if any
    pub inventory_id: Option<InventoryId>,
    pub product_name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_amount: Decimal,
    /// Line weight in kg
    pub weight: Decimal,
    /// Line volume in m³
    pub volume: Decimal,
    pub transport_status: TransportStatus,
    pub payment_status: PaymentStatus,
    pub paid_amount: Decimal,
    pub remaining_amount: Decimal,
    /// Set once the reserved stock has been taken out of the warehouse
    pub fulfilled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderItem {
    pub fn is_fulfilled(&self) -> bool {
        self.fulfilled_at.is_some()
    }

    /// Stock still held in reserve for this line
    pub fn reserved_quantity(&self) -> i32 {
        match (self.inventory_id, self.is_fulfilled()) {
            (Some(_), false) => self.quantity,
            _ => 0,
        }
    }

    /// Whether moving to `next` takes the goods out of the warehouse
    pub fn fulfills_on(&self, next: TransportStatus) -> bool {
        self.inventory_id.is_some()
            && !self.is_fulfilled()
            && next != TransportStatus::Pending
    }

    /// Recompute the derived money fields after quantity, price or payment
    /// changed, enforcing `0 <= paid <= total`.
    pub fn recalculate(&mut self) -> Result<(), DomainError> {
        validate_line(self.quantity, self.unit_price, self.weight, self.volume)?;
        if self.paid_amount.is_sign_negative() {
            return Err(DomainError::Validation(
                "Paid amount cannot be negative".to_string(),
            ));
        }

        check_column("Paid amount", self.paid_amount, MONEY_SCALE)?;

        self.total_amount = self
            .unit_price
            .checked_mul(Decimal::from(self.quantity))
            .ok_or_else(|| DomainError::Validation("Line total is out of range".to_string()))?;
        check_column("Line total", self.total_amount, MONEY_SCALE)?;
        if self.paid_amount > self.total_amount {
            return Err(DomainError::Validation(format!(
                "Paid amount {} exceeds line total {}",
                self.paid_amount, self.total_amount
            )));
        }
        self.remaining_amount = self.total_amount - self.paid_amount;
        self.payment_status = PaymentStatus::from_amounts(self.total_amount, self.paid_amount);
        Ok(())
    }
}

/// Largest quantity a single cargo line may carry
pub const MAX_LINE_QUANTITY: i32 = 1_000_000;

/// Decimal places stored for money columns
pub const MONEY_SCALE: u32 = 2;
/// Decimal places stored for weight columns (kg)
pub const WEIGHT_SCALE: u32 = 3;
/// Decimal places stored for volume columns (m³)
pub const VOLUME_SCALE: u32 = 4;

/// Total digits of every `numeric` column
const COLUMN_PRECISION: u32 = 14;

/// Exclusive upper bound of a `numeric(14, scale)` column
pub fn column_limit(scale: u32) -> Decimal {
    Decimal::from(10_i64.pow(COLUMN_PRECISION - scale))
}

/// Reject values the database would round or refuse: more fractional
/// digits than `scale`, or a magnitude beyond `numeric(14, scale)`.
pub fn check_column(field: &str, value: Decimal, scale: u32) -> Result<(), DomainError> {
    if value.normalize().scale() > scale {
        return Err(DomainError::Validation(format!(
            "{} {} has more than {} decimal places",
            field, value, scale
        )));
    }
    if value.abs() >= column_limit(scale) {
        return Err(DomainError::Validation(format!(
            "{} {} is out of range",
            field, value
        )));
    }
    Ok(())
}

/// Validate the numeric fields every cargo line must satisfy
pub fn validate_line(
    quantity: i32,
    unit_price: Decimal,
    weight: Decimal,
    volume: Decimal,
) -> Result<(), DomainError> {
    if quantity <= 0 {
        return Err(DomainError::Validation(
            "Quantity must be greater than zero".to_string(),
        ));
    }
    if quantity > MAX_LINE_QUANTITY {
        return Err(DomainError::Validation(format!(
            "Quantity cannot exceed {}",
            MAX_LINE_QUANTITY
        )));
    }
    if unit_price.is_sign_negative() {
        return Err(DomainError::Validation(
            "Unit price cannot be negative".to_string(),
        ));
    }
    if weight.is_sign_negative() || volume.is_sign_negative() {
        return Err(DomainError::Validation(
            "Weight and volume cannot be negative".to_string(),
        ));
    }
    check_column("Unit price", unit_price, MONEY_SCALE)?;
    check_column("Weight", weight, WEIGHT_SCALE)?;
    check_column("Volume", volume, VOLUME_SCALE)
}

impl Auditable for OrderItem {
    const ENTITY_TYPE: EntityType = EntityType::OrderItem;

    fn entity_id(&self) -> Uuid {
        self.id.0
    }

    fn audit_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("inventory_id", self.inventory_id.map(|i| i.to_string())),
            ("product_name", Some(self.product_name.clone())),
            ("description", self.description.clone()),
            ("quantity", Some(self.quantity.to_string())),
            ("unit_price", Some(self.unit_price.to_string())),
            ("weight", Some(self.weight.to_string())),
            ("volume", Some(self.volume.to_string())),
            ("transport_status", Some(self.transport_status.to_string())),
            ("paid_amount", Some(self.paid_amount.to_string())),
        ]
    }
}

/// Data needed to add a cargo line to an order
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub order_id: OrderId,
    pub inventory_id: Option<InventoryId>,
    pub product_name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub weight: Decimal,
    pub volume: Decimal,
    pub paid_amount: Decimal,
}

/// Editable fields of an order item
#[derive(Debug, Clone, Default)]
pub struct OrderItemChanges {
    pub inventory_id: Option<Option<InventoryId>>,
    pub product_name: Option<String>,
    pub description: Option<Option<String>>,
    pub quantity: Option<i32>,
    pub unit_price: Option<Decimal>,
    pub weight: Option<Decimal>,
    pub volume: Option<Decimal>,
    pub paid_amount: Option<Decimal>,
    pub transport_status: Option<TransportStatus>,
}

impl OrderItemChanges {
    /// Whether the change touches the stock side of the line
    pub fn touches_stock(&self, item: &OrderItem) -> bool {
        self.quantity.is_some_and(|q| q != item.quantity)
            || self.inventory_id.is_some_and(|i| i != item.inventory_id)
    }

    /// Apply every field except transport status, which drives fulfillment
    /// and is handled by the service.
    pub fn apply(&self, item: &mut OrderItem) {
        if let Some(inventory_id) = self.inventory_id {
            item.inventory_id = inventory_id;
        }
        if let Some(product_name) = &self.product_name {
            item.product_name = product_name.clone();
        }
        if let Some(description) = &self.description {
            item.description = description.clone();
        }
        if let Some(quantity) = self.quantity {
            item.quantity = quantity;
        }
        if let Some(unit_price) = self.unit_price {
            item.unit_price = unit_price;
        }
        if let Some(weight) = self.weight {
            item.weight = weight;
        }
        if let Some(volume) = self.volume {
            item.volume = volume;
        }
        if let Some(paid_amount) = self.paid_amount {
            item.paid_amount = paid_amount;
        }
    }
}
