//! Order domain entity
//!
//! An order groups the cargo lines of one client engagement. Its totals are
//! never edited directly; they are recomputed from the order's items.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::admin_user::AdminUserId;
use super::change_history::{Auditable, EntityType};
use super::counterparty::CounterpartyId;
use super::order_item::{check_column, OrderItem, MONEY_SCALE, VOLUME_SCALE, WEIGHT_SCALE};
use crate::error::DomainError;

/// Unique identifier for an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub Uuid);

impl OrderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for OrderId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    New,
    Processing,
    InTransit,
    Arrived,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::New,
        OrderStatus::Processing,
        OrderStatus::InTransit,
        OrderStatus::Arrived,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Delivered and cancelled orders are closed for edits
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::New => write!(f, "new"),
            OrderStatus::Processing => write!(f, "processing"),
            OrderStatus::InTransit => write!(f, "in_transit"),
            OrderStatus::Arrived => write!(f, "arrived"),
            OrderStatus::Delivered => write!(f, "delivered"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new" => Ok(OrderStatus::New),
            "processing" => Ok(OrderStatus::Processing),
            "in_transit" => Ok(OrderStatus::InTransit),
            "arrived" => Ok(OrderStatus::Arrived),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(format!("Unknown order status: {}", s)),
        }
    }
}

/// How the cargo travels from origin to destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportType {
    Auto,
    Rail,
    Sea,
    Air,
    Multimodal,
}

impl std::fmt::Display for TransportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportType::Auto => write!(f, "auto"),
            TransportType::Rail => write!(f, "rail"),
            TransportType::Sea => write!(f, "sea"),
            TransportType::Air => write!(f, "air"),
            TransportType::Multimodal => write!(f, "multimodal"),
        }
    }
}

impl std::str::FromStr for TransportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(TransportType::Auto),
            "rail" => Ok(TransportType::Rail),
            "sea" => Ok(TransportType::Sea),
            "air" => Ok(TransportType::Air),
            "multimodal" => Ok(TransportType::Multimodal),
            _ => Err(format!("Unknown transport type: {}", s)),
        }
    }
}

/// Aggregated figures of an order, derived from its items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OrderTotals {
    pub total_quantity: i32,
    pub total_weight: Decimal,
    pub total_volume: Decimal,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub remaining_amount: Decimal,
}

impl OrderTotals {
    /// Aggregate the given items. Remaining is derived from the sums so that
    /// `total_amount = remaining_amount + paid_amount` holds exactly.
    ///
    /// Fails when a sum no longer fits the order's columns.
    pub fn from_items(items: &[OrderItem]) -> Result<Self, DomainError> {
        let overflow =
            |field: &str| DomainError::Validation(format!("Order {} is out of range", field));

        let mut totals = OrderTotals::default();
        for item in items {
            totals.total_quantity = totals
                .total_quantity
                .checked_add(item.quantity)
                .ok_or_else(|| overflow("quantity"))?;
            totals.total_weight = totals
                .total_weight
                .checked_add(item.weight)
                .ok_or_else(|| overflow("weight"))?;
            totals.total_volume = totals
                .total_volume
                .checked_add(item.volume)
                .ok_or_else(|| overflow("volume"))?;
            totals.total_amount = totals
                .total_amount
                .checked_add(item.total_amount)
                .ok_or_else(|| overflow("total"))?;
            totals.paid_amount = totals
                .paid_amount
                .checked_add(item.paid_amount)
                .ok_or_else(|| overflow("paid amount"))?;
        }
        totals.remaining_amount = totals.total_amount - totals.paid_amount;

        check_column("Order total weight", totals.total_weight, WEIGHT_SCALE)?;
        check_column("Order total volume", totals.total_volume, VOLUME_SCALE)?;
        check_column("Order total", totals.total_amount, MONEY_SCALE)?;
        check_column("Order paid amount", totals.paid_amount, MONEY_SCALE)?;
        Ok(totals)
    }
}

/// A shipment grouping order items for one client engagement
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub status: OrderStatus,
    pub counterparty_id: Option<CounterpartyId>,
    pub origin: String,
    pub destination: String,
    pub transport_type: TransportType,
    pub comment: Option<String>,
    #[serde(flatten)]
    pub totals: OrderTotals,
    pub created_by: Option<AdminUserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Whether header fields and items may still be edited
    pub fn is_editable(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Check if the order may move to the given status
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        !self.status.is_terminal() && self.status != next
    }
}

impl Auditable for Order {
    const ENTITY_TYPE: EntityType = EntityType::Order;

    fn entity_id(&self) -> Uuid {
        self.id.0
    }

    fn audit_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("order_number", Some(self.order_number.clone())),
            ("status", Some(self.status.to_string())),
            ("counterparty_id", self.counterparty_id.map(|c| c.to_string())),
            ("origin", Some(self.origin.clone())),
            ("destination", Some(self.destination.clone())),
            ("transport_type", Some(self.transport_type.to_string())),
            ("comment", self.comment.clone()),
        ]
    }
}

/// Data needed to create a new order
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_number: String,
    pub counterparty_id: Option<CounterpartyId>,
    pub origin: String,
    pub destination: String,
    pub transport_type: TransportType,
    pub comment: Option<String>,
    pub created_by: Option<AdminUserId>,
}

/// Editable header fields of an order. `None` leaves a field unchanged;
/// `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default)]
pub struct OrderChanges {
    pub counterparty_id: Option<Option<CounterpartyId>>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub transport_type: Option<TransportType>,
    pub comment: Option<Option<String>>,
}

impl OrderChanges {
    pub fn apply(&self, order: &mut Order) {
        if let Some(counterparty_id) = self.counterparty_id {
            order.counterparty_id = counterparty_id;
        }
        if let Some(origin) = &self.origin {
            order.origin = origin.clone();
        }
        if let Some(destination) = &self.destination {
            order.destination = destination.clone();
        }
        if let Some(transport_type) = self.transport_type {
            order.transport_type = transport_type;
        }
        if let Some(comment) = &self.comment {
            order.comment = comment.clone();
        }
    }
}

/// Filters for listing orders
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub counterparty_id: Option<CounterpartyId>,
    pub search: Option<String>,
    pub limit: u64,
    pub offset: u64,
}
