//! Customer tracking domain entity
//!
//! A public tracking code lets a client follow an order on the website
//! without logging in. The public view deliberately carries no money or
//! counterparty data.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::change_history::{Auditable, EntityType};
use super::order::{Order, OrderId, OrderStatus, TransportType};
use super::order_item::{OrderItem, TransportStatus};

/// Characters used for tracking codes (no 0/O, 1/I/L)
pub const TRACKING_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Length of a tracking code
pub const TRACKING_CODE_LEN: usize = 10;

/// Unique identifier for a tracking record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackingId(pub Uuid);

impl TrackingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TrackingId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for TrackingId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TrackingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A public tracking code bound to an order
#[derive(Debug, Clone, Serialize)]
pub struct CustomerTracking {
    pub id: TrackingId,
    pub tracking_code: String,
    pub order_id: OrderId,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Auditable for CustomerTracking {
    const ENTITY_TYPE: EntityType = EntityType::Tracking;

    fn entity_id(&self) -> Uuid {
        self.id.0
    }

    fn audit_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("tracking_code", Some(self.tracking_code.clone())),
            ("order_id", Some(self.order_id.to_string())),
            ("is_active", Some(self.is_active.to_string())),
        ]
    }
}

fn code_regex() -> &'static Regex {
    static CODE: OnceLock<Regex> = OnceLock::new();
    CODE.get_or_init(|| {
        Regex::new(r"^[A-HJKMNP-Z2-9]{10}$").expect("tracking code regex is valid")
    })
}

/// Normalize user input into a tracking code, or `None` if it cannot be one
pub fn normalize_code(input: &str) -> Option<String> {
    let code = input.trim().to_uppercase();
    code_regex().is_match(&code).then_some(code)
}

/// One cargo line as shown to the public
#[derive(Debug, Clone, Serialize)]
pub struct PublicTrackingItem {
    pub product_name: String,
    pub quantity: i32,
    pub transport_status: TransportStatus,
}

/// What a client sees when looking up a tracking code
#[derive(Debug, Clone, Serialize)]
pub struct PublicTrackingView {
    pub tracking_code: String,
    pub order_number: String,
    pub status: OrderStatus,
    pub origin: String,
    pub destination: String,
    pub transport_type: TransportType,
    pub total_quantity: i32,
    pub total_weight: Decimal,
    pub total_volume: Decimal,
    pub items: Vec<PublicTrackingItem>,
    pub updated_at: DateTime<Utc>,
}

impl PublicTrackingView {
    pub fn new(tracking_code: String, order: &Order, items: &[OrderItem]) -> Self {
        Self {
            tracking_code,
            order_number: order.order_number.clone(),
            status: order.status,
            origin: order.origin.clone(),
            destination: order.destination.clone(),
            transport_type: order.transport_type,
            total_quantity: order.totals.total_quantity,
            total_weight: order.totals.total_weight,
            total_volume: order.totals.total_volume,
            items: items
                .iter()
                .map(|item| PublicTrackingItem {
                    product_name: item.product_name.clone(),
                    quantity: item.quantity,
                    transport_status: item.transport_status,
                })
                .collect(),
            updated_at: order.updated_at,
        }
    }
}
