//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::entities::{
    AdminRole, AdminUser, AdminUserId, Counterparty, CounterpartyId, CounterpartyKind,
    InventoryId, InventoryItem, Order, OrderId, OrderItem, OrderItemId, OrderStatus, OrderTotals,
    PaymentStatus, TransportStatus, TransportType, Warehouse, WarehouseId,
};

/// Create a test order in status `new` with zero totals
pub fn test_order() -> Order {
    Order {
        id: OrderId::new(),
        order_number: "FD-20250301-0001".to_string(),
        status: OrderStatus::New,
        counterparty_id: None,
        origin: "Guangzhou".to_string(),
        destination: "Moscow".to_string(),
        transport_type: TransportType::Rail,
        comment: Some("Consolidated LCL".to_string()),
        totals: OrderTotals::default(),
        created_by: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Create a test order with a specific status
pub fn test_order_with_status(status: OrderStatus) -> Order {
    Order {
        status,
        ..test_order()
    }
}

/// Create an unpaid, pending cargo line of 10 × 50.00 for the given order
pub fn test_order_item(order_id: OrderId) -> OrderItem {
    OrderItem {
        id: OrderItemId::new(),
        order_id,
        inventory_id: None,
        product_name: "LED panel 60x60".to_string(),
        description: None,
        quantity: 10,
        unit_price: dec!(50.00),
        total_amount: dec!(500.00),
        weight: dec!(42.5),
        volume: dec!(0.36),
        transport_status: TransportStatus::Pending,
        payment_status: PaymentStatus::Unpaid,
        paid_amount: Decimal::ZERO,
        remaining_amount: dec!(500.00),
        fulfilled_at: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Create an inventory row of 100 pcs, all available
pub fn test_inventory_item(warehouse_id: WarehouseId) -> InventoryItem {
    InventoryItem {
        id: InventoryId::new(),
        warehouse_id,
        counterparty_id: None,
        product_name: "LED panel 60x60".to_string(),
        sku: Some("LED-6060".to_string()),
        description: None,
        unit: "pcs".to_string(),
        quantity: 100,
        available_quantity: 100,
        weight: Some(dec!(4.25)),
        volume: Some(dec!(0.036)),
        arrived_at: Some(Utc::now()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Create an active test warehouse
pub fn test_warehouse() -> Warehouse {
    Warehouse {
        id: WarehouseId::new(),
        name: "Guangzhou Baiyun".to_string(),
        address: "88 Airport Road".to_string(),
        city: "Guangzhou".to_string(),
        country: "China".to_string(),
        phone: None,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Create a test client counterparty
pub fn test_counterparty() -> Counterparty {
    Counterparty {
        id: CounterpartyId::new(),
        name: "Volga Trading LLC".to_string(),
        kind: CounterpartyKind::Client,
        contact_person: Some("Irina Petrova".to_string()),
        phone: None,
        email: Some("orders@volga-trading.ru".to_string()),
        address: None,
        tax_id: Some("7701234567".to_string()),
        notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Create an active admin with no API key
pub fn test_admin_user() -> AdminUser {
    AdminUser {
        id: AdminUserId::new(),
        username: "admin".to_string(),
        password_hash: "not-a-real-hash".to_string(),
        api_key_hash: None,
        role: AdminRole::Admin,
        is_active: true,
        created_at: Utc::now(),
        last_login_at: None,
    }
}

/// Create an active manager with a specific username
pub fn test_manager(username: &str) -> AdminUser {
    AdminUser {
        username: username.to_string(),
        role: AdminRole::Manager,
        ..test_admin_user()
    }
}
