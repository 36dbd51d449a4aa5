//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::domain::entities::{
    AdminUser, AdminUserId, ChangeHistory, ChangeHistoryId, Counterparty, CounterpartyFilter,
    CounterpartyId, CustomerTracking, EntityType, InventoryFilter, InventoryId, InventoryItem,
    NewAdminUser, NewChangeHistory, NewCounterparty, NewInventoryItem, NewOrder, NewWarehouse,
    Order, OrderFilter, OrderId, OrderItem, OrderItemId, OrderStatus, OrderTotals, PaymentStatus,
    TrackingId, Warehouse, WarehouseId,
};
use crate::domain::entities::{column_limit, MONEY_SCALE, VOLUME_SCALE, WEIGHT_SCALE};
use crate::domain::ports::{
    AdminUserRepository, ChangeHistoryRepository, CounterpartyRepository, InventoryRepository,
    OrderItemRepository, OrderRepository, TrackingRepository, WarehouseRepository,
};
use crate::error::DomainError;

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn page<T>(items: Vec<T>, limit: u64, offset: u64) -> Vec<T> {
    items
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect()
}

// ============================================================================
// In-Memory Order Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: Arc<RwLock<HashMap<OrderId, Order>>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with an order for testing
    pub fn with_order(self, order: Order) -> Self {
        self.orders.write().unwrap().insert(order.id, order);
        self
    }

    /// Read the stored order without going through the trait
    pub fn get(&self, id: &OrderId) -> Option<Order> {
        self.orders.read().unwrap().get(id).cloned()
    }

    fn matching(&self, filter: &OrderFilter) -> Vec<Order> {
        let orders = self.orders.read().unwrap();
        let mut result: Vec<Order> = orders
            .values()
            .filter(|o| filter.status.map_or(true, |s| o.status == s))
            .filter(|o| {
                filter
                    .counterparty_id
                    .map_or(true, |c| o.counterparty_id == Some(c))
            })
            .filter(|o| {
                filter.search.as_deref().map_or(true, |s| {
                    contains_ci(&o.order_number, s)
                        || contains_ci(&o.origin, s)
                        || contains_ci(&o.destination, s)
                        || o.comment.as_deref().map_or(false, |c| contains_ci(c, s))
                })
            })
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        result
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError> {
        Ok(self.orders.read().unwrap().get(id).cloned())
    }

    async fn find_by_number(&self, order_number: &str) -> Result<Option<Order>, DomainError> {
        let orders = self.orders.read().unwrap();
        Ok(orders
            .values()
            .find(|o| o.order_number == order_number)
            .cloned())
    }

    async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, DomainError> {
        Ok(page(self.matching(filter), filter.limit, filter.offset))
    }

    async fn count(&self, filter: &OrderFilter) -> Result<u64, DomainError> {
        Ok(self.matching(filter).len() as u64)
    }

    async fn create(&self, new_order: &NewOrder) -> Result<Order, DomainError> {
        let mut orders = self.orders.write().unwrap();
        if orders
            .values()
            .any(|o| o.order_number == new_order.order_number)
        {
            return Err(DomainError::AlreadyExists(format!(
                "Order number {}",
                new_order.order_number
            )));
        }

        let order = Order {
            id: OrderId::new(),
            order_number: new_order.order_number.clone(),
            status: OrderStatus::New,
            counterparty_id: new_order.counterparty_id,
            origin: new_order.origin.clone(),
            destination: new_order.destination.clone(),
            transport_type: new_order.transport_type,
            comment: new_order.comment.clone(),
            totals: OrderTotals::default(),
            created_by: new_order.created_by,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn update(&self, order: &Order) -> Result<Order, DomainError> {
        let mut orders = self.orders.write().unwrap();
        let stored = orders
            .get_mut(&order.id)
            .ok_or_else(|| DomainError::NotFound(format!("Order {}", order.id)))?;

        // Totals are owned by update_totals
        let totals = stored.totals;
        *stored = order.clone();
        stored.totals = totals;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn update_totals(&self, id: &OrderId, totals: &OrderTotals) -> Result<(), DomainError> {
        let mut orders = self.orders.write().unwrap();
        let stored = orders
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Order {}", id)))?;
        stored.totals = *totals;
        stored.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: &OrderId) -> Result<(), DomainError> {
        self.orders
            .write()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::NotFound(format!("Order {}", id)))
    }

    async fn count_by_status(&self, status: OrderStatus) -> Result<u64, DomainError> {
        let orders = self.orders.read().unwrap();
        Ok(orders.values().filter(|o| o.status == status).count() as u64)
    }

    async fn count_by_counterparty(&self, id: &CounterpartyId) -> Result<u64, DomainError> {
        let orders = self.orders.read().unwrap();
        Ok(orders
            .values()
            .filter(|o| o.counterparty_id == Some(*id))
            .count() as u64)
    }

    async fn sum_outstanding(&self) -> Result<Decimal, DomainError> {
        let orders = self.orders.read().unwrap();
        Ok(orders
            .values()
            .filter(|o| o.status != OrderStatus::Cancelled)
            .map(|o| o.totals.remaining_amount)
            .sum())
    }
}

// ============================================================================
// In-Memory Order Item Repository
// ============================================================================

/// Store a value the way a `numeric(14, scale)` column does: round half away
/// from zero, fail when the integer part does not fit.
fn numeric_column(value: Decimal, scale: u32) -> Result<Decimal, DomainError> {
    let stored = value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
    if stored.abs() >= column_limit(scale) {
        return Err(DomainError::Database(format!(
            "numeric field overflow: {}",
            value
        )));
    }
    Ok(stored)
}

fn stored_item(item: &OrderItem) -> Result<OrderItem, DomainError> {
    let mut stored = item.clone();
    stored.unit_price = numeric_column(item.unit_price, MONEY_SCALE)?;
    stored.total_amount = numeric_column(item.total_amount, MONEY_SCALE)?;
    stored.paid_amount = numeric_column(item.paid_amount, MONEY_SCALE)?;
    stored.remaining_amount = numeric_column(item.remaining_amount, MONEY_SCALE)?;
    stored.weight = numeric_column(item.weight, WEIGHT_SCALE)?;
    stored.volume = numeric_column(item.volume, VOLUME_SCALE)?;
    Ok(stored)
}

#[derive(Default)]
pub struct InMemoryOrderItemRepository {
    items: Arc<RwLock<HashMap<OrderItemId, OrderItem>>>,
}

impl InMemoryOrderItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with an item for testing
    pub fn with_item(self, item: OrderItem) -> Self {
        self.items.write().unwrap().insert(item.id, item);
        self
    }

    pub fn get(&self, id: &OrderItemId) -> Option<OrderItem> {
        self.items.read().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl OrderItemRepository for InMemoryOrderItemRepository {
    async fn find_by_id(&self, id: &OrderItemId) -> Result<Option<OrderItem>, DomainError> {
        Ok(self.items.read().unwrap().get(id).cloned())
    }

    async fn find_by_order(&self, order_id: &OrderId) -> Result<Vec<OrderItem>, DomainError> {
        let items = self.items.read().unwrap();
        let mut result: Vec<OrderItem> = items
            .values()
            .filter(|i| i.order_id == *order_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(result)
    }

    async fn create(&self, item: &OrderItem) -> Result<OrderItem, DomainError> {
        let stored = stored_item(item)?;
        self.items.write().unwrap().insert(item.id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, item: &OrderItem) -> Result<OrderItem, DomainError> {
        let mut items = self.items.write().unwrap();
        if !items.contains_key(&item.id) {
            return Err(DomainError::NotFound(format!("Order item {}", item.id)));
        }
        let mut updated = stored_item(item)?;
        updated.updated_at = Utc::now();
        items.insert(item.id, updated.clone());
        Ok(updated)
    }

    async fn add_payment(
        &self,
        id: &OrderItemId,
        amount: Decimal,
    ) -> Result<OrderItem, DomainError> {
        let mut items = self.items.write().unwrap();
        let item = items
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Order item {}", id)))?;

        let paid = item
            .paid_amount
            .checked_add(amount)
            .ok_or_else(|| DomainError::Database("numeric field overflow".to_string()))?;
        let paid = numeric_column(paid, MONEY_SCALE)?;
        if paid > item.total_amount {
            return Err(DomainError::Validation(format!(
                "Payment of {} exceeds the remaining {}",
                amount, item.remaining_amount
            )));
        }
        item.paid_amount = paid;
        item.remaining_amount = item.total_amount - paid;
        item.payment_status = if paid >= item.total_amount {
            PaymentStatus::Paid
        } else {
            PaymentStatus::PartiallyPaid
        };
        item.updated_at = Utc::now();
        Ok(item.clone())
    }

    async fn delete(&self, id: &OrderItemId) -> Result<(), DomainError> {
        self.items
            .write()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::NotFound(format!("Order item {}", id)))
    }

    async fn count_reserving(&self, inventory_id: &InventoryId) -> Result<u64, DomainError> {
        let items = self.items.read().unwrap();
        Ok(items
            .values()
            .filter(|i| i.inventory_id == Some(*inventory_id) && !i.is_fulfilled())
            .count() as u64)
    }
}

// ============================================================================
// In-Memory Inventory Repository
// ============================================================================

fn require_positive(quantity: i32) -> Result<(), DomainError> {
    if quantity <= 0 {
        return Err(DomainError::Validation(
            "Stock movement must be positive".to_string(),
        ));
    }
    Ok(())
}

#[derive(Default)]
pub struct InMemoryInventoryRepository {
    rows: Arc<RwLock<HashMap<InventoryId, InventoryItem>>>,
}

impl InMemoryInventoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with an inventory row for testing
    pub fn with_row(self, row: InventoryItem) -> Self {
        self.rows.write().unwrap().insert(row.id, row);
        self
    }

    pub fn get(&self, id: &InventoryId) -> Option<InventoryItem> {
        self.rows.read().unwrap().get(id).cloned()
    }

    /// Same guards as the conditional UPDATEs of the Postgres adapter
    fn movement(
        &self,
        id: &InventoryId,
        quantity: i32,
        apply: impl FnOnce(&mut InventoryItem) -> bool,
    ) -> Result<(), DomainError> {
        let mut rows = self.rows.write().unwrap();
        let row = rows
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Inventory item {}", id)))?;
        if apply(row) {
            row.updated_at = Utc::now();
            Ok(())
        } else {
            Err(DomainError::Conflict(format!(
                "Stock movement of {} rejected",
                quantity
            )))
        }
    }
}

#[async_trait]
impl InventoryRepository for InMemoryInventoryRepository {
    async fn find_by_id(&self, id: &InventoryId) -> Result<Option<InventoryItem>, DomainError> {
        Ok(self.rows.read().unwrap().get(id).cloned())
    }

    async fn list(&self, filter: &InventoryFilter) -> Result<Vec<InventoryItem>, DomainError> {
        let rows = self.rows.read().unwrap();
        let mut result: Vec<InventoryItem> = rows
            .values()
            .filter(|r| filter.warehouse_id.map_or(true, |w| r.warehouse_id == w))
            .filter(|r| {
                filter
                    .counterparty_id
                    .map_or(true, |c| r.counterparty_id == Some(c))
            })
            .filter(|r| {
                filter.search.as_deref().map_or(true, |s| {
                    contains_ci(&r.product_name, s)
                        || r.sku.as_deref().is_some_and(|sku| contains_ci(sku, s))
                })
            })
            .filter(|r| !filter.only_available || r.available_quantity > 0)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.product_name.cmp(&b.product_name));
        Ok(page(result, filter.limit, filter.offset))
    }

    async fn create(&self, item: &NewInventoryItem) -> Result<InventoryItem, DomainError> {
        let row = InventoryItem {
            id: InventoryId::new(),
            warehouse_id: item.warehouse_id,
            counterparty_id: item.counterparty_id,
            product_name: item.product_name.clone(),
            sku: item.sku.clone(),
            description: item.description.clone(),
            unit: item.unit.clone(),
            quantity: item.quantity,
            available_quantity: item.available_quantity,
            weight: item.weight,
            volume: item.volume,
            arrived_at: item.arrived_at,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.rows.write().unwrap().insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, item: &InventoryItem) -> Result<InventoryItem, DomainError> {
        let mut rows = self.rows.write().unwrap();
        if !rows.contains_key(&item.id) {
            return Err(DomainError::NotFound(format!("Inventory item {}", item.id)));
        }
        let stored = &rows[&item.id];
        let mut updated = item.clone();
        // Stock counts only move through the movement methods
        updated.quantity = stored.quantity;
        updated.available_quantity = stored.available_quantity;
        updated.updated_at = Utc::now();
        rows.insert(item.id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: &InventoryId) -> Result<(), DomainError> {
        self.rows
            .write()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::NotFound(format!("Inventory item {}", id)))
    }

    async fn count_by_warehouse(&self, warehouse_id: &WarehouseId) -> Result<u64, DomainError> {
        let rows = self.rows.read().unwrap();
        Ok(rows
            .values()
            .filter(|r| r.warehouse_id == *warehouse_id)
            .count() as u64)
    }

    async fn list_low_stock(&self, threshold: i32) -> Result<Vec<InventoryItem>, DomainError> {
        let rows = self.rows.read().unwrap();
        let mut result: Vec<InventoryItem> = rows
            .values()
            .filter(|r| r.available_quantity <= threshold)
            .cloned()
            .collect();
        result.sort_by_key(|r| r.available_quantity);
        Ok(result)
    }

    async fn adjust_stock(&self, id: &InventoryId, delta: i32) -> Result<(), DomainError> {
        if delta == 0 {
            return Err(DomainError::Validation(
                "Adjustment cannot be zero".to_string(),
            ));
        }
        self.movement(id, delta, |row| {
            let (Some(quantity), Some(available)) = (
                row.quantity.checked_add(delta),
                row.available_quantity.checked_add(delta),
            ) else {
                return false;
            };
            if available < 0 {
                return false;
            }
            row.quantity = quantity;
            row.available_quantity = available;
            true
        })
    }

    async fn reserve(&self, id: &InventoryId, quantity: i32) -> Result<(), DomainError> {
        require_positive(quantity)?;
        self.movement(id, quantity, |row| {
            if row.available_quantity < quantity {
                return false;
            }
            row.available_quantity -= quantity;
            true
        })
    }

    async fn release(&self, id: &InventoryId, quantity: i32) -> Result<(), DomainError> {
        require_positive(quantity)?;
        self.movement(id, quantity, |row| {
            if row.available_quantity + quantity > row.quantity {
                return false;
            }
            row.available_quantity += quantity;
            true
        })
    }

    async fn consume(&self, id: &InventoryId, quantity: i32) -> Result<(), DomainError> {
        require_positive(quantity)?;
        self.movement(id, quantity, |row| {
            if row.reserved_quantity() < quantity {
                return false;
            }
            row.quantity -= quantity;
            true
        })
    }
}

// ============================================================================
// In-Memory Warehouse Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryWarehouseRepository {
    warehouses: Arc<RwLock<HashMap<WarehouseId, Warehouse>>>,
}

impl InMemoryWarehouseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_warehouse(self, warehouse: Warehouse) -> Self {
        self.warehouses
            .write()
            .unwrap()
            .insert(warehouse.id, warehouse);
        self
    }
}

#[async_trait]
impl WarehouseRepository for InMemoryWarehouseRepository {
    async fn find_by_id(&self, id: &WarehouseId) -> Result<Option<Warehouse>, DomainError> {
        Ok(self.warehouses.read().unwrap().get(id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Warehouse>, DomainError> {
        let warehouses = self.warehouses.read().unwrap();
        Ok(warehouses.values().find(|w| w.name == name).cloned())
    }

    async fn list(&self, active_only: bool) -> Result<Vec<Warehouse>, DomainError> {
        let warehouses = self.warehouses.read().unwrap();
        let mut result: Vec<Warehouse> = warehouses
            .values()
            .filter(|w| !active_only || w.is_active)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn create(&self, warehouse: &NewWarehouse) -> Result<Warehouse, DomainError> {
        let created = Warehouse {
            id: WarehouseId::new(),
            name: warehouse.name.clone(),
            address: warehouse.address.clone(),
            city: warehouse.city.clone(),
            country: warehouse.country.clone(),
            phone: warehouse.phone.clone(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.warehouses
            .write()
            .unwrap()
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, warehouse: &Warehouse) -> Result<Warehouse, DomainError> {
        let mut warehouses = self.warehouses.write().unwrap();
        if !warehouses.contains_key(&warehouse.id) {
            return Err(DomainError::NotFound(format!("Warehouse {}", warehouse.id)));
        }
        warehouses.insert(warehouse.id, warehouse.clone());
        Ok(warehouse.clone())
    }

    async fn delete(&self, id: &WarehouseId) -> Result<(), DomainError> {
        self.warehouses
            .write()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::NotFound(format!("Warehouse {}", id)))
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.warehouses.read().unwrap().len() as u64)
    }
}

// ============================================================================
// In-Memory Counterparty Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryCounterpartyRepository {
    counterparties: Arc<RwLock<HashMap<CounterpartyId, Counterparty>>>,
}

impl InMemoryCounterpartyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_counterparty(self, counterparty: Counterparty) -> Self {
        self.counterparties
            .write()
            .unwrap()
            .insert(counterparty.id, counterparty);
        self
    }
}

#[async_trait]
impl CounterpartyRepository for InMemoryCounterpartyRepository {
    async fn find_by_id(&self, id: &CounterpartyId) -> Result<Option<Counterparty>, DomainError> {
        Ok(self.counterparties.read().unwrap().get(id).cloned())
    }

    async fn list(&self, filter: &CounterpartyFilter) -> Result<Vec<Counterparty>, DomainError> {
        use crate::domain::entities::CounterpartyKind;

        let counterparties = self.counterparties.read().unwrap();
        let mut result: Vec<Counterparty> = counterparties
            .values()
            .filter(|c| {
                filter
                    .kind
                    .map_or(true, |k| c.kind == k || c.kind == CounterpartyKind::Both)
            })
            .filter(|c| {
                filter
                    .search
                    .as_deref()
                    .map_or(true, |s| contains_ci(&c.name, s))
            })
            .cloned()
            .collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(page(result, filter.limit, filter.offset))
    }

    async fn create(&self, counterparty: &NewCounterparty) -> Result<Counterparty, DomainError> {
        let created = Counterparty {
            id: CounterpartyId::new(),
            name: counterparty.name.clone(),
            kind: counterparty.kind,
            contact_person: counterparty.contact_person.clone(),
            phone: counterparty.phone.clone(),
            email: counterparty.email.clone(),
            address: counterparty.address.clone(),
            tax_id: counterparty.tax_id.clone(),
            notes: counterparty.notes.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.counterparties
            .write()
            .unwrap()
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, counterparty: &Counterparty) -> Result<Counterparty, DomainError> {
        let mut counterparties = self.counterparties.write().unwrap();
        if !counterparties.contains_key(&counterparty.id) {
            return Err(DomainError::NotFound(format!(
                "Counterparty {}",
                counterparty.id
            )));
        }
        counterparties.insert(counterparty.id, counterparty.clone());
        Ok(counterparty.clone())
    }

    async fn delete(&self, id: &CounterpartyId) -> Result<(), DomainError> {
        self.counterparties
            .write()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::NotFound(format!("Counterparty {}", id)))
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.counterparties.read().unwrap().len() as u64)
    }
}

// ============================================================================
// In-Memory Admin User Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryAdminUserRepository {
    users: Arc<RwLock<HashMap<AdminUserId, AdminUser>>>,
}

impl InMemoryAdminUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user: AdminUser) -> Self {
        self.users.write().unwrap().insert(user.id, user);
        self
    }

    pub fn get(&self, id: &AdminUserId) -> Option<AdminUser> {
        self.users.read().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl AdminUserRepository for InMemoryAdminUserRepository {
    async fn find_by_id(&self, id: &AdminUserId) -> Result<Option<AdminUser>, DomainError> {
        Ok(self.users.read().unwrap().get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>, DomainError> {
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_api_key_hash(&self, hash: &str) -> Result<Option<AdminUser>, DomainError> {
        let users = self.users.read().unwrap();
        Ok(users
            .values()
            .find(|u| u.is_active && u.api_key_hash.as_deref() == Some(hash))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<AdminUser>, DomainError> {
        let users = self.users.read().unwrap();
        let mut result: Vec<AdminUser> = users.values().cloned().collect();
        result.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(result)
    }

    async fn create(&self, user: &NewAdminUser) -> Result<AdminUser, DomainError> {
        let mut users = self.users.write().unwrap();
        if users.values().any(|u| u.username == user.username) {
            return Err(DomainError::AlreadyExists(format!(
                "User '{}'",
                user.username
            )));
        }
        let created = AdminUser {
            id: AdminUserId::new(),
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            api_key_hash: None,
            role: user.role,
            is_active: true,
            created_at: Utc::now(),
            last_login_at: None,
        };
        users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn record_login(
        &self,
        id: &AdminUserId,
        api_key_hash: &str,
    ) -> Result<(), DomainError> {
        let mut users = self.users.write().unwrap();
        let user = users
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("User {}", id)))?;
        user.api_key_hash = Some(api_key_hash.to_string());
        user.last_login_at = Some(Utc::now());
        Ok(())
    }

    async fn update_password(
        &self,
        id: &AdminUserId,
        password_hash: &str,
    ) -> Result<(), DomainError> {
        let mut users = self.users.write().unwrap();
        let user = users
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("User {}", id)))?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn set_active(&self, id: &AdminUserId, active: bool) -> Result<(), DomainError> {
        let mut users = self.users.write().unwrap();
        let user = users
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("User {}", id)))?;
        user.is_active = active;
        if !active {
            user.api_key_hash = None;
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.users.read().unwrap().len() as u64)
    }
}

// ============================================================================
// In-Memory Change History Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryChangeHistoryRepository {
    entries: Arc<RwLock<Vec<ChangeHistory>>>,
}

impl InMemoryChangeHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded entry, oldest first
    pub fn entries(&self) -> Vec<ChangeHistory> {
        self.entries.read().unwrap().clone()
    }

    /// Entries recorded for one entity, oldest first
    pub fn entries_for(&self, entity_id: Uuid) -> Vec<ChangeHistory> {
        self.entries
            .read()
            .unwrap()
            .iter()
            .filter(|e| e.entity_id == entity_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ChangeHistoryRepository for InMemoryChangeHistoryRepository {
    async fn record(&self, entries: &[NewChangeHistory]) -> Result<(), DomainError> {
        let mut stored = self.entries.write().unwrap();
        for entry in entries {
            stored.push(ChangeHistory {
                id: ChangeHistoryId::new(),
                entity_type: entry.entity_type,
                entity_id: entry.entity_id,
                action: entry.action,
                field: entry.field.clone(),
                old_value: entry.old_value.clone(),
                new_value: entry.new_value.clone(),
                changed_by: entry.changed_by,
                changed_at: Utc::now(),
            });
        }
        Ok(())
    }

    async fn list_by_entity(
        &self,
        entity_type: EntityType,
        entity_id: &Uuid,
    ) -> Result<Vec<ChangeHistory>, DomainError> {
        let entries = self.entries.read().unwrap();
        Ok(entries
            .iter()
            .rev()
            .filter(|e| e.entity_type == entity_type && e.entity_id == *entity_id)
            .cloned()
            .collect())
    }

    async fn list_recent(
        &self,
        entity_type: Option<EntityType>,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<ChangeHistory>, DomainError> {
        let entries = self.entries.read().unwrap();
        let result: Vec<ChangeHistory> = entries
            .iter()
            .rev()
            .filter(|e| entity_type.map_or(true, |t| e.entity_type == t))
            .cloned()
            .collect();
        Ok(page(result, limit, offset))
    }
}

// ============================================================================
// In-Memory Tracking Repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryTrackingRepository {
    codes: Arc<RwLock<HashMap<TrackingId, CustomerTracking>>>,
}

impl InMemoryTrackingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tracking(self, tracking: CustomerTracking) -> Self {
        self.codes.write().unwrap().insert(tracking.id, tracking);
        self
    }

    pub fn len(&self) -> usize {
        self.codes.read().unwrap().len()
    }
}

#[async_trait]
impl TrackingRepository for InMemoryTrackingRepository {
    async fn find_by_id(&self, id: &TrackingId) -> Result<Option<CustomerTracking>, DomainError> {
        Ok(self.codes.read().unwrap().get(id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<CustomerTracking>, DomainError> {
        let codes = self.codes.read().unwrap();
        Ok(codes.values().find(|t| t.tracking_code == code).cloned())
    }

    async fn find_by_order(
        &self,
        order_id: &OrderId,
    ) -> Result<Vec<CustomerTracking>, DomainError> {
        let codes = self.codes.read().unwrap();
        let mut result: Vec<CustomerTracking> = codes
            .values()
            .filter(|t| t.order_id == *order_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn create(
        &self,
        code: &str,
        order_id: &OrderId,
    ) -> Result<CustomerTracking, DomainError> {
        let mut codes = self.codes.write().unwrap();
        if codes.values().any(|t| t.tracking_code == code) {
            return Err(DomainError::AlreadyExists(format!("Tracking code {}", code)));
        }
        let tracking = CustomerTracking {
            id: TrackingId::new(),
            tracking_code: code.to_string(),
            order_id: *order_id,
            is_active: true,
            created_at: Utc::now(),
        };
        codes.insert(tracking.id, tracking.clone());
        Ok(tracking)
    }

    async fn deactivate(&self, id: &TrackingId) -> Result<(), DomainError> {
        let mut codes = self.codes.write().unwrap();
        let tracking = codes
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Tracking code {}", id)))?;
        tracking.is_active = false;
        Ok(())
    }

    async fn delete_by_order(&self, order_id: &OrderId) -> Result<(), DomainError> {
        self.codes
            .write()
            .unwrap()
            .retain(|_, t| t.order_id != *order_id);
        Ok(())
    }
}
