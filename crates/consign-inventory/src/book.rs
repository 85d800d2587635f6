//! # Inventory Book
//!
//! Five independent append-only collections. Each record's id is its
//! position in its collection, starting at 0. Records are updated in place
//! and never removed.

use consign_core::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::InventoryError;
use crate::record::{Customer, Delivery, Item, Order, Supplier, PENDING};

/// An append-only list addressed by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Collection<T> {
    #[serde(skip)]
    name: &'static str,
    records: Vec<T>,
}

impl<T> Collection<T> {
    fn named(name: &'static str) -> Self {
        Self {
            name,
            records: Vec::new(),
        }
    }

    fn push(&mut self, record: T) -> u64 {
        self.records.push(record);
        let id = (self.records.len() - 1) as u64;
        tracing::debug!(collection = self.name, id, "inventory record added");
        id
    }

    pub fn get(&self, id: u64) -> Result<&T, InventoryError> {
        usize::try_from(id)
            .ok()
            .and_then(|i| self.records.get(i))
            .ok_or(InventoryError::NotFound {
                collection: self.name,
                id,
            })
    }

    fn get_mut(&mut self, id: u64) -> Result<&mut T, InventoryError> {
        let name = self.name;
        usize::try_from(id)
            .ok()
            .and_then(|i| self.records.get_mut(i))
            .ok_or(InventoryError::NotFound {
                collection: name,
                id,
            })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.records.iter()
    }
}

/// Items, orders, deliveries, customers, and suppliers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BookSnapshot")]
pub struct InventoryBook {
    items: Collection<Item>,
    orders: Collection<Order>,
    deliveries: Collection<Delivery>,
    customers: Collection<Customer>,
    suppliers: Collection<Supplier>,
}

#[derive(Deserialize)]
struct BookSnapshot {
    #[serde(default)]
    items: Vec<Item>,
    #[serde(default)]
    orders: Vec<Order>,
    #[serde(default)]
    deliveries: Vec<Delivery>,
    #[serde(default)]
    customers: Vec<Customer>,
    #[serde(default)]
    suppliers: Vec<Supplier>,
}

impl From<BookSnapshot> for InventoryBook {
    fn from(raw: BookSnapshot) -> Self {
        let mut book = Self::new();
        book.items.records = raw.items;
        book.orders.records = raw.orders;
        book.deliveries.records = raw.deliveries;
        book.customers.records = raw.customers;
        book.suppliers.records = raw.suppliers;
        book
    }
}

impl Default for InventoryBook {
    fn default() -> Self {
        Self::new()
    }
}

impl InventoryBook {
    pub fn new() -> Self {
        Self {
            items: Collection::named("item"),
            orders: Collection::named("order"),
            deliveries: Collection::named("delivery"),
            customers: Collection::named("customer"),
            suppliers: Collection::named("supplier"),
        }
    }

    // ── Items ───────────────────────────────────────────────────────

    pub fn add_item(
        &mut self,
        name: impl Into<String>,
        quantity: u64,
        location: impl Into<String>,
        arrival_date: Timestamp,
    ) -> u64 {
        self.items.push(Item {
            name: name.into(),
            quantity,
            location: location.into(),
            arrival_date,
            departure_date: None,
        })
    }

    /// Record a stock movement out of the item's current location.
    pub fn update_item(
        &mut self,
        id: u64,
        quantity: u64,
        location: impl Into<String>,
        departure_date: Timestamp,
    ) -> Result<(), InventoryError> {
        let item = self.items.get_mut(id)?;
        item.quantity = quantity;
        item.location = location.into();
        item.departure_date = Some(departure_date);
        Ok(())
    }

    pub fn item(&self, id: u64) -> Result<&Item, InventoryError> {
        self.items.get(id)
    }

    pub fn items(&self) -> &Collection<Item> {
        &self.items
    }

    // ── Orders ──────────────────────────────────────────────────────

    pub fn add_order(&mut self, product: impl Into<String>, quantity: u64, price: u64) -> u64 {
        self.orders.push(Order {
            product: product.into(),
            quantity,
            price,
            status: PENDING.to_string(),
        })
    }

    pub fn update_order_status(
        &mut self,
        id: u64,
        status: impl Into<String>,
    ) -> Result<(), InventoryError> {
        self.orders.get_mut(id)?.status = status.into();
        Ok(())
    }

    pub fn order(&self, id: u64) -> Result<&Order, InventoryError> {
        self.orders.get(id)
    }

    pub fn orders(&self) -> &Collection<Order> {
        &self.orders
    }

    // ── Deliveries ──────────────────────────────────────────────────

    pub fn add_delivery(
        &mut self,
        product: impl Into<String>,
        quantity: u64,
        from: impl Into<String>,
        to: impl Into<String>,
        delivery_date: Timestamp,
    ) -> u64 {
        self.deliveries.push(Delivery {
            product: product.into(),
            quantity,
            from: from.into(),
            to: to.into(),
            delivery_date,
            status: PENDING.to_string(),
        })
    }

    pub fn update_delivery_status(
        &mut self,
        id: u64,
        status: impl Into<String>,
    ) -> Result<(), InventoryError> {
        self.deliveries.get_mut(id)?.status = status.into();
        Ok(())
    }

    pub fn delivery(&self, id: u64) -> Result<&Delivery, InventoryError> {
        self.deliveries.get(id)
    }

    pub fn deliveries(&self) -> &Collection<Delivery> {
        &self.deliveries
    }

    // ── Customers and suppliers ─────────────────────────────────────

    /// Returns the customer's position in the book, not `customer_id`.
    pub fn add_customer(
        &mut self,
        customer_id: u64,
        name: impl Into<String>,
        location: impl Into<String>,
        email: impl Into<String>,
    ) -> u64 {
        self.customers.push(Customer {
            customer_id,
            name: name.into(),
            location: location.into(),
            email: email.into(),
        })
    }

    pub fn customer(&self, index: u64) -> Result<&Customer, InventoryError> {
        self.customers.get(index)
    }

    pub fn customers(&self) -> &Collection<Customer> {
        &self.customers
    }

    /// Returns the supplier's position in the book, not `supplier_id`.
    pub fn add_supplier(
        &mut self,
        supplier_id: u64,
        name: impl Into<String>,
        location: impl Into<String>,
        email: impl Into<String>,
    ) -> u64 {
        self.suppliers.push(Supplier {
            supplier_id,
            name: name.into(),
            location: location.into(),
            email: email.into(),
        })
    }

    pub fn supplier(&self, index: u64) -> Result<&Supplier, InventoryError> {
        self.suppliers.get(index)
    }

    pub fn suppliers(&self) -> &Collection<Supplier> {
        &self.suppliers
    }
}
