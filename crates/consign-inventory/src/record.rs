//! Record types held by the [`InventoryBook`](crate::InventoryBook).

use consign_core::Timestamp;
use serde::{Deserialize, Serialize};

/// Status given to every new order and delivery.
pub const PENDING: &str = "Pending";

/// A stock line at a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub quantity: u64,
    pub location: String,
    pub arrival_date: Timestamp,
    /// Set by the first update.
    #[serde(default)]
    pub departure_date: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub product: String,
    pub quantity: u64,
    /// Total price in the smallest currency unit.
    pub price: u64,
    pub status: String,
}

/// A goods movement between two locations. Unrelated to ledger shipments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub product: String,
    pub quantity: u64,
    pub from: String,
    pub to: String,
    pub delivery_date: Timestamp,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: u64,
    pub name: String,
    pub location: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub supplier_id: u64,
    pub name: String,
    pub location: String,
    pub email: String,
}
