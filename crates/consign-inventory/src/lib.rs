//! # consign-inventory: Inventory Records
//!
//! Keyed-list record keeping that sits beside the shipment ledger: stock
//! items, orders, deliveries, customers, and suppliers. Callers add a
//! record, get back its position as an id, and later read or update it by
//! that id. There is no authorization layer and no state machine; status
//! fields are free text.
//!
//! The shipment ledger neither calls into this crate nor is called by it.

pub mod book;
pub mod error;
pub mod record;

pub use book::{Collection, InventoryBook};
pub use error::InventoryError;
pub use record::{Customer, Delivery, Item, Order, Supplier};
