//! # Inventory Subcommand
//!
//! Add, update, and read inventory records. No caller is required; the
//! inventory book has no authorization layer.

use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};

use consign_core::Timestamp;

use crate::state;

/// Arguments for the `consign inventory` subcommand.
#[derive(Args, Debug)]
pub struct InventoryArgs {
    #[command(subcommand)]
    pub command: InventoryCommand,
}

/// Inventory subcommands.
#[derive(Subcommand, Debug)]
pub enum InventoryCommand {
    /// Add a stock item.
    AddItem {
        #[arg(long)]
        name: String,
        #[arg(long)]
        quantity: u64,
        #[arg(long)]
        location: String,
        /// Unix seconds or an RFC 3339 UTC timestamp.
        #[arg(long, value_parser = parse_date)]
        arrival: Timestamp,
    },

    /// Move a stock item: new quantity, location, and departure date.
    UpdateItem {
        #[arg(long)]
        id: u64,
        #[arg(long)]
        quantity: u64,
        #[arg(long)]
        location: String,
        #[arg(long, value_parser = parse_date)]
        departure: Timestamp,
    },

    /// Show a stock item.
    Item {
        #[arg(long)]
        id: u64,
    },

    /// Add an order with status "Pending".
    AddOrder {
        #[arg(long)]
        product: String,
        #[arg(long)]
        quantity: u64,
        #[arg(long)]
        price: u64,
    },

    /// Set an order's status.
    UpdateOrder {
        #[arg(long)]
        id: u64,
        #[arg(long)]
        status: String,
    },

    /// Show an order.
    Order {
        #[arg(long)]
        id: u64,
    },

    /// Add a delivery with status "Pending".
    AddDelivery {
        #[arg(long)]
        product: String,
        #[arg(long)]
        quantity: u64,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long, value_parser = parse_date)]
        date: Timestamp,
    },

    /// Set a delivery's status.
    UpdateDelivery {
        #[arg(long)]
        id: u64,
        #[arg(long)]
        status: String,
    },

    /// Show a delivery.
    Delivery {
        #[arg(long)]
        id: u64,
    },

    /// Add a customer.
    AddCustomer {
        #[arg(long)]
        customer_id: u64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        email: String,
    },

    /// Show a customer by position.
    Customer {
        #[arg(long)]
        index: u64,
    },

    /// Add a supplier.
    AddSupplier {
        #[arg(long)]
        supplier_id: u64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        email: String,
    },

    /// Show a supplier by position.
    Supplier {
        #[arg(long)]
        index: u64,
    },
}

/// Parse a date given as Unix seconds or RFC 3339.
pub fn parse_date(s: &str) -> Result<Timestamp, String> {
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        let secs: i64 = s.parse().map_err(|e| format!("{e}"))?;
        return Timestamp::from_epoch_secs(secs).map_err(|e| e.to_string());
    }
    Timestamp::parse_lenient(s).map_err(|e| e.to_string())
}

/// Execute the inventory subcommand.
pub fn run_inventory(args: &InventoryArgs, state_dir: &Path) -> Result<u8> {
    match &args.command {
        InventoryCommand::AddItem {
            name,
            quantity,
            location,
            arrival,
        } => {
            let id = state::update(state_dir, |s| {
                Ok(s.inventory
                    .add_item(name.as_str(), *quantity, location.as_str(), *arrival))
            })?;
            println!("OK: added item {id}");
        }
        InventoryCommand::UpdateItem {
            id,
            quantity,
            location,
            departure,
        } => {
            state::update(state_dir, |s| {
                Ok(s.inventory
                    .update_item(*id, *quantity, location.as_str(), *departure)?)
            })?;
            println!("OK: updated item {id}");
        }
        InventoryCommand::Item { id } => {
            let snapshot = state::load(state_dir)?;
            print_json(snapshot.inventory.item(*id)?)?;
        }

        InventoryCommand::AddOrder {
            product,
            quantity,
            price,
        } => {
            let id = state::update(state_dir, |s| {
                Ok(s.inventory.add_order(product.as_str(), *quantity, *price))
            })?;
            println!("OK: added order {id}");
        }
        InventoryCommand::UpdateOrder { id, status } => {
            state::update(state_dir, |s| {
                Ok(s.inventory.update_order_status(*id, status.as_str())?)
            })?;
            println!("OK: order {id} is {status}");
        }
        InventoryCommand::Order { id } => {
            let snapshot = state::load(state_dir)?;
            print_json(snapshot.inventory.order(*id)?)?;
        }

        InventoryCommand::AddDelivery {
            product,
            quantity,
            from,
            to,
            date,
        } => {
            let id = state::update(state_dir, |s| {
                Ok(s.inventory.add_delivery(
                    product.as_str(),
                    *quantity,
                    from.as_str(),
                    to.as_str(),
                    *date,
                ))
            })?;
            println!("OK: added delivery {id}");
        }
        InventoryCommand::UpdateDelivery { id, status } => {
            state::update(state_dir, |s| {
                Ok(s.inventory.update_delivery_status(*id, status.as_str())?)
            })?;
            println!("OK: delivery {id} is {status}");
        }
        InventoryCommand::Delivery { id } => {
            let snapshot = state::load(state_dir)?;
            print_json(snapshot.inventory.delivery(*id)?)?;
        }

        InventoryCommand::AddCustomer {
            customer_id,
            name,
            location,
            email,
        } => {
            let index = state::update(state_dir, |s| {
                Ok(s.inventory.add_customer(
                    *customer_id,
                    name.as_str(),
                    location.as_str(),
                    email.as_str(),
                ))
            })?;
            println!("OK: added customer at index {index}");
        }
        InventoryCommand::Customer { index } => {
            let snapshot = state::load(state_dir)?;
            print_json(snapshot.inventory.customer(*index)?)?;
        }

        InventoryCommand::AddSupplier {
            supplier_id,
            name,
            location,
            email,
        } => {
            let index = state::update(state_dir, |s| {
                Ok(s.inventory.add_supplier(
                    *supplier_id,
                    name.as_str(),
                    location.as_str(),
                    email.as_str(),
                ))
            })?;
            println!("OK: added supplier at index {index}");
        }
        InventoryCommand::Supplier { index } => {
            let snapshot = state::load(state_dir)?;
            print_json(snapshot.inventory.supplier(*index)?)?;
        }
    }
    Ok(0)
}

fn print_json<T: serde::Serialize>(record: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::{run_init, InitArgs};
    use consign_core::Principal;

    fn setup(dir: &Path) {
        run_init(
            &InitArgs {
                config: None,
                owner: Some(Principal::new("owner").unwrap()),
                moderators: vec![],
                force: false,
            },
            dir,
        )
        .unwrap();
    }

    fn run(dir: &Path, command: InventoryCommand) -> Result<u8> {
        run_inventory(&InventoryArgs { command }, dir)
    }

    #[test]
    fn parse_date_accepts_epoch_and_rfc3339() {
        assert_eq!(
            parse_date("1620876729").unwrap().to_iso8601(),
            "2021-05-13T03:32:09Z"
        );
        assert_eq!(
            parse_date("2021-05-13T03:32:09Z").unwrap(),
            parse_date("1620876729").unwrap()
        );
        assert!(parse_date("yesterday").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn add_and_update_item() {
        let dir = tempfile::tempdir().unwrap();
        setup(dir.path());
        run(
            dir.path(),
            InventoryCommand::AddItem {
                name: "Test Item".into(),
                quantity: 100,
                location: "Location 1".into(),
                arrival: parse_date("1620876729").unwrap(),
            },
        )
        .unwrap();
        run(
            dir.path(),
            InventoryCommand::UpdateItem {
                id: 0,
                quantity: 50,
                location: "Location 2".into(),
                departure: parse_date("1620919761").unwrap(),
            },
        )
        .unwrap();
        let snapshot = state::load(dir.path()).unwrap();
        let item = snapshot.inventory.item(0).unwrap();
        assert_eq!(item.quantity, 50);
        assert_eq!(item.location, "Location 2");
    }

    #[test]
    fn order_status_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        setup(dir.path());
        run(
            dir.path(),
            InventoryCommand::AddOrder {
                product: "Test Product".into(),
                quantity: 10,
                price: 1000,
            },
        )
        .unwrap();
        run(
            dir.path(),
            InventoryCommand::UpdateOrder {
                id: 0,
                status: "Completed".into(),
            },
        )
        .unwrap();
        let snapshot = state::load(dir.path()).unwrap();
        assert_eq!(snapshot.inventory.order(0).unwrap().status, "Completed");
        assert_eq!(run(dir.path(), InventoryCommand::Order { id: 0 }).unwrap(), 0);
    }

    #[test]
    fn unknown_record_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        setup(dir.path());
        let err = run(
            dir.path(),
            InventoryCommand::UpdateDelivery {
                id: 2,
                status: "Lost".into(),
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("delivery #2 not found"));
        assert!(run(dir.path(), InventoryCommand::Supplier { index: 0 }).is_err());
    }
}
