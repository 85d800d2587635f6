//! # Shipment Subcommand
//!
//! Drives shipments through their lifecycle and reads them back.
//!
//! - `create`: register a shipment (creators only).
//! - `start`: dispatch it (sender only).
//! - `transact`: take ownership and record its condition (transactors only).
//! - `update-temperature`: correct the temperature (current owner only).
//! - `deliver`: close it out (recipient only).
//! - `cancel`: withdraw it before dispatch (sender only).
//! - `status`, `list`, `events`: read-only views.

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use consign_core::{Principal, ShipmentId};
use consign_ledger::{ConditionReport, Shipment};

use crate::state;

/// Arguments for the `consign shipment` subcommand.
#[derive(Args, Debug)]
pub struct ShipmentArgs {
    #[command(subcommand)]
    pub command: ShipmentCommand,
}

/// Shipment subcommands.
#[derive(Subcommand, Debug)]
pub enum ShipmentCommand {
    /// Register a new shipment in CREATED state.
    Create {
        #[arg(long = "as", value_name = "CALLER")]
        caller: Principal,
        #[arg(long)]
        recipient: Principal,
        /// Temperature reading, kept verbatim.
        #[arg(long)]
        temperature: String,
    },

    /// Dispatch a shipment (CREATED → IN_TRANSIT).
    Start {
        #[arg(long = "as", value_name = "CALLER")]
        caller: Principal,
        #[arg(long)]
        id: ShipmentId,
    },

    /// Take ownership of a CREATED shipment and record its condition.
    Transact {
        #[arg(long = "as", value_name = "CALLER")]
        caller: Principal,
        #[arg(long)]
        id: ShipmentId,
        #[arg(long)]
        condition_code: u32,
        #[arg(long, default_value = "")]
        comments: String,
    },

    /// Correct the temperature of a CREATED shipment.
    UpdateTemperature {
        #[arg(long = "as", value_name = "CALLER")]
        caller: Principal,
        #[arg(long)]
        id: ShipmentId,
        #[arg(long)]
        temperature: String,
    },

    /// Mark an in-transit shipment delivered (IN_TRANSIT → DELIVERED).
    Deliver {
        #[arg(long = "as", value_name = "CALLER")]
        caller: Principal,
        #[arg(long)]
        id: ShipmentId,
        /// Condition on arrival. Omit to keep the last reported condition.
        #[arg(long)]
        condition_code: Option<u32>,
        #[arg(long, requires = "condition_code")]
        comments: Option<String>,
    },

    /// Withdraw a shipment before dispatch (CREATED → CANCELLED).
    Cancel {
        #[arg(long = "as", value_name = "CALLER")]
        caller: Principal,
        #[arg(long)]
        id: ShipmentId,
    },

    /// Show one shipment and its transition history.
    Status {
        #[arg(long)]
        id: ShipmentId,
    },

    /// List shipments, optionally only those involving one principal.
    List {
        #[arg(long)]
        principal: Option<Principal>,
    },

    /// Print the notification log as JSON lines.
    Events {
        /// First sequence number to print.
        #[arg(long, default_value_t = 0)]
        since: u64,
    },
}

/// Execute the shipment subcommand.
pub fn run_shipment(args: &ShipmentArgs, state_dir: &Path) -> Result<u8> {
    match &args.command {
        ShipmentCommand::Create {
            caller,
            recipient,
            temperature,
        } => {
            let id = state::update(state_dir, |s| {
                s.store
                    .create_shipment(caller, recipient.clone(), temperature.as_str())
                    .context("create failed")
            })?;
            println!("OK: created shipment {id} in CREATED state");
        }

        ShipmentCommand::Start { caller, id } => {
            state::update(state_dir, |s| {
                s.store.start_shipment(caller, *id).context("start failed")
            })?;
            println!("OK: shipment {id} is IN_TRANSIT");
        }

        ShipmentCommand::Transact {
            caller,
            id,
            condition_code,
            comments,
        } => {
            state::update(state_dir, |s| {
                s.store
                    .transact_shipment(caller, *id, *condition_code, comments.as_str())
                    .context("transact failed")
            })?;
            println!("OK: shipment {id} now held by {caller}");
        }

        ShipmentCommand::UpdateTemperature {
            caller,
            id,
            temperature,
        } => {
            state::update(state_dir, |s| {
                s.store
                    .update_shipment_temperature(caller, *id, temperature.as_str())
                    .context("update-temperature failed")
            })?;
            println!("OK: shipment {id} temperature set to {temperature}");
        }

        ShipmentCommand::Deliver {
            caller,
            id,
            condition_code,
            comments,
        } => {
            let report = condition_code
                .map(|code| ConditionReport::new(code, comments.clone().unwrap_or_default()));
            state::update(state_dir, |s| {
                s.store
                    .deliver_shipment(caller, *id, report)
                    .context("deliver failed")
            })?;
            println!("OK: shipment {id} is DELIVERED");
        }

        ShipmentCommand::Cancel { caller, id } => {
            state::update(state_dir, |s| {
                s.store.cancel_shipment(caller, *id).context("cancel failed")
            })?;
            println!("OK: shipment {id} is CANCELLED");
        }

        ShipmentCommand::Status { id } => {
            let snapshot = state::load(state_dir)?;
            let shipment = snapshot.store.get_shipment(*id)?;
            print_status(shipment);
        }

        ShipmentCommand::List { principal } => {
            let snapshot = state::load(state_dir)?;
            let ledger = snapshot.store.ledger();
            let shipments: Vec<&Shipment> = match principal {
                Some(p) => ledger.shipments_by_principal(p).collect(),
                None => ledger.shipments().iter().collect(),
            };
            if shipments.is_empty() {
                println!("No shipments found.");
            } else {
                println!("Shipments ({}):", shipments.len());
                for s in shipments {
                    println!(
                        "  {}: {} {} -> {} (held by {})",
                        s.id(),
                        s.state(),
                        s.sender(),
                        s.recipient(),
                        s.current_owner()
                    );
                }
            }
        }

        ShipmentCommand::Events { since } => {
            let snapshot = state::load(state_dir)?;
            for record in snapshot.store.ledger().events_since(*since) {
                println!("{}", serde_json::to_string(record)?);
            }
        }
    }
    Ok(0)
}

fn print_status(s: &Shipment) {
    println!("Shipment: {}", s.id());
    println!("  State: {}", s.state());
    println!("  Sender: {}", s.sender());
    println!("  Recipient: {}", s.recipient());
    println!("  Current owner: {}", s.current_owner());
    println!("  Temperature: {}", s.temperature());
    println!("  Condition: {} {:?}", s.condition_code(), s.comments());
    println!("  Created: {}", s.created_at());
    println!("  Transitions: {}", s.history().len());
    for (i, t) in s.history().iter().enumerate() {
        println!(
            "    [{i}] {} {} → {} by {} at {}",
            t.operation, t.from_state, t.to_state, t.actor, t.at
        );
    }
}
