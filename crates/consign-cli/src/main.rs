//! # consign CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use consign_cli::init::{run_init, InitArgs};
use consign_cli::inventory::{run_inventory, InventoryArgs};
use consign_cli::registry::{run_registry, RegistryArgs};
use consign_cli::shipment::{run_shipment, ShipmentArgs};
use consign_cli::{exit_code, DEFAULT_STATE_DIR};

/// Permissioned shipment ledger operator tool.
///
/// Keeps a consignment store (access registry, shipments, notification log)
/// and an inventory book in a local state directory.
#[derive(Parser, Debug)]
#[command(name = "consign", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// Directory holding the store snapshot.
    #[arg(long, global = true, default_value = DEFAULT_STATE_DIR)]
    state_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a fresh store from a registry configuration.
    Init(InitArgs),

    /// Administer moderators and the creator/transactor whitelists.
    Registry(RegistryArgs),

    /// Shipment lifecycle operations (create, start, transact, deliver, etc.).
    Shipment(ShipmentArgs),

    /// Inventory records: items, orders, deliveries, customers, suppliers.
    Inventory(InventoryArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    tracing::debug!(state_dir = %cli.state_dir.display(), "consign starting");

    let result = match &cli.command {
        Commands::Init(args) => run_init(args, &cli.state_dir),
        Commands::Registry(args) => run_registry(args, &cli.state_dir),
        Commands::Shipment(args) => run_shipment(args, &cli.state_dir),
        Commands::Inventory(args) => run_inventory(args, &cli.state_dir),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consign_cli::shipment::ShipmentCommand;

    #[test]
    fn cli_parse_init_with_flags() {
        let cli = Cli::try_parse_from([
            "consign",
            "init",
            "--owner",
            "0xf39f",
            "--moderator",
            "0x7099",
            "--moderator",
            "0x3c44",
        ])
        .unwrap();
        assert_eq!(cli.state_dir, PathBuf::from(".consign"));
        if let Commands::Init(args) = cli.command {
            assert_eq!(args.owner.unwrap().as_str(), "0xf39f");
            assert_eq!(args.moderators.len(), 2);
            assert!(args.config.is_none());
        } else {
            panic!("expected init");
        }
    }

    #[test]
    fn cli_parse_init_requires_owner_or_config() {
        assert!(Cli::try_parse_from(["consign", "init"]).is_err());
        assert!(Cli::try_parse_from([
            "consign", "init", "--config", "r.yaml", "--owner", "x"
        ])
        .is_err());
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "consign",
            "shipment",
            "list",
            "--state-dir",
            "/tmp/ledger",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.state_dir, PathBuf::from("/tmp/ledger"));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn cli_parse_shipment_transact() {
        let cli = Cli::try_parse_from([
            "consign",
            "shipment",
            "transact",
            "--as",
            "T",
            "--id",
            "0",
            "--condition-code",
            "1",
            "--comments",
            "Damaged package",
        ])
        .unwrap();
        match cli.command {
            Commands::Shipment(ShipmentArgs {
                command:
                    ShipmentCommand::Transact {
                        caller,
                        id,
                        condition_code,
                        comments,
                    },
            }) => {
                assert_eq!(caller.as_str(), "T");
                assert_eq!(id.value(), 0);
                assert_eq!(condition_code, 1);
                assert_eq!(comments, "Damaged package");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_parse_deliver_comments_need_condition_code() {
        assert!(Cli::try_parse_from([
            "consign", "shipment", "deliver", "--as", "B", "--id", "0", "--comments", "ok"
        ])
        .is_err());
        assert!(Cli::try_parse_from([
            "consign", "shipment", "deliver", "--as", "B", "--id", "0"
        ])
        .is_ok());
    }

    #[test]
    fn cli_rejects_empty_principal() {
        assert!(Cli::try_parse_from([
            "consign", "shipment", "start", "--as", "", "--id", "0"
        ])
        .is_err());
    }

    #[test]
    fn cli_parse_inventory_epoch_date() {
        let cli = Cli::try_parse_from([
            "consign",
            "inventory",
            "add-item",
            "--name",
            "Test Item",
            "--quantity",
            "100",
            "--location",
            "Location 1",
            "--arrival",
            "1620876729",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Inventory(_)));
    }

    #[test]
    fn cli_verify() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
