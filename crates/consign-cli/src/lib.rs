//! # consign-cli: Operator Tool for the Shipment Ledger
//!
//! Provides the `consign` command-line interface over a file-backed store.
//!
//! ## Subcommands
//!
//! - `consign init`: create a store from a registry config or flags.
//! - `consign registry`: moderator administration and membership queries.
//! - `consign shipment`: lifecycle operations and read views.
//! - `consign inventory`: inventory book records.
//!
//! ```bash
//! consign init --owner 0xf39f --moderator 0x7099
//! consign registry add-creators --as 0xf39f 0xaaaa
//! consign shipment create --as 0xaaaa --recipient 0xbbbb --temperature 10.5
//! consign shipment start --as 0xaaaa --id 0
//! ```
//!
//! ## Exit Codes
//!
//! A refused operation exits with a code naming its failure kind (see
//! [`exit_code`]); any other error exits with 1.

pub mod init;
pub mod inventory;
pub mod registry;
pub mod shipment;
pub mod state;

use consign_access::AccessError;
use consign_core::FailureKind;
use consign_inventory::InventoryError;
use consign_ledger::LedgerError;

/// Default state directory, relative to the working directory.
pub const DEFAULT_STATE_DIR: &str = ".consign";

/// Map a failed command onto a process exit code.
///
/// | Failure | Code |
/// |---|---|
/// | `PermissionDenied` | 2 |
/// | `Unauthorized` | 3 |
/// | `InvalidState` | 4 |
/// | `NotFound` | 5 |
/// | anything else | 1 |
pub fn exit_code(err: &anyhow::Error) -> u8 {
    let kind = err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<LedgerError>() {
            Some(e.kind())
        } else if let Some(e) = cause.downcast_ref::<AccessError>() {
            Some(e.kind())
        } else if cause.downcast_ref::<InventoryError>().is_some() {
            Some(FailureKind::NotFound)
        } else {
            None
        }
    });
    match kind {
        Some(FailureKind::PermissionDenied) => 2,
        Some(FailureKind::Unauthorized) => 3,
        Some(FailureKind::InvalidState) => 4,
        Some(FailureKind::NotFound) => 5,
        None => 1,
    }
}
