//! # consign-core: Foundational Types for the Shipment Ledger
//!
//! Every other crate in the workspace depends on `consign-core`; it depends
//! on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identities.** A `Principal` is never a bare
//!    string, and a `ShipmentId` is never a bare `u64`. You cannot pass one
//!    where the other is expected.
//!
//! 2. **UTC-only timestamps.** `Timestamp` is UTC with seconds precision so
//!    that snapshots and notification streams render identically everywhere.
//!
//! 3. **One failure taxonomy.** `FailureKind` enumerates the four outcomes a
//!    caller can observe from a rejected operation. Crate-specific error enums
//!    map onto it exhaustively.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `consign-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod temporal;

pub use error::{FailureKind, ValidationError};
pub use identity::{Principal, ShipmentId};
pub use temporal::Timestamp;
