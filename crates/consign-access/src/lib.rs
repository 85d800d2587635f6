//! # consign-access: Role-Based Access Registry
//!
//! Owns the three principal sets that gate the shipment ledger:
//!
//! - **moderators**: may manage moderators and both whitelists. Always
//!   contains the registry owner.
//! - **creators**: may originate shipments.
//! - **transactors**: may record ownership/condition transactions.
//!
//! ## Authorization
//!
//! Every permission decision in the workspace goes through
//! [`policy::authorize`]. The ledger names a [`Capability`] per operation and
//! the predicate answers with `Ok(())` or an [`AccessError`] carrying the
//! failure kind. There are no scattered role checks elsewhere.
//!
//! ## Mutation
//!
//! The registry is mutated only through its own moderator-gated operations.
//! All membership operations are idempotent set inserts/removes.

pub mod config;
pub mod error;
pub mod policy;
pub mod registry;

pub use config::RegistryConfig;
pub use error::AccessError;
pub use policy::{authorize, Capability, Role};
pub use registry::AccessRegistry;
