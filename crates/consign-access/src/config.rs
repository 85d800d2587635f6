//! # Registry Configuration
//!
//! The only configuration surface of the ledger: who owns the registry and
//! who starts out as a moderator. Loaded by the host (the CLI reads it from
//! YAML) and handed to [`AccessRegistry::from_config`](crate::AccessRegistry::from_config).
//!
//! ```yaml
//! owner: "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
//! moderators:
//!   - "0x70997970c51812dc3a010c7d01b50e0d17dc79c8"
//!   - "0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc"
//! ```

use consign_core::Principal;
use serde::{Deserialize, Serialize};

/// Construction-time input for an access registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Designated owner. Always a moderator.
    pub owner: Principal,
    /// Additional initial moderators.
    #[serde(default)]
    pub moderators: Vec<Principal>,
}

impl RegistryConfig {
    pub fn new(owner: Principal, moderators: Vec<Principal>) -> Self {
        Self { owner, moderators }
    }
}
