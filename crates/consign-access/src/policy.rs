//! # Authorization Predicate
//!
//! A single pure function decides every permission question:
//!
//! | Capability | Accepted caller | Refusal |
//! |---|---|---|
//! | `Role(Moderator)` | member of `moderators` | `PermissionDenied` |
//! | `Role(Creator)` | member of the creators whitelist | `PermissionDenied` |
//! | `Role(Transactor)` | member of the transactors whitelist | `PermissionDenied` |
//! | `Holder(p)` | exactly `p`, the record's current holder | `PermissionDenied` |
//! | `Exactly(p)` | exactly `p`, a fixed party of the record | `Unauthorized` |
//!
//! `Holder` and `Exactly` both compare principals; they differ only in how
//! a refusal is reported. A holder changes hands through transactions, so a
//! mismatch is a missing permission. A fixed party never changes, so a
//! mismatch means the caller is simply the wrong principal.

use consign_core::Principal;
use serde::{Deserialize, Serialize};

use crate::error::AccessError;
use crate::registry::AccessRegistry;

/// A role held by membership in one of the registry's sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May manage moderators and whitelists.
    Moderator,
    /// May originate shipments.
    Creator,
    /// May record ownership/condition transactions.
    Transactor,
}

impl Role {
    /// All roles, in registry order.
    pub const ALL: [Role; 3] = [Role::Moderator, Role::Creator, Role::Transactor];

    /// Lowercase role name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Moderator => "moderator",
            Self::Creator => "creator",
            Self::Transactor => "transactor",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a caller must have for an operation to proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability<'a> {
    /// Membership in the set for `Role`.
    Role(Role),
    /// Being the current holder of a record.
    Holder(&'a Principal),
    /// Being one specific, immutable party of a record.
    Exactly(&'a Principal),
}

/// Decide whether `caller` has `capability`.
///
/// Pure: reads the registry, never mutates it.
pub fn authorize(
    registry: &AccessRegistry,
    caller: &Principal,
    capability: Capability<'_>,
) -> Result<(), AccessError> {
    match capability {
        Capability::Role(role) => {
            if registry.has_role(caller, role) {
                Ok(())
            } else {
                Err(AccessError::PermissionDenied {
                    caller: caller.clone(),
                    required: role,
                })
            }
        }
        Capability::Holder(holder) => {
            if caller == holder {
                Ok(())
            } else {
                Err(AccessError::NotHolder {
                    caller: caller.clone(),
                    holder: holder.clone(),
                })
            }
        }
        Capability::Exactly(expected) => {
            if caller == expected {
                Ok(())
            } else {
                Err(AccessError::Unauthorized {
                    caller: caller.clone(),
                    expected: expected.clone(),
                })
            }
        }
    }
}
