//! Errors produced by the access registry and the authorization predicate.

use consign_core::{FailureKind, Principal};
use thiserror::Error;

use crate::policy::Role;

/// A caller was refused by the authorization predicate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// Caller lacks the role membership the operation requires.
    #[error("permission denied: {caller} is not a {required}")]
    PermissionDenied {
        /// The refused caller.
        caller: Principal,
        /// The role that would have been accepted.
        required: Role,
    },

    /// Caller does not hold the record the operation acts on.
    #[error("permission denied: {caller} is not the current holder {holder}")]
    NotHolder {
        /// The refused caller.
        caller: Principal,
        /// The principal that currently holds the record.
        holder: Principal,
    },

    /// Caller is not the specific principal entitled to this action.
    #[error("unauthorized: only {expected} may perform this action, not {caller}")]
    Unauthorized {
        /// The refused caller.
        caller: Principal,
        /// The only principal that would have been accepted.
        expected: Principal,
    },
}

impl AccessError {
    /// Map onto the shared failure taxonomy.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::PermissionDenied { .. } | Self::NotHolder { .. } => {
                FailureKind::PermissionDenied
            }
            Self::Unauthorized { .. } => FailureKind::Unauthorized,
        }
    }

    /// The caller that was refused.
    pub fn caller(&self) -> &Principal {
        match self {
            Self::PermissionDenied { caller, .. }
            | Self::NotHolder { caller, .. }
            | Self::Unauthorized { caller, .. } => caller,
        }
    }
}
