//! # Error Types
//!
//! Boundary validation errors and the failure taxonomy shared by the
//! access registry and the shipment ledger.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejection of malformed input at a construction boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A principal identity was empty.
    #[error("principal identity must not be empty")]
    EmptyPrincipal,

    /// A timestamp string could not be interpreted as UTC RFC 3339.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// The four caller-observable reasons an operation can be rejected.
///
/// None of these are defects. Each is detected before any mutation, so a
/// rejected call never changes state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// Caller lacks the required moderator/creator/transactor membership.
    PermissionDenied,
    /// Caller is not the specific principal entitled to act on this record.
    Unauthorized,
    /// The record is not in the lifecycle state the operation requires.
    InvalidState,
    /// The referenced record does not exist.
    NotFound,
}

impl FailureKind {
    /// Stable name used in logs and CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "PermissionDenied",
            Self::Unauthorized => "Unauthorized",
            Self::InvalidState => "InvalidState",
            Self::NotFound => "NotFound",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
