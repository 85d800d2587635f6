//! Errors returned by ledger operations and snapshot loading.

use consign_access::AccessError;
use consign_core::{FailureKind, ShipmentId};
use thiserror::Error;

use crate::operation::ShipmentOperation;
use crate::shipment::ShipmentState;

/// A rejected ledger operation. Nothing was mutated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Caller lacks the whitelist membership, or is not the current holder.
    #[error("{operation} refused: {source}")]
    PermissionDenied {
        operation: ShipmentOperation,
        shipment_id: Option<ShipmentId>,
        #[source]
        source: AccessError,
    },

    /// Caller is not the sender/recipient entitled to this action.
    #[error("{operation} on shipment {shipment_id} refused: {source}")]
    Unauthorized {
        operation: ShipmentOperation,
        shipment_id: ShipmentId,
        #[source]
        source: AccessError,
    },

    /// The shipment is not in the state the operation requires.
    #[error("{operation} on shipment {shipment_id} requires {required}, but it is {current}")]
    InvalidState {
        operation: ShipmentOperation,
        shipment_id: ShipmentId,
        current: ShipmentState,
        required: ShipmentState,
    },

    /// No shipment with this id has been created.
    #[error("shipment {shipment_id} not found")]
    NotFound { shipment_id: ShipmentId },
}

impl LedgerError {
    /// Wrap an authorization refusal, classifying it by its failure kind.
    pub(crate) fn refused(
        operation: ShipmentOperation,
        shipment_id: Option<ShipmentId>,
        source: AccessError,
    ) -> Self {
        match (source.kind(), shipment_id) {
            (FailureKind::Unauthorized, Some(shipment_id)) => Self::Unauthorized {
                operation,
                shipment_id,
                source,
            },
            _ => Self::PermissionDenied {
                operation,
                shipment_id,
                source,
            },
        }
    }

    /// Map onto the shared failure taxonomy.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::PermissionDenied { .. } => FailureKind::PermissionDenied,
            Self::Unauthorized { .. } => FailureKind::Unauthorized,
            Self::InvalidState { .. } => FailureKind::InvalidState,
            Self::NotFound { .. } => FailureKind::NotFound,
        }
    }
}

/// A ledger snapshot violates a ledger invariant and was not loaded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("shipment at position {position} carries id {id}")]
    NonSequentialId { position: usize, id: ShipmentId },

    #[error("notification log sequence numbers are not gap-free")]
    NonSequentialEvents,
}
