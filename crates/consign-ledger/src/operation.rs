//! # Operation Table
//!
//! The lifecycle state machine as data. Each row names the state an
//! operation requires, the state it leaves behind, and the capability the
//! caller must present. The ledger consults this table before every
//! mutation and nowhere else decides who may do what.
//!
//! | Operation | Requires | Leaves | Capability |
//! |---|---|---|---|
//! | `create` | (none) | `Created` | creator role |
//! | `start` | `Created` | `InTransit` | exactly the sender |
//! | `transact` | `Created` | `Created` | transactor role |
//! | `update_temperature` | `Created` | `Created` | current holder |
//! | `deliver` | `InTransit` | `Delivered` | exactly the recipient |
//! | `cancel` | `Created` | `Cancelled` | exactly the sender |

use consign_access::{Capability, Role};
use serde::{Deserialize, Serialize};

use crate::shipment::{Shipment, ShipmentState};

/// A lifecycle operation on the shipment ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentOperation {
    Create,
    Start,
    Transact,
    UpdateTemperature,
    Deliver,
    Cancel,
}

impl ShipmentOperation {
    /// Every operation, creation first.
    pub const ALL: [ShipmentOperation; 6] = [
        ShipmentOperation::Create,
        ShipmentOperation::Start,
        ShipmentOperation::Transact,
        ShipmentOperation::UpdateTemperature,
        ShipmentOperation::Deliver,
        ShipmentOperation::Cancel,
    ];

    /// Operations that act on an existing shipment.
    pub const ON_RECORD: [ShipmentOperation; 5] = [
        ShipmentOperation::Start,
        ShipmentOperation::Transact,
        ShipmentOperation::UpdateTemperature,
        ShipmentOperation::Deliver,
        ShipmentOperation::Cancel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Start => "start",
            Self::Transact => "transact",
            Self::UpdateTemperature => "update_temperature",
            Self::Deliver => "deliver",
            Self::Cancel => "cancel",
        }
    }

    /// The state the shipment must be in. `None` for creation.
    pub fn required_state(&self) -> Option<ShipmentState> {
        match self {
            Self::Create => None,
            Self::Start | Self::Transact | Self::UpdateTemperature | Self::Cancel => {
                Some(ShipmentState::Created)
            }
            Self::Deliver => Some(ShipmentState::InTransit),
        }
    }

    /// The state the shipment is in after the operation commits.
    pub fn resulting_state(&self) -> ShipmentState {
        match self {
            Self::Create | Self::Transact | Self::UpdateTemperature => ShipmentState::Created,
            Self::Start => ShipmentState::InTransit,
            Self::Deliver => ShipmentState::Delivered,
            Self::Cancel => ShipmentState::Cancelled,
        }
    }

    /// Whether committing changes the lifecycle phase.
    pub fn changes_phase(&self) -> bool {
        self.required_state()
            .is_some_and(|from| from != self.resulting_state())
    }

    /// What the caller must present to create a shipment.
    pub fn create_capability() -> Capability<'static> {
        Capability::Role(Role::Creator)
    }

    /// What the caller must present to apply this operation to `shipment`.
    pub fn capability<'a>(&self, shipment: &'a Shipment) -> Capability<'a> {
        match self {
            Self::Create => Self::create_capability(),
            Self::Transact => Capability::Role(Role::Transactor),
            Self::Start | Self::Cancel => Capability::Exactly(shipment.sender()),
            Self::Deliver => Capability::Exactly(shipment.recipient()),
            Self::UpdateTemperature => Capability::Holder(shipment.current_owner()),
        }
    }
}

impl std::fmt::Display for ShipmentOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
