//! # Shipment Record and Lifecycle State
//!
//! ## States
//!
//! ```text
//! Created ──▶ InTransit ──▶ Delivered (terminal)
//!    │
//!    └──▶ Cancelled (terminal)
//! ```
//!
//! `Created` also admits two self-edges that do not change the phase:
//! ownership/condition transactions and temperature corrections.

use consign_core::{Principal, ShipmentId, Timestamp};
use serde::{Deserialize, Serialize};

// ─── Shipment State ──────────────────────────────────────────────────

/// The lifecycle phase of a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentState {
    /// Registered by its sender, not yet dispatched.
    Created,
    /// Dispatched and on its way to the recipient.
    InTransit,
    /// Received by the recipient (terminal).
    Delivered,
    /// Withdrawn by the sender before dispatch (terminal).
    Cancelled,
}

impl ShipmentState {
    /// Every state, in lifecycle order.
    pub const ALL: [ShipmentState; 4] = [
        ShipmentState::Created,
        ShipmentState::InTransit,
        ShipmentState::Delivered,
        ShipmentState::Cancelled,
    ];

    /// Canonical state name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::InTransit => "IN_TRANSIT",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Parse a canonical state name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }

    /// Whether no phase change can leave this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// The phases reachable from this one in a single phase change.
    pub fn valid_transitions(&self) -> &'static [ShipmentState] {
        match self {
            Self::Created => &[Self::InTransit, Self::Cancelled],
            Self::InTransit => &[Self::Delivered],
            Self::Delivered | Self::Cancelled => &[],
        }
    }
}

impl std::fmt::Display for ShipmentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Condition Report ────────────────────────────────────────────────

/// A condition code with free-text comments, reported by a transactor or
/// by the recipient on delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionReport {
    pub condition_code: u32,
    pub comments: String,
}

impl ConditionReport {
    pub fn new(condition_code: u32, comments: impl Into<String>) -> Self {
        Self {
            condition_code,
            comments: comments.into(),
        }
    }
}

// ─── Transition History ──────────────────────────────────────────────

/// One committed lifecycle call against a shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentTransition {
    /// Name of the operation that committed.
    pub operation: String,
    pub from_state: ShipmentState,
    pub to_state: ShipmentState,
    /// The caller whose call committed.
    pub actor: Principal,
    pub at: Timestamp,
}

// ─── Shipment ────────────────────────────────────────────────────────

/// A permanent shipment record.
///
/// Fields are read-only outside this crate; every mutation goes through
/// [`ShipmentLedger`](crate::ShipmentLedger).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    pub(crate) id: ShipmentId,
    pub(crate) sender: Principal,
    pub(crate) recipient: Principal,
    pub(crate) current_owner: Principal,
    pub(crate) temperature: String,
    pub(crate) state: ShipmentState,
    pub(crate) condition_code: u32,
    pub(crate) comments: String,
    pub(crate) created_at: Timestamp,
    #[serde(default)]
    pub(crate) history: Vec<ShipmentTransition>,
}

impl Shipment {
    pub(crate) fn new(
        id: ShipmentId,
        sender: Principal,
        recipient: Principal,
        temperature: String,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            current_owner: sender.clone(),
            sender,
            recipient,
            temperature,
            state: ShipmentState::Created,
            condition_code: 0,
            comments: String::new(),
            created_at,
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> ShipmentId {
        self.id
    }

    /// The creator. Never changes.
    pub fn sender(&self) -> &Principal {
        &self.sender
    }

    /// The destination principal. Never changes.
    pub fn recipient(&self) -> &Principal {
        &self.recipient
    }

    /// Starts as the sender; reassigned by each transaction.
    pub fn current_owner(&self) -> &Principal {
        &self.current_owner
    }

    /// Free-form temperature reading, kept as text.
    pub fn temperature(&self) -> &str {
        &self.temperature
    }

    pub fn state(&self) -> ShipmentState {
        self.state
    }

    /// Last reported condition code; zero until a report arrives.
    pub fn condition_code(&self) -> u32 {
        self.condition_code
    }

    /// Last reported comments; empty until a report arrives.
    pub fn comments(&self) -> &str {
        &self.comments
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Every committed lifecycle call, starting with creation, oldest first.
    pub fn history(&self) -> &[ShipmentTransition] {
        &self.history
    }

    /// Whether `principal` is the sender, recipient, or current owner.
    pub fn involves(&self, principal: &Principal) -> bool {
        &self.sender == principal || &self.recipient == principal || &self.current_owner == principal
    }

    pub(crate) fn record(
        &mut self,
        operation: &str,
        to_state: ShipmentState,
        actor: &Principal,
        at: Timestamp,
    ) {
        self.history.push(ShipmentTransition {
            operation: operation.to_string(),
            from_state: self.state,
            to_state,
            actor: actor.clone(),
            at,
        });
        self.state = to_state;
    }
}
