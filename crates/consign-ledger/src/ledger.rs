//! # Shipment Ledger
//!
//! Owns the append-only shipment collection and enforces the lifecycle
//! table in [`crate::operation`]. Every operation runs in two phases:
//!
//! 1. **Admission.** The shipment must exist (`NotFound`), the caller must
//!    hold the operation's capability (`PermissionDenied`/`Unauthorized`),
//!    and the shipment must be in the required state (`InvalidState`).
//! 2. **Commit.** The record is mutated, a history entry is appended, and
//!    at most one notification is emitted.
//!
//! Nothing is written during admission, so a rejected call leaves the
//! ledger exactly as it was.
//!
//! ## Concurrency
//!
//! Operations take `&mut self`; the ledger assumes its host linearizes
//! calls. See [`StoreHandle`](crate::StoreHandle) for a mutex-serialized host.

use std::sync::Arc;

use consign_access::{authorize, AccessRegistry};
use consign_core::{Principal, ShipmentId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, SnapshotError};
use crate::event::{EventLog, EventRecord, EventSink, ShipmentEvent};
use crate::operation::ShipmentOperation;
use crate::shipment::{ConditionReport, Shipment, ShipmentState};

/// The shipment collection, its notification log, and its subscribers.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "LedgerSnapshot")]
pub struct ShipmentLedger {
    shipments: Vec<Shipment>,
    events: EventLog,
    #[serde(skip)]
    subscribers: Vec<Arc<dyn EventSink>>,
}

#[derive(Deserialize)]
struct LedgerSnapshot {
    shipments: Vec<Shipment>,
    #[serde(default)]
    events: EventLog,
}

impl TryFrom<LedgerSnapshot> for ShipmentLedger {
    type Error = SnapshotError;

    fn try_from(raw: LedgerSnapshot) -> Result<Self, Self::Error> {
        for (position, shipment) in raw.shipments.iter().enumerate() {
            if shipment.id.index() != Some(position) {
                return Err(SnapshotError::NonSequentialId {
                    position,
                    id: shipment.id,
                });
            }
        }
        if !raw.events.is_sequential() {
            return Err(SnapshotError::NonSequentialEvents);
        }
        Ok(Self {
            shipments: raw.shipments,
            events: raw.events,
            subscribers: Vec::new(),
        })
    }
}

impl ShipmentLedger {
    /// An empty ledger. The first shipment will receive id 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an external subscriber for future notifications.
    pub fn subscribe(&mut self, sink: Arc<dyn EventSink>) {
        tracing::debug!(sink = sink.name(), "event sink subscribed");
        self.subscribers.push(sink);
    }

    // ── Lifecycle operations ────────────────────────────────────────

    /// Register a new shipment from `caller` to `recipient`.
    ///
    /// The caller must be on the creators whitelist. Returns the assigned id,
    /// which equals the number of shipments created before this one.
    pub fn create_shipment(
        &mut self,
        registry: &AccessRegistry,
        caller: &Principal,
        recipient: Principal,
        temperature: impl Into<String>,
    ) -> Result<ShipmentId, LedgerError> {
        let operation = ShipmentOperation::Create;
        authorize(registry, caller, ShipmentOperation::create_capability())
            .map_err(|e| refuse(LedgerError::refused(operation, None, e)))?;

        let id = ShipmentId::new(self.shipment_count());
        let now = Timestamp::now();
        let temperature = temperature.into();
        let mut shipment = Shipment::new(
            id,
            caller.clone(),
            recipient.clone(),
            temperature.clone(),
            now,
        );
        shipment.record(operation.as_str(), ShipmentState::Created, caller, now);
        self.shipments.push(shipment);
        tracing::info!(
            shipment_id = %id,
            sender = %caller,
            recipient = %recipient,
            "shipment created"
        );

        self.emit(
            ShipmentEvent::ShipmentCreated {
                shipment_id: id,
                sender: caller.clone(),
                recipient,
                temperature,
            },
            now,
        );
        Ok(id)
    }

    /// Dispatch a shipment (`Created → InTransit`). Sender only.
    pub fn start_shipment(
        &mut self,
        registry: &AccessRegistry,
        caller: &Principal,
        id: ShipmentId,
    ) -> Result<(), LedgerError> {
        let operation = ShipmentOperation::Start;
        let index = self.admit(registry, caller, id, operation)?;
        let now = Timestamp::now();
        self.commit(index, operation, caller, now, |_| {});
        self.emit(ShipmentEvent::ShipmentInTransit { shipment_id: id }, now);
        Ok(())
    }

    /// Record an ownership/condition transaction on a `Created` shipment.
    ///
    /// The caller must be on the transactors whitelist and becomes the
    /// shipment's current owner. The sender is unchanged.
    pub fn transact_shipment(
        &mut self,
        registry: &AccessRegistry,
        caller: &Principal,
        id: ShipmentId,
        condition_code: u32,
        comments: impl Into<String>,
    ) -> Result<(), LedgerError> {
        let operation = ShipmentOperation::Transact;
        let index = self.admit(registry, caller, id, operation)?;
        let now = Timestamp::now();
        let comments = comments.into();
        self.commit(index, operation, caller, now, |s| {
            s.current_owner = caller.clone();
            s.condition_code = condition_code;
            s.comments = comments.clone();
        });
        self.emit(
            ShipmentEvent::ShipmentTransacted {
                shipment_id: id,
                condition_code,
                comments,
                timestamp: now,
            },
            now,
        );
        Ok(())
    }

    /// Correct the temperature of a `Created` shipment. Current owner only.
    ///
    /// Emits no notification.
    pub fn update_shipment_temperature(
        &mut self,
        registry: &AccessRegistry,
        caller: &Principal,
        id: ShipmentId,
        new_temperature: impl Into<String>,
    ) -> Result<(), LedgerError> {
        let operation = ShipmentOperation::UpdateTemperature;
        let index = self.admit(registry, caller, id, operation)?;
        let temperature = new_temperature.into();
        self.commit(index, operation, caller, Timestamp::now(), |s| {
            s.temperature = temperature;
        });
        Ok(())
    }

    /// Close out an `InTransit` shipment (`InTransit → Delivered`).
    /// Recipient only.
    ///
    /// A condition report, when supplied, replaces the last recorded one.
    pub fn deliver_shipment(
        &mut self,
        registry: &AccessRegistry,
        caller: &Principal,
        id: ShipmentId,
        report: Option<ConditionReport>,
    ) -> Result<(), LedgerError> {
        let operation = ShipmentOperation::Deliver;
        let index = self.admit(registry, caller, id, operation)?;
        let now = Timestamp::now();
        self.commit(index, operation, caller, now, |s| {
            if let Some(report) = report {
                s.condition_code = report.condition_code;
                s.comments = report.comments;
            }
        });
        self.emit(ShipmentEvent::ShipmentDelivered { shipment_id: id }, now);
        Ok(())
    }

    /// Withdraw a shipment before dispatch (`Created → Cancelled`). Sender only.
    pub fn cancel_shipment(
        &mut self,
        registry: &AccessRegistry,
        caller: &Principal,
        id: ShipmentId,
    ) -> Result<(), LedgerError> {
        let operation = ShipmentOperation::Cancel;
        let index = self.admit(registry, caller, id, operation)?;
        let now = Timestamp::now();
        self.commit(index, operation, caller, now, |_| {});
        self.emit(ShipmentEvent::ShipmentCancelled { shipment_id: id }, now);
        Ok(())
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// Look up a shipment. Ids at or beyond [`shipment_count`](Self::shipment_count)
    /// fail with `NotFound`.
    pub fn shipment(&self, id: ShipmentId) -> Result<&Shipment, LedgerError> {
        self.position(id).map(|index| &self.shipments[index])
    }

    /// Number of shipments ever created; also the next id to be assigned.
    pub fn shipment_count(&self) -> u64 {
        self.shipments.len() as u64
    }

    /// Every shipment, in id order.
    pub fn shipments(&self) -> &[Shipment] {
        &self.shipments
    }

    /// Shipments where `principal` is the sender, recipient, or current owner.
    pub fn shipments_by_principal<'a>(
        &'a self,
        principal: &'a Principal,
    ) -> impl Iterator<Item = &'a Shipment> + 'a {
        self.shipments.iter().filter(move |s| s.involves(principal))
    }

    pub fn events(&self) -> &[EventRecord] {
        self.events.records()
    }

    /// Notifications with sequence number `>= seq`.
    pub fn events_since(&self, seq: u64) -> &[EventRecord] {
        self.events.since(seq)
    }

    // ── Internals ───────────────────────────────────────────────────

    fn position(&self, id: ShipmentId) -> Result<usize, LedgerError> {
        id.index()
            .filter(|index| *index < self.shipments.len())
            .ok_or(LedgerError::NotFound { shipment_id: id })
    }

    /// Run every precondition for `operation` on shipment `id` without
    /// mutating anything. Returns the shipment's position.
    fn admit(
        &self,
        registry: &AccessRegistry,
        caller: &Principal,
        id: ShipmentId,
        operation: ShipmentOperation,
    ) -> Result<usize, LedgerError> {
        let index = self.position(id).map_err(refuse)?;
        let shipment = &self.shipments[index];

        authorize(registry, caller, operation.capability(shipment))
            .map_err(|e| refuse(LedgerError::refused(operation, Some(id), e)))?;

        if let Some(required) = operation.required_state() {
            if shipment.state != required {
                return Err(refuse(LedgerError::InvalidState {
                    operation,
                    shipment_id: id,
                    current: shipment.state,
                    required,
                }));
            }
        }
        Ok(index)
    }

    fn commit(
        &mut self,
        index: usize,
        operation: ShipmentOperation,
        caller: &Principal,
        at: Timestamp,
        apply: impl FnOnce(&mut Shipment),
    ) {
        let shipment = &mut self.shipments[index];
        let from = shipment.state;
        apply(shipment);
        shipment.record(operation.as_str(), operation.resulting_state(), caller, at);
        tracing::info!(
            shipment_id = %shipment.id,
            caller = %caller,
            operation = %operation,
            from = %from,
            to = %shipment.state,
            "shipment transition committed"
        );
    }

    fn emit(&mut self, event: ShipmentEvent, at: Timestamp) {
        let record = self.events.append(event, at).clone();
        for sink in &self.subscribers {
            if let Err(e) = sink.deliver(&record) {
                tracing::warn!(sink = sink.name(), error = %e, "event sink delivery failed");
            }
        }
    }
}

fn refuse(err: LedgerError) -> LedgerError {
    tracing::debug!(kind = %err.kind(), error = %err, "ledger operation refused");
    err
}

impl std::fmt::Debug for ShipmentLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShipmentLedger")
            .field("shipments_count", &self.shipments.len())
            .field("events_count", &self.events.len())
            .field("subscribers_count", &self.subscribers.len())
            .finish()
    }
}
