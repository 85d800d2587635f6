//! # Notification Stream
//!
//! Every committed lifecycle transition appends exactly one [`EventRecord`]
//! to the ledger's append-only [`EventLog`] and is then offered to each
//! subscribed [`EventSink`]. Sinks are best-effort: a sink failure is
//! logged and never affects the committed mutation or the log.
//!
//! Temperature corrections commit without a notification.

use std::sync::Arc;

use consign_core::{Principal, ShipmentId, Timestamp};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Events ──────────────────────────────────────────────────────────

/// A structured notification, one per committed transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum ShipmentEvent {
    ShipmentCreated {
        shipment_id: ShipmentId,
        sender: Principal,
        recipient: Principal,
        temperature: String,
    },
    ShipmentInTransit {
        shipment_id: ShipmentId,
    },
    ShipmentTransacted {
        shipment_id: ShipmentId,
        condition_code: u32,
        comments: String,
        timestamp: Timestamp,
    },
    ShipmentDelivered {
        shipment_id: ShipmentId,
    },
    ShipmentCancelled {
        shipment_id: ShipmentId,
    },
}

impl ShipmentEvent {
    /// Event name, as subscribers match on it.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ShipmentCreated { .. } => "ShipmentCreated",
            Self::ShipmentInTransit { .. } => "ShipmentInTransit",
            Self::ShipmentTransacted { .. } => "ShipmentTransacted",
            Self::ShipmentDelivered { .. } => "ShipmentDelivered",
            Self::ShipmentCancelled { .. } => "ShipmentCancelled",
        }
    }

    /// The shipment the event is about.
    pub fn shipment_id(&self) -> ShipmentId {
        match self {
            Self::ShipmentCreated { shipment_id, .. }
            | Self::ShipmentInTransit { shipment_id }
            | Self::ShipmentTransacted { shipment_id, .. }
            | Self::ShipmentDelivered { shipment_id }
            | Self::ShipmentCancelled { shipment_id } => *shipment_id,
        }
    }
}

/// An event with its position in the stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Zero-based, gap-free position in the log.
    pub seq: u64,
    /// Commit time of the transition.
    pub at: Timestamp,
    #[serde(flatten)]
    pub event: ShipmentEvent,
}

// ─── Event Log ───────────────────────────────────────────────────────

/// Append-only sequence of every notification the ledger has emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `event`, assigning the next sequence number.
    pub(crate) fn append(&mut self, event: ShipmentEvent, at: Timestamp) -> &EventRecord {
        let seq = self.records.len() as u64;
        self.records.push(EventRecord { seq, at, event });
        &self.records[self.records.len() - 1]
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Records with `seq >= from`.
    pub fn since(&self, from: u64) -> &[EventRecord] {
        let start = usize::try_from(from)
            .unwrap_or(usize::MAX)
            .min(self.records.len());
        &self.records[start..]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether every record's `seq` equals its position.
    pub(crate) fn is_sequential(&self) -> bool {
        self.records
            .iter()
            .enumerate()
            .all(|(i, r)| r.seq == i as u64)
    }
}

// ─── Subscribers ─────────────────────────────────────────────────────

/// A sink refused or failed to take delivery of a notification.
#[derive(Error, Debug)]
#[error("event sink {sink} failed to deliver event #{seq}: {reason}")]
pub struct SinkError {
    pub sink: String,
    pub seq: u64,
    pub reason: String,
}

/// An external subscriber to the notification stream.
pub trait EventSink: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Take delivery of one committed notification.
    fn deliver(&self, record: &EventRecord) -> Result<(), SinkError>;
}

/// Collects delivered notifications in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    received: Mutex<Vec<EventRecord>>,
}

impl MemorySink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Everything delivered so far.
    pub fn received(&self) -> Vec<EventRecord> {
        self.received.lock().clone()
    }
}

impl EventSink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    fn deliver(&self, record: &EventRecord) -> Result<(), SinkError> {
        self.received.lock().push(record.clone());
        Ok(())
    }
}

/// Writes each notification to the `tracing` stream at `INFO`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn name(&self) -> &str {
        "tracing"
    }

    fn deliver(&self, record: &EventRecord) -> Result<(), SinkError> {
        tracing::info!(
            seq = record.seq,
            event = record.event.name(),
            shipment_id = %record.event.shipment_id(),
            at = %record.at,
            "shipment notification"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_transit(id: u64) -> ShipmentEvent {
        ShipmentEvent::ShipmentInTransit {
            shipment_id: ShipmentId::new(id),
        }
    }

    #[test]
    fn append_assigns_gap_free_sequence() {
        let mut log = EventLog::new();
        let now = Timestamp::now();
        assert_eq!(log.append(in_transit(0), now).seq, 0);
        assert_eq!(log.append(in_transit(1), now).seq, 1);
        assert_eq!(log.append(in_transit(2), now).seq, 2);
        assert_eq!(log.len(), 3);
        assert!(log.is_sequential());
    }

    #[test]
    fn since_slices_from_sequence() {
        let mut log = EventLog::new();
        let now = Timestamp::now();
        for i in 0..4 {
            log.append(in_transit(i), now);
        }
        assert_eq!(log.since(0).len(), 4);
        assert_eq!(log.since(3)[0].seq, 3);
        assert!(log.since(4).is_empty());
        assert!(log.since(u64::MAX).is_empty());
    }

    #[test]
    fn event_names_and_ids() {
        let created = ShipmentEvent::ShipmentCreated {
            shipment_id: ShipmentId::new(7),
            sender: Principal::new("a").unwrap(),
            recipient: Principal::new("b").unwrap(),
            temperature: "10.5".into(),
        };
        assert_eq!(created.name(), "ShipmentCreated");
        assert_eq!(created.shipment_id(), ShipmentId::new(7));
        assert_eq!(in_transit(3).name(), "ShipmentInTransit");
    }

    #[test]
    fn record_serializes_flat_with_tag() {
        let record = EventRecord {
            seq: 0,
            at: Timestamp::parse("2026-01-15T12:00:00Z").unwrap(),
            event: ShipmentEvent::ShipmentDelivered {
                shipment_id: ShipmentId::new(0),
            },
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["event"], "ShipmentDelivered");
        assert_eq!(json["shipment_id"], 0);
        assert_eq!(json["seq"], 0);
        let back: EventRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn memory_sink_collects() {
        let sink = MemorySink::new();
        let record = EventRecord {
            seq: 0,
            at: Timestamp::now(),
            event: in_transit(0),
        };
        sink.deliver(&record).unwrap();
        assert_eq!(sink.received(), vec![record]);
        assert_eq!(sink.name(), "memory");
    }
}
