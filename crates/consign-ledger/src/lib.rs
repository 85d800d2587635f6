//! # consign-ledger: Shipment Lifecycle Ledger
//!
//! Enforces the shipment state machine and the per-operation authorization
//! rule, and emits one notification per committed transition.
//!
//! ```text
//! Created ──start──▶ InTransit ──deliver──▶ Delivered
//!    │ ▲
//!    │ └── transact / update_temperature
//!    └──cancel──▶ Cancelled
//! ```
//!
//! ## Crate Layout
//!
//! - [`shipment`]: the permanent record, its lifecycle state, and history.
//! - [`operation`]: the operation table (required state, resulting state,
//!   capability).
//! - [`ledger`]: [`ShipmentLedger`], the only writer of shipment records.
//! - [`event`]: notifications, the append-only [`EventLog`], and subscribers.
//! - [`store`]: [`ConsignmentStore`], registry and ledger in one owned value.
//! - [`handle`]: [`StoreHandle`], a mutex-serialized shared handle.
//!
//! Every operation either commits completely or returns a [`LedgerError`]
//! with nothing mutated.

pub mod error;
pub mod event;
pub mod handle;
pub mod ledger;
pub mod operation;
pub mod shipment;
pub mod store;

pub use error::{LedgerError, SnapshotError};
pub use event::{EventLog, EventRecord, EventSink, MemorySink, ShipmentEvent, SinkError, TracingSink};
pub use handle::StoreHandle;
pub use ledger::ShipmentLedger;
pub use operation::ShipmentOperation;
pub use shipment::{ConditionReport, Shipment, ShipmentState, ShipmentTransition};
pub use store::ConsignmentStore;
