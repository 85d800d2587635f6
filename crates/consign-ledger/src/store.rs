//! # Consignment Store
//!
//! The single owned value holding the access registry and the shipment
//! ledger. Every mutating call takes the calling principal first; the store
//! hands the ledger a shared borrow of its registry so both halves are
//! consulted from one place.

use std::collections::BTreeSet;
use std::sync::Arc;

use consign_access::{AccessError, AccessRegistry, RegistryConfig};
use consign_core::{Principal, ShipmentId};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::event::{EventRecord, EventSink};
use crate::ledger::ShipmentLedger;
use crate::shipment::{ConditionReport, Shipment};

/// Registry plus ledger, mutated only through the operations below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsignmentStore {
    registry: AccessRegistry,
    ledger: ShipmentLedger,
}

impl ConsignmentStore {
    /// A fresh store with an empty ledger.
    pub fn new(config: &RegistryConfig) -> Self {
        Self::with_registry(AccessRegistry::from_config(config))
    }

    pub fn with_registry(registry: AccessRegistry) -> Self {
        Self {
            registry,
            ledger: ShipmentLedger::new(),
        }
    }

    pub fn registry(&self) -> &AccessRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &ShipmentLedger {
        &self.ledger
    }

    pub fn subscribe(&mut self, sink: Arc<dyn EventSink>) {
        self.ledger.subscribe(sink);
    }

    // ─── Registry administration ─────────────────────────────────────

    pub fn add_moderator(
        &mut self,
        caller: &Principal,
        principal: Principal,
    ) -> Result<bool, AccessError> {
        self.registry.add_moderator(caller, principal)
    }

    pub fn remove_moderator(
        &mut self,
        caller: &Principal,
        principal: &Principal,
    ) -> Result<bool, AccessError> {
        self.registry.remove_moderator(caller, principal)
    }

    pub fn add_creators(
        &mut self,
        caller: &Principal,
        principals: &[Principal],
    ) -> Result<usize, AccessError> {
        self.registry.add_creators(caller, principals)
    }

    pub fn remove_creators(
        &mut self,
        caller: &Principal,
        principals: &[Principal],
    ) -> Result<usize, AccessError> {
        self.registry.remove_creators(caller, principals)
    }

    pub fn add_transactors(
        &mut self,
        caller: &Principal,
        principals: &[Principal],
    ) -> Result<usize, AccessError> {
        self.registry.add_transactors(caller, principals)
    }

    pub fn remove_transactors(
        &mut self,
        caller: &Principal,
        principals: &[Principal],
    ) -> Result<usize, AccessError> {
        self.registry.remove_transactors(caller, principals)
    }

    pub fn is_moderator(&self, principal: &Principal) -> bool {
        self.registry.is_moderator(principal)
    }

    pub fn is_creator(&self, principal: &Principal) -> bool {
        self.registry.is_creator(principal)
    }

    pub fn is_transactor(&self, principal: &Principal) -> bool {
        self.registry.is_transactor(principal)
    }

    pub fn get_moderators(&self) -> &BTreeSet<Principal> {
        self.registry.moderators()
    }

    pub fn get_creators_whitelist(&self) -> &BTreeSet<Principal> {
        self.registry.creators()
    }

    pub fn get_transactors_whitelist(&self) -> &BTreeSet<Principal> {
        self.registry.transactors()
    }

    // ─── Shipment lifecycle ──────────────────────────────────────────

    pub fn create_shipment(
        &mut self,
        caller: &Principal,
        recipient: Principal,
        temperature: impl Into<String>,
    ) -> Result<ShipmentId, LedgerError> {
        self.ledger
            .create_shipment(&self.registry, caller, recipient, temperature)
    }

    pub fn start_shipment(&mut self, caller: &Principal, id: ShipmentId) -> Result<(), LedgerError> {
        self.ledger.start_shipment(&self.registry, caller, id)
    }

    pub fn transact_shipment(
        &mut self,
        caller: &Principal,
        id: ShipmentId,
        condition_code: u32,
        comments: impl Into<String>,
    ) -> Result<(), LedgerError> {
        self.ledger
            .transact_shipment(&self.registry, caller, id, condition_code, comments)
    }

    pub fn update_shipment_temperature(
        &mut self,
        caller: &Principal,
        id: ShipmentId,
        new_temperature: impl Into<String>,
    ) -> Result<(), LedgerError> {
        self.ledger
            .update_shipment_temperature(&self.registry, caller, id, new_temperature)
    }

    pub fn deliver_shipment(
        &mut self,
        caller: &Principal,
        id: ShipmentId,
        report: Option<ConditionReport>,
    ) -> Result<(), LedgerError> {
        self.ledger
            .deliver_shipment(&self.registry, caller, id, report)
    }

    pub fn cancel_shipment(&mut self, caller: &Principal, id: ShipmentId) -> Result<(), LedgerError> {
        self.ledger.cancel_shipment(&self.registry, caller, id)
    }

    pub fn get_shipment(&self, id: ShipmentId) -> Result<&Shipment, LedgerError> {
        self.ledger.shipment(id)
    }

    pub fn shipment_count(&self) -> u64 {
        self.ledger.shipment_count()
    }

    pub fn events(&self) -> &[EventRecord] {
        self.ledger.events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consign_core::FailureKind;

    fn p(s: &str) -> Principal {
        Principal::new(s).unwrap()
    }

    fn store() -> ConsignmentStore {
        ConsignmentStore::new(&RegistryConfig::new(p("owner"), vec![p("mod")]))
    }

    #[test]
    fn fresh_store_has_owner_and_initial_moderators() {
        let s = store();
        assert!(s.is_moderator(&p("owner")));
        assert!(s.is_moderator(&p("mod")));
        assert!(s.get_creators_whitelist().is_empty());
        assert!(s.get_transactors_whitelist().is_empty());
        assert_eq!(s.shipment_count(), 0);
    }

    #[test]
    fn whitelisting_enables_creation() {
        let mut s = store();
        let err = s.create_shipment(&p("alice"), p("bob"), "4").unwrap_err();
        assert_eq!(err.kind(), FailureKind::PermissionDenied);

        s.add_creators(&p("mod"), &[p("alice")]).unwrap();
        let id = s.create_shipment(&p("alice"), p("bob"), "4").unwrap();
        assert_eq!(s.get_shipment(id).unwrap().sender(), &p("alice"));
        assert_eq!(s.events().len(), 1);
    }

    #[test]
    fn delisting_a_creator_does_not_touch_their_shipments() {
        let mut s = store();
        s.add_creators(&p("mod"), &[p("alice")]).unwrap();
        let id = s.create_shipment(&p("alice"), p("bob"), "4").unwrap();
        s.remove_creators(&p("mod"), &[p("alice")]).unwrap();
        // Sender checks are per-record, not per-role.
        s.start_shipment(&p("alice"), id).unwrap();
    }

    #[test]
    fn non_moderator_cannot_administer() {
        let mut s = store();
        let err = s.add_transactors(&p("alice"), &[p("alice")]).unwrap_err();
        assert_eq!(err.kind(), FailureKind::PermissionDenied);
        assert!(!s.is_transactor(&p("alice")));
    }

    #[test]
    fn store_snapshot_round_trip() {
        let mut s = store();
        s.add_creators(&p("mod"), &[p("alice")]).unwrap();
        s.add_transactors(&p("owner"), &[p("tom")]).unwrap();
        let id = s.create_shipment(&p("alice"), p("bob"), "4").unwrap();
        s.transact_shipment(&p("tom"), id, 3, "wet").unwrap();

        let json = serde_json::to_string_pretty(&s).unwrap();
        let back: ConsignmentStore = serde_json::from_str(&json).unwrap();
        assert_eq!(back.registry(), s.registry());
        assert_eq!(back.get_shipment(id).unwrap(), s.get_shipment(id).unwrap());
        assert_eq!(back.events(), s.events());
    }
}
