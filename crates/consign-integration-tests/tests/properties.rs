//! # Property Tests
//!
//! Random operation sequences against a whole store. After every call the
//! store must satisfy the ledger and registry invariants, and a refused call
//! must leave the store exactly as it was.

use consign_access::{AccessRegistry, RegistryConfig};
use consign_core::{Principal, ShipmentId};
use consign_ledger::{ConsignmentStore, ShipmentState};
use proptest::prelude::*;

const CAST: [&str; 6] = ["owner", "mod", "A", "B", "T", "X"];

fn p(s: &str) -> Principal {
    Principal::new(s).unwrap()
}

#[derive(Debug, Clone)]
enum Call {
    AddCreator { caller: usize, who: usize },
    RemoveCreator { caller: usize, who: usize },
    AddTransactor { caller: usize, who: usize },
    RemoveModerator { caller: usize, who: usize },
    Create { caller: usize, recipient: usize },
    Start { caller: usize, id: u64 },
    Transact { caller: usize, id: u64, code: u32 },
    Temperature { caller: usize, id: u64 },
    Deliver { caller: usize, id: u64 },
    Cancel { caller: usize, id: u64 },
}

fn call() -> impl Strategy<Value = Call> {
    let who = 0..CAST.len();
    let id = 0u64..6;
    prop_oneof![
        (who.clone(), who.clone()).prop_map(|(caller, who)| Call::AddCreator { caller, who }),
        (who.clone(), who.clone()).prop_map(|(caller, who)| Call::RemoveCreator { caller, who }),
        (who.clone(), who.clone()).prop_map(|(caller, who)| Call::AddTransactor { caller, who }),
        (who.clone(), who.clone()).prop_map(|(caller, who)| Call::RemoveModerator { caller, who }),
        (who.clone(), who.clone())
            .prop_map(|(caller, recipient)| Call::Create { caller, recipient }),
        (who.clone(), id.clone()).prop_map(|(caller, id)| Call::Start { caller, id }),
        (who.clone(), id.clone(), 0u32..4)
            .prop_map(|(caller, id, code)| Call::Transact { caller, id, code }),
        (who.clone(), id.clone()).prop_map(|(caller, id)| Call::Temperature { caller, id }),
        (who.clone(), id.clone()).prop_map(|(caller, id)| Call::Deliver { caller, id }),
        (who, id).prop_map(|(caller, id)| Call::Cancel { caller, id }),
    ]
}

/// Apply one call, returning whether it committed.
fn apply(store: &mut ConsignmentStore, call: &Call) -> bool {
    let c = |i: usize| p(CAST[i]);
    match *call {
        Call::AddCreator { caller, who } => store.add_creators(&c(caller), &[c(who)]).is_ok(),
        Call::RemoveCreator { caller, who } => {
            store.remove_creators(&c(caller), &[c(who)]).is_ok()
        }
        Call::AddTransactor { caller, who } => {
            store.add_transactors(&c(caller), &[c(who)]).is_ok()
        }
        Call::RemoveModerator { caller, who } => {
            store.remove_moderator(&c(caller), &c(who)).is_ok()
        }
        Call::Create { caller, recipient } => {
            store.create_shipment(&c(caller), c(recipient), "5").is_ok()
        }
        Call::Start { caller, id } => store.start_shipment(&c(caller), ShipmentId::new(id)).is_ok(),
        Call::Transact { caller, id, code } => store
            .transact_shipment(&c(caller), ShipmentId::new(id), code, "checked")
            .is_ok(),
        Call::Temperature { caller, id } => store
            .update_shipment_temperature(&c(caller), ShipmentId::new(id), "7")
            .is_ok(),
        Call::Deliver { caller, id } => store
            .deliver_shipment(&c(caller), ShipmentId::new(id), None)
            .is_ok(),
        Call::Cancel { caller, id } => store.cancel_shipment(&c(caller), ShipmentId::new(id)).is_ok(),
    }
}

fn fresh() -> ConsignmentStore {
    ConsignmentStore::new(&RegistryConfig::new(p("owner"), vec![p("mod")]))
}

fn snapshot(store: &ConsignmentStore) -> (AccessRegistry, serde_json::Value) {
    (
        store.registry().clone(),
        serde_json::to_value(store.ledger()).unwrap(),
    )
}

proptest! {
    #[test]
    fn invariants_hold_under_random_calls(calls in proptest::collection::vec(call(), 0..60)) {
        let mut store = fresh();
        let mut states: Vec<ShipmentState> = Vec::new();

        for call in &calls {
            let before = snapshot(&store);
            let committed = apply(&mut store, call);
            if !committed {
                prop_assert_eq!(&snapshot(&store), &before, "refused {:?} mutated the store", call);
            }

            // The owner never leaves the moderator set.
            prop_assert!(store.is_moderator(&p("owner")));

            // Ids equal positions, and the count only grows by one per creation.
            let ledger = store.ledger();
            prop_assert!(ledger.shipments().len() >= states.len());
            prop_assert!(ledger.shipments().len() <= states.len() + 1);
            for (i, s) in ledger.shipments().iter().enumerate() {
                prop_assert_eq!(s.id(), ShipmentId::new(i as u64));
            }

            // Every phase change follows an edge of the state graph.
            for (i, s) in ledger.shipments().iter().enumerate() {
                match states.get(i) {
                    Some(&old) if old != s.state() => {
                        prop_assert!(
                            old.valid_transitions().contains(&s.state()),
                            "shipment {} moved {} -> {}", i, old, s.state()
                        );
                    }
                    Some(_) => {}
                    None => prop_assert_eq!(s.state(), ShipmentState::Created),
                }
            }
            states = ledger.shipments().iter().map(|s| s.state()).collect();

            // The notification log is gap-free.
            for (i, record) in ledger.events().iter().enumerate() {
                prop_assert_eq!(record.seq, i as u64);
            }
        }
    }

    #[test]
    fn adding_members_is_idempotent(members in proptest::collection::vec(0..CAST.len(), 0..8)) {
        let mut store = fresh();
        let members: Vec<Principal> = members.into_iter().map(|i| p(CAST[i])).collect();
        store.add_creators(&p("mod"), &members).unwrap();
        store.add_transactors(&p("mod"), &members).unwrap();
        let creators = store.get_creators_whitelist().clone();
        let transactors = store.get_transactors_whitelist().clone();

        prop_assert_eq!(store.add_creators(&p("mod"), &members).unwrap(), 0);
        prop_assert_eq!(store.add_transactors(&p("mod"), &members).unwrap(), 0);
        prop_assert_eq!(store.get_creators_whitelist(), &creators);
        prop_assert_eq!(store.get_transactors_whitelist(), &transactors);
    }

    #[test]
    fn removing_non_members_changes_nothing(strangers in proptest::collection::vec("[a-z]{3,8}", 0..8)) {
        let mut store = fresh();
        store.add_creators(&p("mod"), &[p("A")]).unwrap();
        let strangers: Vec<Principal> = strangers
            .iter()
            .map(|s| p(&format!("zz-{s}")))
            .collect();
        let before = store.registry().clone();
        prop_assert_eq!(store.remove_creators(&p("mod"), &strangers).unwrap(), 0);
        prop_assert_eq!(store.remove_transactors(&p("mod"), &strangers).unwrap(), 0);
        prop_assert_eq!(store.registry(), &before);
    }
}
