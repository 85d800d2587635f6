//! # Shared Store Handle
//!
//! Hosts that accept calls from more than one thread share a
//! [`ConsignmentStore`] through a [`StoreHandle`]. Each call takes the lock
//! for the duration of exactly one closure, so concurrent invocations are
//! linearized before the store observes them.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::store::ConsignmentStore;

/// Thread-safe, cloneable handle to one [`ConsignmentStore`].
///
/// The mutex is `parking_lot`, which does not poison: a panicking caller
/// cannot leave the handle permanently unusable.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    inner: Arc<Mutex<ConsignmentStore>>,
}

impl StoreHandle {
    pub fn new(store: ConsignmentStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Run one mutating unit of work with exclusive access.
    pub fn with<R>(&self, f: impl FnOnce(&mut ConsignmentStore) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut *guard)
    }

    /// Run one read with exclusive access.
    pub fn read<R>(&self, f: impl FnOnce(&ConsignmentStore) -> R) -> R {
        let guard = self.inner.lock();
        f(&*guard)
    }

    /// A point-in-time copy of the store.
    pub fn snapshot(&self) -> ConsignmentStore {
        self.inner.lock().clone()
    }
}
