//! # On-Disk Store Snapshot
//!
//! The CLI keeps one JSON document, `<state-dir>/store.json`, holding the
//! consignment store and the inventory book. Every invocation loads it,
//! applies one operation, and writes it back only if the operation
//! succeeded. Writes go to a sibling temp file that is then renamed over
//! the snapshot, so a crash mid-write never leaves a truncated store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use consign_inventory::InventoryBook;
use consign_ledger::{ConsignmentStore, TracingSink};

/// File name of the snapshot inside the state directory.
pub const STORE_FILE: &str = "store.json";

/// Everything the operator tool persists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub store: ConsignmentStore,
    #[serde(default)]
    pub inventory: InventoryBook,
}

impl Snapshot {
    pub fn new(store: ConsignmentStore) -> Self {
        Self {
            store,
            inventory: InventoryBook::new(),
        }
    }
}

pub fn store_path(state_dir: &Path) -> PathBuf {
    state_dir.join(STORE_FILE)
}

/// Load the snapshot. Notifications from the loaded store are echoed to
/// the log.
pub fn load(state_dir: &Path) -> Result<Snapshot> {
    let path = store_path(state_dir);
    if !path.exists() {
        bail!(
            "no store at {}; run `consign init` first",
            path.display()
        );
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut snapshot: Snapshot = serde_json::from_str(&content)
        .with_context(|| format!("invalid store snapshot in {}", path.display()))?;
    snapshot.store.subscribe(Arc::new(TracingSink));
    tracing::debug!(
        path = %path.display(),
        shipments = snapshot.store.shipment_count(),
        "store loaded"
    );
    Ok(snapshot)
}

/// Write the snapshot atomically.
pub fn save(state_dir: &Path, snapshot: &Snapshot) -> Result<()> {
    std::fs::create_dir_all(state_dir)
        .with_context(|| format!("failed to create state directory {}", state_dir.display()))?;
    let path = store_path(state_dir);
    let tmp = state_dir.join(format!("{STORE_FILE}.tmp"));

    let json = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, &path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    tracing::debug!(path = %path.display(), "store saved");
    Ok(())
}

/// Load, apply `op`, and save only if `op` succeeded.
pub fn update<T>(state_dir: &Path, op: impl FnOnce(&mut Snapshot) -> Result<T>) -> Result<T> {
    let mut snapshot = load(state_dir)?;
    let out = op(&mut snapshot)?;
    save(state_dir, &snapshot)?;
    Ok(out)
}
