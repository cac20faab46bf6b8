//! # Snapshot Store
//!
//! The durable key-value slot and the glue between it and [`PosState`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Startup                                 After every mutation           │
//! │                                                                         │
//! │  load_state(store, defaults)             save_state(store, &state)      │
//! │     │                                       │                           │
//! │     ▼                                       ▼                           │
//! │  store.load() ── None ──► defaults       state.snapshot().to_json()     │
//! │     │ Some(blob)                            │                           │
//! │     ▼                                       ▼                           │
//! │  Snapshot::decode_lenient                store.save(blob)               │
//! │     │ not an object ──► defaults            (whole blob, last writer    │
//! │     ▼                                        wins)                      │
//! │  PosState::restore                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use ferreteria_core::{PosState, Snapshot, SnapshotIssue};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};

/// A single durable slot holding the latest snapshot blob.
///
/// Implementations replace the whole blob on every save; a reader never
/// observes a partially written blob.
pub trait SnapshotStore: Send + Sync {
    /// The stored blob, or `None` if nothing was ever saved.
    fn load(&self) -> StoreResult<Option<String>>;

    /// Replaces the stored blob.
    fn save(&self, blob: &str) -> StoreResult<()>;

    /// Human-readable location for logs.
    fn describe(&self) -> String;
}

/// Loads the state from `store`, falling back to `defaults`.
///
/// ## Fallbacks
/// - Empty slot: `defaults`, no issues
/// - Slot unreadable as text or blob not a JSON object: `defaults`, one
///   [`SnapshotIssue::BlobDiscarded`]
/// - Otherwise: per-field fallbacks as in [`PosState::restore`]
///
/// ## Errors
/// Only I/O failures propagate; content problems never do.
pub fn load_state(
    store: &dyn SnapshotStore,
    defaults: PosState,
) -> StoreResult<(PosState, Vec<SnapshotIssue>)> {
    let blob = match store.load() {
        Ok(Some(blob)) => blob,
        Ok(None) => {
            info!(store = %store.describe(), "No snapshot found, starting from defaults");
            return Ok((defaults, Vec::new()));
        }
        Err(StoreError::Corrupt(reason)) => return Ok(discard(store, defaults, reason)),
        Err(e) => return Err(e),
    };

    match Snapshot::decode_lenient(&blob) {
        Ok(decoded) => {
            let (state, issues) = PosState::restore(decoded, defaults);
            info!(
                store = %store.describe(),
                products = state.inventory().len(),
                sales = state.history().len(),
                repaired = issues.len(),
                "Snapshot restored"
            );
            Ok((state, issues))
        }
        Err(e) => Ok(discard(store, defaults, e.to_string())),
    }
}

fn discard(
    store: &dyn SnapshotStore,
    defaults: PosState,
    reason: String,
) -> (PosState, Vec<SnapshotIssue>) {
    warn!(store = %store.describe(), %reason, "Snapshot unusable, starting from defaults");
    (defaults, vec![SnapshotIssue::BlobDiscarded { reason }])
}

/// Writes the full state to `store`.
pub fn save_state(store: &dyn SnapshotStore, state: &PosState) -> StoreResult<()> {
    let blob = state.snapshot().to_json()?;
    store.save(&blob)?;
    debug!(store = %store.describe(), bytes = blob.len(), "Snapshot saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use ferreteria_core::{Inventory, Money, PaymentMethod};

    #[test]
    fn test_empty_store_gives_defaults() {
        let store = MemoryStore::new();
        let (state, issues) = load_state(&store, PosState::default()).unwrap();
        assert_eq!(state, PosState::default());
        assert!(issues.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let mut state = PosState::default();
        state.add_line("4").unwrap();
        state.complete_sale(PaymentMethod::Card, None).unwrap();
        state.add_line("1").unwrap();

        save_state(&store, &state).unwrap();
        let (loaded, issues) = load_state(&store, PosState::default()).unwrap();

        assert!(issues.is_empty());
        assert_eq!(loaded.snapshot(), state.snapshot());
        assert_eq!(loaded.cash_register().current_amount, Money::from_units(350_000));
    }

    #[test]
    fn test_garbage_blob_falls_back() {
        let store = MemoryStore::with_blob("not json at all");
        let defaults = PosState::new(Inventory::new(), Default::default());

        let (state, issues) = load_state(&store, defaults.clone()).unwrap();

        assert_eq!(state, defaults);
        assert!(matches!(issues[0], SnapshotIssue::BlobDiscarded { .. }));
    }

    #[test]
    fn test_partial_blob_keeps_good_fields() {
        let blob = serde_json::json!({
            "products": [{ "id": "x", "name": "Brocha", "price": 3500, "quantity": 4 }]
        })
        .to_string();
        let store = MemoryStore::with_blob(&blob);

        let (state, issues) = load_state(&store, PosState::default()).unwrap();

        assert_eq!(state.inventory().len(), 1);
        assert_eq!(state.cash_register().initial_amount.units(), 100_000);
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_save_failure_propagates() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        assert!(save_state(&store, &PosState::default()).is_err());
        assert!(store.blob().is_none());
    }
}
