//! # Terminal State
//!
//! The process-wide [`PosState`] plus the slot it is persisted to.
//!
//! ## Why Arc<Mutex<T>>?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Terminal State Access                                │
//! │                                                                         │
//! │  Command A (add_to_sale)            Command B (delete_product)          │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  lock() ◄── acquired                 lock() ◄── waits                   │
//! │       │                                   │                             │
//! │  execute + save snapshot                  │                             │
//! │       │                                   │                             │
//! │  unlock ─────────────────────────────────►│ acquired                    │
//! │                                           ▼                             │
//! │                                      sees the reservation, CONFLICT     │
//! │                                                                         │
//! │  Each command runs to completion before the next one starts, and its   │
//! │  snapshot is written under the same lock, so the slot always holds     │
//! │  the state the last command left behind.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lock poisoning is recovered with `PoisonError::into_inner`; `PosState`
//! methods never leave a half-applied change behind.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ferreteria_core::{Command, Outcome, PosState, SnapshotIssue};
use ferreteria_store::{load_state, save_state, JsonFileStore, SnapshotStore};
use tracing::{debug, error, info, warn};

use super::config::{ConfigError, TerminalConfig};
use crate::error::ApiError;

/// Shared terminal state.
#[derive(Clone)]
pub struct TerminalState {
    pos: Arc<Mutex<PosState>>,
    store: Arc<dyn SnapshotStore>,
    config: Arc<TerminalConfig>,
    restore_issues: Arc<Vec<SnapshotIssue>>,
}

impl TerminalState {
    /// Opens the file-backed slot named by `config` and restores from it.
    pub fn open(config: TerminalConfig) -> Result<Self, ApiError> {
        let data_dir = config.resolved_data_dir().ok_or_else(|| {
            ConfigError::Invalid("could not determine a data directory".into())
        })?;
        let store = JsonFileStore::new(data_dir).slot(config.snapshot_key.trim());
        Self::with_store(Arc::new(store), config)
    }

    /// Restores from an arbitrary slot.
    ///
    /// Unusable snapshots fall back to `config.default_state()`; only an
    /// unreadable slot is an error.
    pub fn with_store(
        store: Arc<dyn SnapshotStore>,
        config: TerminalConfig,
    ) -> Result<Self, ApiError> {
        let (pos, issues) = load_state(store.as_ref(), config.default_state())?;

        for issue in &issues {
            warn!(%issue, "Snapshot issue at startup");
        }
        info!(
            store = %config.store_name,
            slot = %store.describe(),
            products = pos.inventory().len(),
            sales = pos.history().len(),
            "Terminal state ready"
        );

        Ok(TerminalState {
            pos: Arc::new(Mutex::new(pos)),
            store,
            config: Arc::new(config),
            restore_issues: Arc::new(issues),
        })
    }

    pub fn config(&self) -> &TerminalConfig {
        &self.config
    }

    /// Repairs made while restoring the snapshot at startup.
    pub fn restore_issues(&self) -> &[SnapshotIssue] {
        &self.restore_issues
    }

    fn lock(&self) -> MutexGuard<'_, PosState> {
        self.pos.lock().unwrap_or_else(|poisoned| {
            warn!("POS state lock was poisoned, recovering");
            PoisonError::into_inner(poisoned)
        })
    }

    /// Read-only access.
    pub fn with_state<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&PosState) -> R,
    {
        let pos = self.lock();
        f(&pos)
    }

    /// Runs a command and, if it changed persisted state, writes the
    /// snapshot before releasing the lock.
    ///
    /// A failed write is logged and otherwise ignored: the in-memory state
    /// stays authoritative and the next successful write catches up.
    pub fn execute(&self, command: Command) -> Result<Outcome, ApiError> {
        let name = command.name();
        let persist = command.is_mutation();

        let mut pos = self.lock();
        let outcome = pos.execute(command).map_err(|e| {
            debug!(command = name, error = %e, "Command rejected");
            ApiError::from(e)
        })?;

        if persist {
            self.persist(&pos);
        }
        Ok(outcome)
    }

    fn persist(&self, pos: &PosState) {
        if let Err(e) = save_state(self.store.as_ref(), pos) {
            error!(slot = %self.store.describe(), error = %e, "Failed to save snapshot");
        }
    }
}

impl std::fmt::Debug for TerminalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalState")
            .field("store", &self.store.describe())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
