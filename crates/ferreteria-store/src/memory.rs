//! In-memory slot for tests and ephemeral terminals.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::error::{StoreError, StoreResult};
use crate::store::SnapshotStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    blob: Mutex<Option<String>>,
    saves: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `blob`.
    pub fn with_blob(blob: &str) -> Self {
        MemoryStore {
            blob: Mutex::new(Some(blob.to_string())),
            ..Default::default()
        }
    }

    /// Current contents of the slot.
    pub fn blob(&self) -> Option<String> {
        self.blob
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Makes every subsequent `save` fail, simulating a full disk.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> StoreResult<Option<String>> {
        Ok(self.blob())
    }

    fn save(&self, blob: &str) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::io(
                "memory",
                std::io::Error::new(std::io::ErrorKind::Other, "writes disabled"),
            ));
        }
        *self.blob.lock().unwrap_or_else(PoisonError::into_inner) = Some(blob.to_string());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
