//! # JSON File Store
//!
//! One JSON file per slot inside a data directory.
//!
//! ## Atomic Replace
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  save(blob)                                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  create_dir_all(data_dir)                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  write  <data_dir>/<slot>.json.tmp  + fsync                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  rename .tmp ──► <data_dir>/<slot>.json   (atomic on the same volume)  │
//! │                                                                         │
//! │  A crash before the rename leaves the previous snapshot intact.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fs::{self, File};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use ferreteria_core::DEFAULT_SNAPSHOT_KEY;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::store::SnapshotStore;

/// File-backed snapshot slot.
///
/// ## Example
/// ```rust,ignore
/// let store = JsonFileStore::new("/var/lib/ferreteria").slot("ferreteriaData");
/// let (state, issues) = load_state(&store, PosState::default())?;
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
    slot: String,
}

impl JsonFileStore {
    /// A store in `data_dir` using the default slot name.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        JsonFileStore {
            data_dir: data_dir.into(),
            slot: DEFAULT_SNAPSHOT_KEY.to_string(),
        }
    }

    /// Sets the slot name.
    pub fn slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = slot.into();
        self
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.slot))
    }

    fn temp_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json.tmp", self.slot))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> StoreResult<Option<String>> {
        let path = self.path();
        match fs::read_to_string(&path) {
            Ok(blob) => {
                debug!(path = %path.display(), bytes = blob.len(), "Snapshot read");
                Ok(Some(blob))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == ErrorKind::InvalidData => Err(StoreError::Corrupt(format!(
                "{} is not valid UTF-8",
                path.display()
            ))),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    fn save(&self, blob: &str) -> StoreResult<()> {
        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir)
                .map_err(|e| StoreError::io(&self.data_dir, e))?;
            info!(dir = %self.data_dir.display(), "Created data directory");
        }

        let tmp = self.temp_path();
        write_synced(&tmp, blob).map_err(|e| StoreError::io(&tmp, e))?;

        let path = self.path();
        fs::rename(&tmp, &path).map_err(|e| StoreError::io(&path, e))?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path().display().to_string()
    }
}

fn write_synced(path: &Path, blob: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(blob.as_bytes())?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{load_state, save_state};
    use ferreteria_core::{PaymentMethod, PosState, SnapshotIssue};
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_slot() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_save_creates_dir_and_replaces() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested")).slot("caja1");

        store.save("{\"a\":1}").unwrap();
        store.save("{\"a\":2}").unwrap();

        assert_eq!(store.load().unwrap().as_deref(), Some("{\"a\":2}"));
        assert!(store.path().ends_with("caja1.json"));
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_state_survives_restart() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());

        let mut state = PosState::default();
        state.add_line("3").unwrap();
        state.add_line("3").unwrap();
        state.complete_sale(PaymentMethod::Transfer, None).unwrap();
        state.add_line("2").unwrap();
        save_state(&store, &state).unwrap();

        let reopened = JsonFileStore::new(dir.path());
        let (restored, issues) = load_state(&reopened, PosState::default()).unwrap();

        assert!(issues.is_empty());
        assert_eq!(restored.history().len(), 1);
        assert_eq!(restored.product("3").unwrap().quantity, 48);
        assert_eq!(restored.product("2").unwrap().quantity, 29);
        assert_eq!(restored.current_sale().reserved("2"), 1);
    }

    #[test]
    fn test_non_utf8_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path());
        fs::write(store.path(), [0xff, 0xfe, 0x00]).unwrap();

        assert!(matches!(store.load(), Err(StoreError::Corrupt(_))));
        let (state, issues) = load_state(&store, PosState::default()).unwrap();
        assert_eq!(state, PosState::default());
        assert!(matches!(issues[0], SnapshotIssue::BlobDiscarded { .. }));
    }
}
