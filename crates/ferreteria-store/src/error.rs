//! # Store Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / SnapshotError                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds the slot path                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in terminal) ← STORAGE_ERROR                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io;
use std::path::PathBuf;

use ferreteria_core::SnapshotError;
use thiserror::Error;

/// Snapshot slot errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the slot failed.
    ///
    /// ## When This Occurs
    /// - Data directory cannot be created
    /// - File permissions issue
    /// - Disk full
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The state could not be encoded.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// The slot holds bytes that are not a usable snapshot at all.
    #[error("Snapshot slot is corrupt: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<SnapshotError> for StoreError {
    fn from(err: SnapshotError) -> Self {
        match err {
            SnapshotError::NotAnObject => StoreError::Corrupt(err.to_string()),
            SnapshotError::Json(e) => StoreError::Serialization(e.to_string()),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
