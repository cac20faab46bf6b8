//! # ferreteria-store: Snapshot Persistence for the Ferretería POS
//!
//! The whole POS state lives in one durable slot, rewritten after every
//! change.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Ferretería POS Data Flow                           │
//! │                                                                         │
//! │  Terminal command (complete_sale)                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PosState (ferreteria-core) mutated in memory                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 ferreteria-store (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ SnapshotStore │    │ JsonFileStore │    │ MemoryStore  │  │   │
//! │  │   │   (trait)     │◄───│  (file.rs)    │    │ (memory.rs)  │  │   │
//! │  │   │ load / save   │◄───┼───────────────┼────│              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │         load_state / save_state (store.rs)                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  <data_dir>/ferreteriaData.json                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ferreteria_store::{load_state, save_state, JsonFileStore};
//!
//! let store = JsonFileStore::new(data_dir);
//! let (mut state, _issues) = load_state(&store, PosState::default())?;
//! state.add_line("1")?;
//! save_state(&store, &state)?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod file;
pub mod memory;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use store::{load_state, save_state, SnapshotStore};
