//! # State Module
//!
//! Application state for the terminal.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────┐   ┌──────────────────────────────┐   │
//! │  │       TerminalState          │   │      TerminalConfig          │   │
//! │  │                              │   │                              │   │
//! │  │  Arc<Mutex<PosState>>        │   │  store_name                  │   │
//! │  │  Arc<dyn SnapshotStore>      │──►│  opening_balance             │   │
//! │  │  restore issues              │   │  data_dir / snapshot_key     │   │
//! │  └──────────────────────────────┘   └──────────────────────────────┘   │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • PosState: exclusive access through the mutex                        │
//! │  • SnapshotStore: only written while the mutex is held                 │
//! │  • TerminalConfig: read-only after startup                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod terminal;

pub use config::{ConfigError, ConfigResult, TerminalConfig};
pub use terminal::TerminalState;
