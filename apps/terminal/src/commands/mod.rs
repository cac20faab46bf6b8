//! # Terminal Commands Module
//!
//! Every operation the presentation layer can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── product.rs   ◄─── Inventory tab: list, search, add, edit, delete
//! ├── sale.rs      ◄─── Sales tab: build, preview payment, complete, abandon
//! └── register.rs  ◄─── Cash register tab: balances, history, reset
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Terminal Command Flow                                │
//! │                                                                         │
//! │  Presentation layer                                                     │
//! │  ──────────────────                                                     │
//! │  add_to_sale(&state, "1")                                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Command fn                                                             │
//! │  ──────────                                                             │
//! │  reads:  state.with_state(|pos| ...)                                    │
//! │  writes: state.execute(Command::AddLine { .. })                         │
//! │              │                                                          │
//! │              ├── PosState::execute (under the lock)                     │
//! │              └── snapshot saved (mutations only)                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Result<Dto, ApiError>  (camelCase JSON)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod product;
pub mod register;
pub mod sale;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use ferreteria_store::MemoryStore;

    use crate::state::{TerminalConfig, TerminalState};

    /// A seeded terminal backed by an in-memory slot.
    pub fn terminal() -> TerminalState {
        TerminalState::with_store(Arc::new(MemoryStore::new()), TerminalConfig::default())
            .expect("in-memory terminal")
    }
}
