//! # Ferretería Terminal Library
//!
//! Orchestration layer between the presentation front-end and the
//! transaction model. Owns the live state, persists it after every
//! mutation and maps domain errors to API errors.
//!
//! ## Module Organization
//! ```text
//! ferreteria_terminal/
//! ├── lib.rs            ◄─── You are here (bootstrap & tracing)
//! ├── state/
//! │   ├── mod.rs        ◄─── State type exports
//! │   ├── terminal.rs   ◄─── Live PosState + snapshot slot
//! │   └── config.rs     ◄─── TOML/env configuration
//! ├── commands/
//! │   ├── mod.rs        ◄─── Command exports
//! │   ├── product.rs    ◄─── Inventory tab
//! │   ├── sale.rs       ◄─── Sales tab
//! │   └── register.rs   ◄─── Cash register tab
//! └── error.rs          ◄─── API error type for commands
//! ```
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Terminal Startup                                 │
//! │                                                                         │
//! │  bootstrap(config_path)                                                 │
//! │       │                                                                 │
//! │       ├── 1. init_tracing()          RUST_LOG or "info,ferreteria=debug"│
//! │       ├── 2. TerminalConfig::load_or_default()                          │
//! │       ├── 3. JsonFileStore at <data_dir>/<snapshot_key>.json            │
//! │       └── 4. load_state()            snapshot, or defaults if absent    │
//! │                                                                         │
//! │  Unreadable or malformed snapshots never abort startup: the terminal    │
//! │  opens with defaults (or the repaired parts) and the problems are       │
//! │  available through `TerminalState::restore_issues()`.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust,no_run
//! use ferreteria_terminal::{bootstrap, commands::sale};
//!
//! let state = bootstrap(None)?;
//! let view = sale::add_to_sale(&state, "1")?;
//! println!("Total: {}", view.total_display);
//! # Ok::<(), ferreteria_terminal::error::ApiError>(())
//! ```

pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::ApiError;
use crate::state::{TerminalConfig, TerminalState};

/// Loads configuration and opens the terminal.
///
/// `config_path` overrides the platform config location
/// (`terminal.toml` in the project config directory).
pub fn bootstrap(config_path: Option<PathBuf>) -> Result<TerminalState, ApiError> {
    init_tracing();
    info!("Starting Ferretería terminal v{}", env!("CARGO_PKG_VERSION"));

    let config = TerminalConfig::load_or_default(config_path);
    info!(
        store = %config.store_name,
        data_dir = ?config.resolved_data_dir(),
        "Configuration loaded"
    );

    let state = TerminalState::open(config)?;
    info!(
        issues = state.restore_issues().len(),
        "Terminal ready"
    );
    Ok(state)
}

/// Initializes the tracing subscriber for logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=ferreteria=trace` - Show trace for ferreteria crates only
/// - Default: INFO, DEBUG for ferreteria crates
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ferreteria=debug"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice() {
        init_tracing();
        init_tracing();
    }

    #[test]
    fn test_bootstrap_with_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("terminal.toml");
        let data_dir = dir.path().join("datos");
        std::fs::write(
            &config_path,
            format!(
                "opening_balance = 50000\ndata_dir = {:?}\n",
                data_dir.to_string_lossy()
            ),
        )
        .unwrap();

        let state = bootstrap(Some(config_path)).unwrap();
        assert_eq!(state.config().opening_balance, 50_000);
        let register = commands::register::get_register(&state).unwrap();
        assert_eq!(register.current_amount.units(), 50_000);

        commands::sale::add_to_sale(&state, "1").unwrap();
        assert!(data_dir.join("ferreteriaData.json").exists());
    }
}
