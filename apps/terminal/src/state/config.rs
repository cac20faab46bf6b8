//! # Terminal Configuration
//!
//! Loaded once at startup and read-only afterwards.
//!
//! ## Configuration Sources (later overrides earlier)
//! 1. Defaults (this file)
//! 2. Config file (`terminal.toml` in the platform config dir, or an explicit path)
//! 3. Environment variables (`FERRETERIA_*`)
//!
//! ## Environment Variables
//! | Variable | Field |
//! |---|---|
//! | `FERRETERIA_DATA_DIR` | `data_dir` |
//! | `FERRETERIA_STORE_NAME` | `store_name` |
//! | `FERRETERIA_OPENING_BALANCE` | `opening_balance` |
//! | `FERRETERIA_SEED_CATALOG` | `seed_catalog` |
//! | `FERRETERIA_SNAPSHOT_KEY` | `snapshot_key` |

use std::path::PathBuf;

use directories::ProjectDirs;
use ferreteria_core::money::group_thousands;
use ferreteria_core::validation::validate_amount;
use ferreteria_core::{
    CashRegister, Inventory, Money, PosState, DEFAULT_OPENING_BALANCE, DEFAULT_SNAPSHOT_KEY,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Terminal configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct TerminalConfig {
    /// Shown in the header and in logs.
    pub store_name: String,

    /// Prefix for displayed amounts.
    pub currency_symbol: String,

    /// Digit group separator for displayed amounts.
    pub thousands_separator: char,

    /// Drawer balance used when no snapshot exists, in pesos.
    pub opening_balance: i64,

    /// Start an empty terminal with the four starter products.
    pub seed_catalog: bool,

    /// Where the snapshot file lives. `None` uses the platform data dir.
    pub data_dir: Option<PathBuf>,

    /// Slot name of the snapshot.
    pub snapshot_key: String,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        TerminalConfig {
            store_name: "Ferretería".to_string(),
            currency_symbol: "$".to_string(),
            thousands_separator: '.',
            opening_balance: DEFAULT_OPENING_BALANCE,
            seed_catalog: true,
            data_dir: None,
            snapshot_key: DEFAULT_SNAPSHOT_KEY.to_string(),
        }
    }
}

impl TerminalConfig {
    /// Loads configuration from file, environment, and defaults.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading terminal config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load terminal config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn validate(&self) -> ConfigResult<()> {
        validate_amount("opening_balance", self.opening_balance())
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        let key = self.snapshot_key.trim();
        if key.is_empty() {
            return Err(ConfigError::Invalid("snapshot_key is required".into()));
        }
        if key.contains(|c: char| c == '/' || c == '\\') || key.starts_with('.') {
            return Err(ConfigError::Invalid(format!(
                "snapshot_key must be a plain name, got: {}",
                self.snapshot_key
            )));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var("FERRETERIA_DATA_DIR") {
            debug!(data_dir = %dir, "Overriding data dir from environment");
            self.data_dir = Some(PathBuf::from(dir));
        }

        if let Some(name) = var("FERRETERIA_STORE_NAME") {
            self.store_name = name;
        }

        if let Some(balance) = var("FERRETERIA_OPENING_BALANCE") {
            match balance.trim().parse::<i64>() {
                Ok(b) => self.opening_balance = b,
                Err(_) => warn!(value = %balance, "Ignoring non-numeric opening balance"),
            }
        }

        if let Some(seed) = var("FERRETERIA_SEED_CATALOG") {
            match seed.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.seed_catalog = true,
                "0" | "false" | "no" => self.seed_catalog = false,
                _ => warn!(value = %seed, "Unknown seed catalog flag in environment"),
            }
        }

        if let Some(key) = var("FERRETERIA_SNAPSHOT_KEY") {
            self.snapshot_key = key;
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("terminal.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// `data_dir`, or the platform data dir when unset.
    ///
    /// - **Linux**: `~/.local/share/ferreteria-pos`
    /// - **macOS**: `~/Library/Application Support/com.ferreteria.pos`
    /// - **Windows**: `%APPDATA%\ferreteria\pos\data`
    pub fn resolved_data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
    }

    pub fn opening_balance(&self) -> Money {
        Money::from_units(self.opening_balance)
    }

    /// State used when the slot is empty or unusable.
    pub fn default_state(&self) -> PosState {
        let inventory = if self.seed_catalog {
            Inventory::starter_catalog()
        } else {
            Inventory::new()
        };
        PosState::new(
            inventory,
            CashRegister::with_opening_balance(self.opening_balance()),
        )
    }

    /// Formats an amount for display.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = TerminalConfig::default();
    /// assert_eq!(config.format_currency(Money::from_units(250_000)), "$250.000");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        format!(
            "{}{}{}",
            if amount.is_negative() { "-" } else { "" },
            self.currency_symbol,
            group_thousands(amount.units().unsigned_abs(), self.thousands_separator)
        )
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "ferreteria", "pos")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn overrides(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = TerminalConfig::default();
        assert_eq!(config.opening_balance, 100_000);
        assert!(config.seed_catalog);
        assert_eq!(config.snapshot_key, "ferreteriaData");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_format_currency() {
        let config = TerminalConfig::default();
        assert_eq!(config.format_currency(Money::from_units(30_000)), "$30.000");
        assert_eq!(config.format_currency(Money::from_units(100)), "$100");
        assert_eq!(config.format_currency(Money::from_units(1_250_000)), "$1.250.000");
        assert_eq!(config.format_currency(Money::from_units(-5_000)), "-$5.000");
        assert_eq!(config.format_currency(Money::zero()), "$0");
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terminal.toml");
        std::fs::write(
            &path,
            "store_name = \"Ferretería El Tornillo\"\nopening_balance = 50000\nseed_catalog = false\n",
        )
        .unwrap();

        let mut config: TerminalConfig =
            toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        config.apply_overrides(overrides(&[]));

        assert_eq!(config.store_name, "Ferretería El Tornillo");
        assert_eq!(config.opening_balance, 50_000);
        assert!(!config.seed_catalog);
        // Unset fields keep their defaults
        assert_eq!(config.currency_symbol, "$");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = TerminalConfig::default();
        config.apply_overrides(overrides(&[
            ("FERRETERIA_DATA_DIR", "/srv/caja"),
            ("FERRETERIA_OPENING_BALANCE", "250000"),
            ("FERRETERIA_SEED_CATALOG", "no"),
            ("FERRETERIA_SNAPSHOT_KEY", "caja2"),
        ]));

        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/caja")));
        assert_eq!(config.opening_balance, 250_000);
        assert!(!config.seed_catalog);
        assert_eq!(config.snapshot_key, "caja2");
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let mut config = TerminalConfig::default();
        config.apply_overrides(overrides(&[
            ("FERRETERIA_OPENING_BALANCE", "mucho"),
            ("FERRETERIA_SEED_CATALOG", "maybe"),
        ]));
        assert_eq!(config, TerminalConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = TerminalConfig::default();
        config.opening_balance = -1;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = TerminalConfig::default();
        config.opening_balance = i64::MAX;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = TerminalConfig::default();
        config.snapshot_key = "../escape".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_state_respects_seed_flag() {
        let mut config = TerminalConfig::default();
        assert_eq!(config.default_state().inventory().len(), 4);

        config.seed_catalog = false;
        config.opening_balance = 5_000;
        let state = config.default_state();
        assert!(state.inventory().is_empty());
        assert_eq!(state.cash_register().current_amount.units(), 5_000);
    }
}
