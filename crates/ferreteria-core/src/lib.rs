//! # ferreteria-core: Transaction Model for the Ferretería POS
//!
//! Pure business logic for a single-terminal hardware store: the product
//! table, the in-progress sale and its stock reservations, the cash drawer
//! and the ledger of completed sales. No I/O happens in this crate.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Ferretería POS Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Presentation layer                           │   │
//! │  │   Inventory tab ──► Sales tab ──► Payment ──► Cash register tab │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 ferreteria-terminal (commands)                  │   │
//! │  │   add_product, add_to_sale, complete_sale, confirm_reset, ...   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ ferreteria-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ inventory │  │   sale    │  │ register  │  │  ledger   │  │   │
//! │  │   └─────┬─────┘  └─────┬─────┘  └─────┬─────┘  └─────┬─────┘  │   │
//! │  │         └──────────────┴──── state ───┴──────────────┘        │   │
//! │  │                      command · snapshot                        │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILESYSTEM • NO CLOCK EXCEPT Utc::now FOR SALES   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ferreteria-store (snapshot slot)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Whole-peso `Money` newtype
//! - [`types`] - Product, SaleLineItem, Sale, PaymentMethod
//! - [`error`] - `CoreError` / `ValidationError`
//! - [`validation`] - Input rules
//! - [`inventory`] - Inventory Store
//! - [`sale`] - Sale Builder (stock reservation)
//! - [`register`] - Cash Register
//! - [`ledger`] - Sales Ledger
//! - [`state`] - `PosState`, the owner of all four stores
//! - [`command`] - Command pattern over `PosState`
//! - [`snapshot`] - Persisted layout and tolerant restore
//!
//! ## Example Usage
//!
//! ```rust
//! use ferreteria_core::{Money, PaymentMethod, PosState};
//!
//! let mut pos = PosState::default();
//! pos.add_line("1").unwrap(); // Martillo, $10.000
//! pos.add_line("1").unwrap();
//!
//! let sale = pos
//!     .complete_sale(PaymentMethod::Cash, Some(Money::from_units(25_000)))
//!     .unwrap();
//!
//! assert_eq!(sale.change, Some(Money::from_units(5_000)));
//! assert_eq!(pos.cash_register().current_amount.units(), 120_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod command;
pub mod error;
pub mod inventory;
pub mod ledger;
pub mod money;
pub mod register;
pub mod sale;
pub mod snapshot;
pub mod state;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use command::{Command, Outcome};
pub use error::{CoreError, CoreResult, ValidationError};
pub use inventory::Inventory;
pub use ledger::SalesLedger;
pub use money::Money;
pub use register::CashRegister;
pub use sale::{SaleBuilder, SalePhase};
pub use snapshot::{DecodedSnapshot, Snapshot, SnapshotError, SnapshotIssue};
pub use state::{InvariantViolation, PosState, ResetSummary, ResetToken};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Drawer balance of a brand-new register, in pesos.
pub const DEFAULT_OPENING_BALANCE: i64 = 100_000;

/// Slot name the snapshot is stored under.
pub const DEFAULT_SNAPSHOT_KEY: &str = "ferreteriaData";

/// Longest accepted product name.
pub const MAX_PRODUCT_NAME_LEN: usize = 120;

/// Highest accepted unit price, in pesos.
pub const MAX_PRICE: i64 = 1_000_000_000;

/// Highest accepted shelf quantity for one product.
pub const MAX_STOCK: i64 = 1_000_000;

/// Ceiling for any sale total, tendered cash or drawer balance, in pesos.
///
/// `MAX_PRICE × MAX_STOCK` fits exactly, and the sum of two bounded
/// amounts stays far below `i64::MAX`.
pub const MAX_AMOUNT: i64 = MAX_PRICE * MAX_STOCK;
