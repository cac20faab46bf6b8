//! # POS State
//!
//! The single owner of the four stores. Every operation that touches more
//! than one store goes through here, so stock reservation and register
//! arithmetic are enforced in exactly one place.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          PosState                                       │
//! │                                                                         │
//! │  ┌──────────────┐  reserves   ┌──────────────┐                         │
//! │  │  Inventory   │◄────────────│ SaleBuilder  │                         │
//! │  └──────────────┘  releases   └──────┬───────┘                         │
//! │                                      │ complete_sale                    │
//! │                          ┌───────────┴───────────┐                      │
//! │                          ▼                       ▼                      │
//! │                  ┌──────────────┐        ┌──────────────┐               │
//! │                  │ SalesLedger  │        │ CashRegister │               │
//! │                  │  append      │        │  += total    │               │
//! │                  └──────────────┘        └──────────────┘               │
//! │                          ▲                       ▲                      │
//! │                          └──── confirm_reset ────┘                      │
//! │                        (clear)             (rebase)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Atomicity
//! Every check runs before the first write. A method that returns `Err`
//! has changed nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::inventory::Inventory;
use crate::ledger::SalesLedger;
use crate::money::Money;
use crate::register::CashRegister;
use crate::sale::SaleBuilder;
use crate::types::{new_id, PaymentMethod, Product, ProductUpdate, Sale, SaleLineItem};
use crate::validation::validate_amount;

// =============================================================================
// Reset Protocol Types
// =============================================================================

/// Proof that a register reset was requested.
///
/// Handed to the front-end by [`PosState::request_reset`]; the front-end
/// shows its confirmation dialog and passes the token back to
/// [`PosState::confirm_reset`] only if the user agreed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResetToken(String);

impl ResetToken {
    fn generate() -> Self {
        ResetToken(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ResetToken {
    fn from(value: String) -> Self {
        ResetToken(value)
    }
}

/// What a confirmed reset did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ResetSummary {
    /// Ledger entries removed.
    pub cleared_sales: usize,
    /// New `initial_amount` (the drawer balance at reset time).
    pub opening_balance: Money,
}

// =============================================================================
// Invariant Checks
// =============================================================================

/// A broken cross-store invariant. Should never be observed; reported by
/// [`PosState::check_invariants`] for tests and post-restore diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("register unbalanced: current {current} != initial {initial} + sales {sales}")]
    RegisterUnbalanced {
        initial: Money,
        current: Money,
        sales: Money,
    },

    #[error("register sales total {register} != ledger total {ledger}")]
    LedgerMismatch { register: Money, ledger: Money },

    #[error("product {product_id} has negative stock {quantity}")]
    NegativeStock { product_id: String, quantity: i64 },

    #[error("sale line for {product_id} has quantity {quantity}")]
    EmptyLine { product_id: String, quantity: i64 },

    #[error("sale line references missing product {product_id}")]
    OrphanLine { product_id: String },
}

// =============================================================================
// PosState
// =============================================================================

/// Process-wide transaction state.
#[derive(Debug, Clone, PartialEq)]
pub struct PosState {
    pub(crate) inventory: Inventory,
    pub(crate) sale: SaleBuilder,
    pub(crate) register: CashRegister,
    pub(crate) ledger: SalesLedger,
    pending_reset: Option<ResetToken>,
}

impl Default for PosState {
    /// Starter catalog and the default opening balance.
    fn default() -> Self {
        PosState::new(Inventory::starter_catalog(), CashRegister::default())
    }
}

impl PosState {
    /// A state with an empty sale and an empty ledger.
    pub fn new(inventory: Inventory, register: CashRegister) -> Self {
        PosState {
            inventory,
            sale: SaleBuilder::new(),
            register,
            ledger: SalesLedger::new(),
            pending_reset: None,
        }
    }

    /// Reassembles a state from restored parts. Callers are expected to
    /// have repaired invariants first (see `snapshot`).
    pub(crate) fn from_parts(
        inventory: Inventory,
        sale: SaleBuilder,
        register: CashRegister,
        ledger: SalesLedger,
    ) -> Self {
        PosState {
            inventory,
            sale,
            register,
            ledger,
            pending_reset: None,
        }
    }

    // =========================================================================
    // Inventory Store
    // =========================================================================

    /// Adds a product to the catalog. See [`Inventory::add`].
    pub fn add_product(&mut self, name: &str, price: Money, quantity: i64) -> CoreResult<Product> {
        let product = self.inventory.add(name, price, quantity)?.clone();
        info!(id = %product.id, name = %product.name, price = %product.price, quantity, "Product created");
        Ok(product)
    }

    /// Edits a product in place. Lines already in the sale keep their
    /// frozen name and price.
    pub fn update_product(&mut self, id: &str, update: ProductUpdate) -> CoreResult<Product> {
        let product = self.inventory.update(id, update)?.clone();
        info!(id = %product.id, name = %product.name, price = %product.price, quantity = product.quantity, "Product updated");
        Ok(product)
    }

    /// Deletes a product unless the current sale holds a reservation on it.
    ///
    /// Past ledger entries are unaffected; they carry frozen copies.
    pub fn delete_product(&mut self, id: &str) -> CoreResult<Product> {
        let reserved = self.sale.reserved(id);
        if reserved > 0 {
            return Err(CoreError::ProductReserved {
                product_id: id.to_string(),
                reserved,
            });
        }

        let product = self.inventory.remove(id)?;
        info!(id = %product.id, name = %product.name, "Product deleted");
        Ok(product)
    }

    /// Case-insensitive name search over the whole catalog.
    pub fn search(&self, term: &str) -> Vec<&Product> {
        self.inventory.search(term)
    }

    /// Search restricted to products with stock left.
    pub fn available_products(&self, term: &str) -> Vec<&Product> {
        self.inventory.available(term)
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.inventory.get(id)
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    // =========================================================================
    // Sale Builder
    // =========================================================================

    /// Reserves one unit of `product_id` for the current sale.
    pub fn add_line(&mut self, product_id: &str) -> CoreResult<SaleLineItem> {
        self.sale
            .add_line(&mut self.inventory, product_id)
            .map(Clone::clone)
    }

    /// Releases one unit. Returns `false` if the product is not in the sale.
    pub fn remove_line(&mut self, product_id: &str) -> bool {
        self.sale.remove_line(&mut self.inventory, product_id)
    }

    /// Current sale total at frozen prices.
    pub fn sale_total(&self) -> Money {
        self.sale.total()
    }

    pub fn current_sale(&self) -> &SaleBuilder {
        &self.sale
    }

    /// Settles the current sale now. See [`PosState::complete_sale_at`].
    pub fn complete_sale(
        &mut self,
        payment_method: PaymentMethod,
        cash_received: Option<Money>,
    ) -> CoreResult<Sale> {
        self.complete_sale_at(payment_method, cash_received, Utc::now())
    }

    /// Settles the current sale with an explicit timestamp.
    ///
    /// ## Behavior
    /// 1. Rejects an empty sale (`EmptySale`)
    /// 2. For cash, rejects a negative or out-of-range `cash_received`
    ///    (`Validation`) and `cash_received < total` (`InsufficientPayment`);
    ///    a missing amount counts as zero
    /// 3. Adds the total to the register, refusing a drawer balance past
    ///    [`crate::MAX_AMOUNT`] (`Validation`)
    /// 4. Appends an immutable [`Sale`] to the ledger and empties the sale
    ///    builder without touching stock; nothing fallible runs from here on
    ///
    /// `cash_received` is ignored for card and transfer payments.
    pub fn complete_sale_at(
        &mut self,
        payment_method: PaymentMethod,
        cash_received: Option<Money>,
        date: DateTime<Utc>,
    ) -> CoreResult<Sale> {
        if self.sale.is_empty() {
            return Err(CoreError::EmptySale);
        }

        let total = self.sale.total();
        let change = if payment_method.is_cash() {
            let received = cash_received.unwrap_or_default();
            validate_amount("cash received", received)?;
            if received < total {
                return Err(CoreError::InsufficientPayment { total, received });
            }
            Some(received - total)
        } else {
            None
        };

        self.register.register_sale(total)?;

        let sale = Sale {
            id: new_id(),
            items: self.sale.take_lines(),
            total,
            payment_method,
            date,
            change,
        };
        let sale = self.ledger.append(sale).clone();

        if self.pending_reset.take().is_some() {
            debug!("Pending register reset invalidated by a new sale");
        }

        info!(
            sale_id = %sale.id,
            total = %sale.total,
            method = %sale.payment_method,
            units = sale.unit_count(),
            "Sale completed"
        );
        Ok(sale)
    }

    /// Drops the current sale and returns every reserved unit to the shelf.
    ///
    /// Returns the number of units released.
    pub fn abandon_sale(&mut self) -> i64 {
        let released = self.sale.abandon(&mut self.inventory);
        if released > 0 {
            info!(units = released, "Sale abandoned, reservations released");
        }
        released
    }

    // =========================================================================
    // Cash Register & Ledger
    // =========================================================================

    pub fn cash_register(&self) -> &CashRegister {
        &self.register
    }

    /// Completed sales since the last reset, oldest first.
    pub fn history(&self) -> &[Sale] {
        self.ledger.history()
    }

    pub fn ledger(&self) -> &SalesLedger {
        &self.ledger
    }

    /// Step one of the reset protocol. Replaces any earlier request.
    pub fn request_reset(&mut self) -> ResetToken {
        let token = ResetToken::generate();
        debug!(sales = self.ledger.len(), "Register reset requested");
        self.pending_reset = Some(token.clone());
        token
    }

    /// Withdraws a pending reset request. Returns whether one was pending.
    pub fn cancel_reset(&mut self) -> bool {
        self.pending_reset.take().is_some()
    }

    pub fn reset_pending(&self) -> bool {
        self.pending_reset.is_some()
    }

    /// Step two of the reset protocol.
    ///
    /// Sets `initial_amount := current_amount`, zeroes `sales_total` and
    /// clears the ledger. Inventory and the in-progress sale are untouched.
    ///
    /// ## Errors
    /// - `ResetNotRequested` if no request is pending
    /// - `ResetTokenMismatch` if `token` is not the pending one (the
    ///   pending request stays valid)
    pub fn confirm_reset(&mut self, token: &ResetToken) -> CoreResult<ResetSummary> {
        match &self.pending_reset {
            None => return Err(CoreError::ResetNotRequested),
            Some(pending) if pending != token => return Err(CoreError::ResetTokenMismatch),
            Some(_) => {}
        }
        self.pending_reset = None;

        self.register.rebase();
        let cleared_sales = self.ledger.clear();
        let summary = ResetSummary {
            cleared_sales,
            opening_balance: self.register.initial_amount,
        };

        info!(
            cleared_sales,
            opening_balance = %summary.opening_balance,
            "Cash register reset"
        );
        Ok(summary)
    }

    // =========================================================================
    // Invariants
    // =========================================================================

    /// Lists every broken invariant (empty when the state is consistent).
    pub fn check_invariants(&self) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();

        if !self.register.is_balanced() {
            violations.push(InvariantViolation::RegisterUnbalanced {
                initial: self.register.initial_amount,
                current: self.register.current_amount,
                sales: self.register.sales_total,
            });
        }

        let ledger_total = self.ledger.total();
        if ledger_total != self.register.sales_total {
            violations.push(InvariantViolation::LedgerMismatch {
                register: self.register.sales_total,
                ledger: ledger_total,
            });
        }

        for p in self.inventory.products() {
            if p.quantity < 0 {
                violations.push(InvariantViolation::NegativeStock {
                    product_id: p.id.clone(),
                    quantity: p.quantity,
                });
            }
        }

        for line in self.sale.lines() {
            if line.quantity < 1 {
                violations.push(InvariantViolation::EmptyLine {
                    product_id: line.product_id.clone(),
                    quantity: line.quantity,
                });
            }
            if !self.inventory.contains(&line.product_id) {
                violations.push(InvariantViolation::OrphanLine {
                    product_id: line.product_id.clone(),
                });
            }
        }

        if !violations.is_empty() {
            warn!(count = violations.len(), "State invariants violated");
        }
        violations
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
