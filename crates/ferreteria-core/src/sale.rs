//! # Sale Builder
//!
//! The in-progress sale: an ordered list of lines that *reserve* stock.
//!
//! ## Reservation Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Sale Builder Lifecycle                               │
//! │                                                                         │
//! │  ┌──────────┐ add_line  ┌──────────┐  complete   ┌──────────┐          │
//! │  │  Empty   │──────────►│ Building │────────────►│  Empty   │          │
//! │  └──────────┘           └──────────┘             └──────────┘          │
//! │       ▲                  │  ▲    │                                      │
//! │       │   remove_line    │  │    │ abandon                              │
//! │       └──────(last unit)─┘  └────┘────────────────► Empty               │
//! │                                                                         │
//! │  add_line     : product.quantity -= 1, line.quantity += 1              │
//! │  remove_line  : product.quantity += 1, line.quantity -= 1              │
//! │  abandon      : every reserved unit goes back to its product           │
//! │  complete     : stock untouched; the reservation becomes the sale      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! At every point, for each product:
//! `product.quantity + reserved(product) == stock before the sale started`.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::inventory::Inventory;
use crate::money::Money;
use crate::types::SaleLineItem;
use crate::MAX_AMOUNT;

/// Phase of the in-progress sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalePhase {
    /// No lines.
    Empty,
    /// At least one line reserved.
    Building,
}

/// The in-progress sale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleBuilder {
    lines: Vec<SaleLineItem>,
}

impl SaleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a builder from restored lines.
    ///
    /// Lines must already be reflected in the inventory quantities; no stock
    /// is moved here.
    pub(crate) fn from_lines(lines: Vec<SaleLineItem>) -> Self {
        SaleBuilder { lines }
    }

    /// Reserves one unit of `product_id`.
    ///
    /// ## Behavior
    /// - Existing line: quantity + 1, frozen name/price kept
    /// - New line: appended with quantity 1 and the product's current name/price
    /// - The product's shelf quantity drops by 1
    ///
    /// ## Errors
    /// - `ProductNotFound` if the id is unknown
    /// - `OutOfStock` if the product has no units left
    /// - `Validation(OutOfRange)` if the sale total would pass [`MAX_AMOUNT`]
    pub fn add_line(&mut self, inventory: &mut Inventory, product_id: &str) -> CoreResult<&SaleLineItem> {
        let product = inventory
            .get_mut(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        if product.quantity <= 0 {
            return Err(CoreError::OutOfStock {
                product_id: product.id.clone(),
                name: product.name.clone(),
            });
        }

        let unit_price = self
            .line(product_id)
            .map_or(product.price, |l| l.price);
        let within_limit = self
            .checked_total()
            .and_then(|t| t.checked_add(unit_price))
            .is_some_and(|t| t.units() <= MAX_AMOUNT);
        if !within_limit {
            return Err(ValidationError::OutOfRange {
                field: "sale total".to_string(),
                min: 0,
                max: MAX_AMOUNT,
            }
            .into());
        }

        let idx = match self.lines.iter().position(|l| l.product_id == product_id) {
            Some(idx) => {
                self.lines[idx].quantity += 1;
                idx
            }
            None => {
                self.lines.push(SaleLineItem::from_product(product));
                self.lines.len() - 1
            }
        };
        product.quantity -= 1;

        debug!(
            product_id = %product_id,
            line_quantity = self.lines[idx].quantity,
            shelf_quantity = product.quantity,
            "Unit reserved"
        );
        Ok(&self.lines[idx])
    }

    /// Releases one unit of `product_id` back to the shelf.
    ///
    /// Returns `false` (and changes nothing) when the sale has no such line.
    pub fn remove_line(&mut self, inventory: &mut Inventory, product_id: &str) -> bool {
        let Some(idx) = self.lines.iter().position(|l| l.product_id == product_id) else {
            return false;
        };

        if self.lines[idx].quantity > 1 {
            self.lines[idx].quantity -= 1;
        } else {
            self.lines.remove(idx);
        }
        release(inventory, product_id, 1);

        debug!(product_id = %product_id, "Unit released");
        true
    }

    /// Returns every reserved unit to its product and empties the sale.
    ///
    /// Returns the number of units released.
    pub fn abandon(&mut self, inventory: &mut Inventory) -> i64 {
        let mut released = 0;
        for line in self.lines.drain(..) {
            release(inventory, &line.product_id, line.quantity);
            released += line.quantity;
        }
        released
    }

    /// Hands the lines over to a completed sale, leaving the builder empty.
    ///
    /// Stock is not touched: the reservation *is* the sale's stock effect.
    pub(crate) fn take_lines(&mut self) -> Vec<SaleLineItem> {
        std::mem::take(&mut self.lines)
    }

    /// Σ price × quantity over the frozen line prices.
    ///
    /// `add_line` keeps this at or below [`MAX_AMOUNT`].
    pub fn total(&self) -> Money {
        self.lines.iter().map(SaleLineItem::line_total).sum()
    }

    /// Same as [`SaleBuilder::total`], `None` if the sum overflows.
    fn checked_total(&self) -> Option<Money> {
        self.lines.iter().try_fold(Money::zero(), |acc, l| {
            acc.checked_add(l.price.checked_mul(l.quantity)?)
        })
    }

    /// Units of `product_id` currently reserved (0 if no line).
    pub fn reserved(&self, product_id: &str) -> i64 {
        self.line(product_id).map_or(0, |l| l.quantity)
    }

    pub fn line(&self, product_id: &str) -> Option<&SaleLineItem> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    pub fn lines(&self) -> &[SaleLineItem] {
        &self.lines
    }

    pub fn phase(&self) -> SalePhase {
        if self.lines.is_empty() {
            SalePhase::Empty
        } else {
            SalePhase::Building
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total reserved units across all lines.
    pub fn unit_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

fn release(inventory: &mut Inventory, product_id: &str, units: i64) {
    match inventory.get_mut(product_id) {
        Some(product) => product.quantity = product.quantity.saturating_add(units),
        None => warn!(
            product_id = %product_id,
            units,
            "Reserved product no longer in inventory, units not restored"
        ),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
