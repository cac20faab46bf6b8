//! # Cash Register
//!
//! Running cash-on-hand tracker, distinct from the ledger of individual
//! sales.
//!
//! ## Arithmetic
//! ```text
//! current_amount == initial_amount + sales_total
//! sales_total    == Σ sale.total over the ledger since the last reset
//!
//! register_sale(t):  current += t, sales_total += t
//! rebase():          initial := current, sales_total := 0
//! ```
//!
//! No balance ever passes [`MAX_AMOUNT`]; a sale that would push the drawer
//! past it is refused before anything changes.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::{DEFAULT_OPENING_BALANCE, MAX_AMOUNT};

/// Register balances. Serialized camelCase as in the snapshot layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CashRegister {
    pub initial_amount: Money,
    pub current_amount: Money,
    pub sales_total: Money,
}

impl CashRegister {
    /// A fresh register holding `opening_balance`.
    pub fn with_opening_balance(opening_balance: Money) -> Self {
        CashRegister {
            initial_amount: opening_balance,
            current_amount: opening_balance,
            sales_total: Money::zero(),
        }
    }

    /// Adds a completed sale's total to the drawer.
    ///
    /// On `Err` the register is unchanged.
    pub fn register_sale(&mut self, total: Money) -> Result<(), ValidationError> {
        let bounded = |m: Money| m.checked_add(total).filter(|v| v.units() <= MAX_AMOUNT);
        match (bounded(self.current_amount), bounded(self.sales_total)) {
            (Some(current), Some(sales)) => {
                self.current_amount = current;
                self.sales_total = sales;
                Ok(())
            }
            _ => Err(ValidationError::OutOfRange {
                field: "drawer balance".to_string(),
                min: 0,
                max: MAX_AMOUNT,
            }),
        }
    }

    /// Starts a new period from the current drawer balance.
    ///
    /// Clearing the ledger is the caller's job; see `PosState::confirm_reset`.
    pub fn rebase(&mut self) {
        self.initial_amount = self.current_amount;
        self.sales_total = Money::zero();
    }

    /// `current == initial + sales_total`.
    pub fn is_balanced(&self) -> bool {
        self.current_amount == self.initial_amount + self.sales_total
    }

    /// Rebuilds the derived figures from the opening balance and a ledger total.
    pub fn recomputed(initial_amount: Money, sales_total: Money) -> Self {
        CashRegister {
            initial_amount,
            current_amount: initial_amount + sales_total,
            sales_total,
        }
    }
}

impl Default for CashRegister {
    fn default() -> Self {
        CashRegister::with_opening_balance(Money::from_units(DEFAULT_OPENING_BALANCE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_opening_balance() {
        let reg = CashRegister::default();
        assert_eq!(reg.initial_amount.units(), 100_000);
        assert_eq!(reg.current_amount.units(), 100_000);
        assert!(reg.sales_total.is_zero());
        assert!(reg.is_balanced());
    }

    #[test]
    fn test_register_sale_then_rebase() {
        let mut reg = CashRegister::default();
        reg.register_sale(Money::from_units(30_000)).unwrap();
        reg.register_sale(Money::from_units(20_000)).unwrap();
        assert_eq!(reg.current_amount.units(), 150_000);
        assert_eq!(reg.sales_total.units(), 50_000);
        assert!(reg.is_balanced());

        reg.rebase();
        assert_eq!(reg.initial_amount.units(), 150_000);
        assert_eq!(reg.current_amount.units(), 150_000);
        assert!(reg.sales_total.is_zero());
    }

    #[test]
    fn test_wire_format() {
        let value = serde_json::to_value(CashRegister::default()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "initialAmount": 100000,
                "currentAmount": 100000,
                "salesTotal": 0
            })
        );
    }

    #[test]
    fn test_register_sale_refuses_to_pass_max_amount() {
        let mut reg = CashRegister::with_opening_balance(Money::from_units(MAX_AMOUNT - 10));
        assert!(reg.register_sale(Money::from_units(11)).is_err());
        assert_eq!(reg.current_amount.units(), MAX_AMOUNT - 10);
        assert!(reg.sales_total.is_zero());

        reg.register_sale(Money::from_units(10)).unwrap();
        assert_eq!(reg.current_amount.units(), MAX_AMOUNT);
        assert!(reg.is_balanced());

        let mut reg = CashRegister::default();
        assert!(reg.register_sale(Money::from_units(i64::MAX)).is_err());
        assert!(reg.is_balanced());
    }
}
