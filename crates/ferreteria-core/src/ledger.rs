//! # Sales Ledger
//!
//! Append-only record of completed sales, oldest first. Entries are never
//! edited; the only way to shrink the ledger is a confirmed register reset.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::Sale;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SalesLedger {
    sales: Vec<Sale>,
}

impl SalesLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_sales(sales: Vec<Sale>) -> Self {
        SalesLedger { sales }
    }

    /// Appends a completed sale.
    pub(crate) fn append(&mut self, sale: Sale) -> &Sale {
        self.sales.push(sale);
        let idx = self.sales.len() - 1;
        &self.sales[idx]
    }

    /// Every sale since the last reset, oldest first.
    pub fn history(&self) -> &[Sale] {
        &self.sales
    }

    pub fn get(&self, sale_id: &str) -> Option<&Sale> {
        self.sales.iter().find(|s| s.id == sale_id)
    }

    /// Σ sale.total; must equal the register's `sales_total`.
    pub fn total(&self) -> Money {
        self.sales.iter().map(|s| s.total).sum()
    }

    pub fn len(&self) -> usize {
        self.sales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }

    /// Drops every entry. Returns how many were removed.
    pub(crate) fn clear(&mut self) -> usize {
        let n = self.sales.len();
        self.sales.clear();
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentMethod;
    use chrono::Utc;

    fn sale(id: &str, total: i64) -> Sale {
        Sale {
            id: id.to_string(),
            items: Vec::new(),
            total: Money::from_units(total),
            payment_method: PaymentMethod::Transfer,
            date: Utc::now(),
            change: None,
        }
    }

    #[test]
    fn test_history_is_ordered_oldest_first() {
        let mut ledger = SalesLedger::new();
        ledger.append(sale("a", 100));
        ledger.append(sale("b", 200));
        ledger.append(sale("c", 300));

        let ids: Vec<_> = ledger.history().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(ledger.total().units(), 600);
        assert_eq!(ledger.get("b").unwrap().total.units(), 200);
    }

    #[test]
    fn test_clear() {
        let mut ledger = SalesLedger::new();
        ledger.append(sale("a", 100));
        ledger.append(sale("b", 200));
        assert_eq!(ledger.clear(), 2);
        assert!(ledger.is_empty());
        assert!(ledger.total().is_zero());
    }
}
