//! # Snapshot
//!
//! The serialized form of [`PosState`] kept in the durable slot.
//!
//! ## Layout
//! ```text
//! {
//!   "products":     [ { "id", "name", "price", "quantity" }, ... ],
//!   "sales":        [ { "id", "items", "total", "paymentMethod", "date", "change"? }, ... ],
//!   "cashRegister": { "initialAmount", "currentAmount", "salesTotal" },
//!   "currentSale":  [ { "productId", "name", "price", "quantity" }, ... ]   (optional)
//! }
//! ```
//!
//! ## Tolerant Decoding
//! ```text
//! blob ──► JSON object? ──no──► SnapshotError::NotAnObject (caller uses defaults)
//!               │ yes
//!               ▼
//!   per field:  missing / wrong shape ──► default + SnapshotIssue
//!   per entry:  undecodable / invalid ──► dropped  + SnapshotIssue
//!               │
//!               ▼
//!   PosState::restore: rebuild register from ledger if they disagree,
//!                      drop sale lines for products that are gone,
//!                      drop the whole sale if products fell back to defaults
//! ```
//!
//! Decoding never fails on content, only on shape: a damaged slot costs the
//! damaged entries, not the whole day.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::inventory::Inventory;
use crate::ledger::SalesLedger;
use crate::register::CashRegister;
use crate::sale::SaleBuilder;
use crate::state::PosState;
use crate::types::{Product, Sale, SaleLineItem};

// =============================================================================
// Errors & Issues
// =============================================================================

/// The blob could not be used at all.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot is not a JSON object")]
    NotAnObject,

    #[error("Snapshot JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Something in the blob was repaired or discarded during restore.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotIssue {
    #[error("field `{field}` missing, using default")]
    MissingField { field: &'static str },

    #[error("field `{field}` malformed ({reason}), using default")]
    MalformedField { field: &'static str, reason: String },

    #[error("dropped {field}[{index}]: {reason}")]
    DroppedEntry {
        field: &'static str,
        index: usize,
        reason: String,
    },

    #[error("in-progress sale of {lines} lines discarded: products were not restored")]
    SaleDiscarded { lines: usize },

    #[error("snapshot discarded ({reason}), using defaults")]
    BlobDiscarded { reason: String },

    #[error("cash register disagreed with the ledger and was rebuilt")]
    RegisterRebuilt {
        stored: CashRegister,
        rebuilt: CashRegister,
    },
}

// =============================================================================
// Snapshot DTO
// =============================================================================

/// Full persisted state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub products: Vec<Product>,
    pub sales: Vec<Sale>,
    pub cash_register: CashRegister,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub current_sale: Vec<SaleLineItem>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes each top-level field on its own. See the module docs.
    ///
    /// Fields that are missing or malformed come back as `None` so that
    /// [`PosState::restore`] can substitute the caller's defaults.
    pub fn decode_lenient(blob: &str) -> Result<DecodedSnapshot, SnapshotError> {
        let root: Value = serde_json::from_str(blob).map_err(|_| SnapshotError::NotAnObject)?;
        let Value::Object(root) = root else {
            return Err(SnapshotError::NotAnObject);
        };

        let mut issues = Vec::new();

        let products = decode_list::<Product>(&root, "products", &mut issues).map(|entries| {
            let mut seen = HashSet::new();
            entries
                .into_iter()
                .filter_map(|(index, product)| {
                    if !product.is_well_formed() {
                        issues.push(dropped("products", index, "violates product invariants"));
                        None
                    } else if !seen.insert(product.id.clone()) {
                        issues.push(dropped("products", index, "duplicate id"));
                        None
                    } else {
                        Some(product)
                    }
                })
                .collect::<Vec<_>>()
        });

        let sales = decode_list::<Sale>(&root, "sales", &mut issues).map(|entries| {
            entries
                .into_iter()
                .filter_map(|(index, sale)| match sale.check() {
                    Ok(()) => Some(sale),
                    Err(reason) => {
                        issues.push(dropped("sales", index, reason));
                        None
                    }
                })
                .collect::<Vec<_>>()
        });

        let cash_register = match root.get("cashRegister") {
            None => {
                issues.push(SnapshotIssue::MissingField {
                    field: "cashRegister",
                });
                None
            }
            Some(value) => match serde_json::from_value::<CashRegister>(value.clone()) {
                Ok(register) => Some(register),
                Err(e) => {
                    issues.push(SnapshotIssue::MalformedField {
                        field: "cashRegister",
                        reason: e.to_string(),
                    });
                    None
                }
            },
        };

        // Optional: absent simply means no sale was in progress.
        let current_sale = if root.contains_key("currentSale") {
            decode_list::<SaleLineItem>(&root, "currentSale", &mut issues)
                .map(|entries| entries.into_iter().map(|(_, line)| line).collect())
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        Ok(DecodedSnapshot {
            products,
            sales,
            cash_register,
            current_sale,
            issues,
        })
    }
}

/// Result of [`Snapshot::decode_lenient`]. `None` means "use the default".
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSnapshot {
    pub products: Option<Vec<Product>>,
    pub sales: Option<Vec<Sale>>,
    pub cash_register: Option<CashRegister>,
    pub current_sale: Vec<SaleLineItem>,
    pub issues: Vec<SnapshotIssue>,
}

impl From<Snapshot> for DecodedSnapshot {
    fn from(s: Snapshot) -> Self {
        DecodedSnapshot {
            products: Some(s.products),
            sales: Some(s.sales),
            cash_register: Some(s.cash_register),
            current_sale: s.current_sale,
            issues: Vec::new(),
        }
    }
}

fn dropped(field: &'static str, index: usize, reason: impl Into<String>) -> SnapshotIssue {
    SnapshotIssue::DroppedEntry {
        field,
        index,
        reason: reason.into(),
    }
}

/// Decodes `root[field]` as an array, keeping the entries that parse.
fn decode_list<T: DeserializeOwned>(
    root: &Map<String, Value>,
    field: &'static str,
    issues: &mut Vec<SnapshotIssue>,
) -> Option<Vec<(usize, T)>> {
    let Some(value) = root.get(field) else {
        issues.push(SnapshotIssue::MissingField { field });
        return None;
    };
    let Some(array) = value.as_array() else {
        issues.push(SnapshotIssue::MalformedField {
            field,
            reason: "not an array".to_string(),
        });
        return None;
    };

    let mut out = Vec::with_capacity(array.len());
    for (index, entry) in array.iter().enumerate() {
        match serde_json::from_value::<T>(entry.clone()) {
            Ok(item) => out.push((index, item)),
            Err(e) => issues.push(dropped(field, index, e.to_string())),
        }
    }
    Some(out)
}

// =============================================================================
// PosState <-> Snapshot
// =============================================================================

impl PosState {
    /// Captures the full persisted state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            products: self.inventory.products().to_vec(),
            sales: self.ledger.history().to_vec(),
            cash_register: self.register,
            current_sale: self.sale.lines().to_vec(),
        }
    }

    /// Rebuilds a state from a decoded snapshot.
    ///
    /// Fields the snapshot lacks are taken from `defaults`. Afterwards the
    /// cross-store invariants are repaired and every repair is reported:
    /// - the register is recomputed from its `initial_amount` and the
    ///   ledger total when the two disagree
    /// - sale lines for unknown products, duplicate lines and lines with
    ///   quantity < 1 are dropped
    /// - when the products themselves came from `defaults`, the whole
    ///   in-progress sale is dropped: the default catalog never had those
    ///   units taken off the shelf
    pub fn restore(decoded: DecodedSnapshot, defaults: PosState) -> (PosState, Vec<SnapshotIssue>) {
        let DecodedSnapshot {
            products,
            sales,
            cash_register,
            current_sale,
            mut issues,
        } = decoded;

        let products_restored = products.is_some();
        let inventory = products
            .map(Inventory::from_products)
            .unwrap_or(defaults.inventory);
        let ledger = sales.map(SalesLedger::from_sales).unwrap_or(defaults.ledger);
        let stored = cash_register.unwrap_or(defaults.register);

        let ledger_total = ledger.total();
        let register = if stored.is_balanced() && stored.sales_total == ledger_total {
            stored
        } else {
            let rebuilt = CashRegister::recomputed(stored.initial_amount, ledger_total);
            issues.push(SnapshotIssue::RegisterRebuilt { stored, rebuilt });
            rebuilt
        };

        let current_sale = if products_restored || current_sale.is_empty() {
            current_sale
        } else {
            issues.push(SnapshotIssue::SaleDiscarded {
                lines: current_sale.len(),
            });
            Vec::new()
        };

        let mut seen = HashSet::new();
        let lines = current_sale
            .into_iter()
            .enumerate()
            .filter_map(|(index, line)| {
                let reason = if line.quantity < 1 {
                    "quantity below one"
                } else if !inventory.contains(&line.product_id) {
                    "product no longer exists"
                } else if !seen.insert(line.product_id.clone()) {
                    "duplicate line"
                } else {
                    return Some(line);
                };
                issues.push(dropped("currentSale", index, reason));
                None
            })
            .collect();

        for issue in &issues {
            warn!(%issue, "Snapshot repaired during restore");
        }

        let state = PosState::from_parts(inventory, SaleBuilder::from_lines(lines), register, ledger);
        (state, issues)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
