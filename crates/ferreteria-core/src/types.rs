//! # Domain Types
//!
//! Plain data shared by every store.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  SaleLineItem   │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  product_id     │   │  id             │       │
//! │  │  name           │   │  name  (frozen) │──►│  items          │       │
//! │  │  price          │   │  price (frozen) │   │  total          │       │
//! │  │  quantity       │   │  quantity ≥ 1   │   │  payment_method │       │
//! │  └─────────────────┘   └─────────────────┘   │  date, change   │       │
//! │                                               └─────────────────┘       │
//! │  ┌─────────────────┐                                                    │
//! │  │ PaymentMethod   │  efectivo | tarjeta | transferencia               │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Field names are camelCase and payment methods keep their Spanish names so
//! that snapshots written by the browser front-end load unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_AMOUNT, MAX_PRICE};

/// Generates a fresh entity id (UUID v4).
///
/// Ids are opaque strings: snapshots from older front-ends carry ids such
/// as `"1"` or millisecond timestamps and are accepted as-is.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Product
// =============================================================================

/// A product in the inventory.
///
/// ## Invariants
/// - `name` is non-empty
/// - `price` > 0
/// - `quantity` ≥ 0; it already excludes units reserved by the current sale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique, stable identifier.
    pub id: String,

    /// Display name shown to the cashier.
    pub name: String,

    /// Unit price.
    pub price: Money,

    /// Units available on the shelf.
    pub quantity: i64,
}

impl Product {
    /// Whether at least one unit can still be added to a sale.
    #[inline]
    pub fn is_available(&self) -> bool {
        self.quantity > 0
    }

    /// Whether the name contains `needle`, which must already be lowercase.
    pub(crate) fn name_matches(&self, needle: &str) -> bool {
        needle.is_empty() || self.name.to_lowercase().contains(needle)
    }

    /// Checks the invariants listed on the type.
    pub fn is_well_formed(&self) -> bool {
        !self.id.is_empty()
            && !self.name.trim().is_empty()
            && self.price.is_positive()
            && self.price.units() <= MAX_PRICE
            && self.quantity >= 0
    }
}

/// Partial edit of a product. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<Money>,
    pub quantity: Option<i64>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.quantity.is_none()
    }
}

// =============================================================================
// Sale Line Item
// =============================================================================

/// One line of the in-progress sale (and, once completed, of a ledger entry).
///
/// Uses the snapshot pattern: `name` and `price` are copied from the
/// product when the line is created and never re-read afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleLineItem {
    pub product_id: String,
    /// Product name at time of adding (frozen).
    pub name: String,
    /// Unit price at time of adding (frozen).
    pub price: Money,
    /// Units reserved by this line; always ≥ 1 while the line exists.
    pub quantity: i64,
}

impl SaleLineItem {
    /// Creates a one-unit line from the product's current name and price.
    pub fn from_product(product: &Product) -> Self {
        SaleLineItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            quantity: 1,
        }
    }

    /// price × quantity using the frozen price.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer paid. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PaymentMethod {
    /// Physical cash; the only method that yields change.
    #[default]
    #[serde(rename = "efectivo")]
    Cash,
    /// Card on an external terminal.
    #[serde(rename = "tarjeta")]
    Card,
    /// Bank transfer.
    #[serde(rename = "transferencia")]
    Transfer,
}

impl PaymentMethod {
    /// All methods, in the order the front-end shows them.
    pub const ALL: [PaymentMethod; 3] =
        [PaymentMethod::Cash, PaymentMethod::Card, PaymentMethod::Transfer];

    #[inline]
    pub fn is_cash(&self) -> bool {
        matches!(self, PaymentMethod::Cash)
    }

    /// Wire name, as stored in snapshots.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "efectivo",
            PaymentMethod::Card => "tarjeta",
            PaymentMethod::Transfer => "transferencia",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "efectivo" | "cash" => Ok(PaymentMethod::Cash),
            "tarjeta" | "card" => Ok(PaymentMethod::Card),
            "transferencia" | "transfer" => Ok(PaymentMethod::Transfer),
            _ => Err(ValidationError::NotAllowed {
                field: "payment method".to_string(),
                allowed: PaymentMethod::ALL
                    .iter()
                    .map(|m| m.as_str().to_string())
                    .collect(),
            }),
        }
    }
}

// =============================================================================
// Sale (ledger entry)
// =============================================================================

/// A completed sale. Immutable once appended to the ledger.
///
/// ## Invariants
/// - `total` = Σ item.price × item.quantity
/// - `change` is `Some` only for cash, and then equals cash received − total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub items: Vec<SaleLineItem>,
    pub total: Money,
    pub payment_method: PaymentMethod,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub change: Option<Money>,
}

impl Sale {
    /// Total number of units sold.
    pub fn unit_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// One-line description for the history table: `Martillo (3), Clavos (1kg) (2)`.
    pub fn summary(&self) -> String {
        self.items
            .iter()
            .map(|i| format!("{} ({})", i.name, i.quantity))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Recomputes the total from the frozen line prices.
    pub fn items_total(&self) -> Money {
        self.items.iter().map(SaleLineItem::line_total).sum()
    }

    /// Checks the invariants listed on the type, returning the first one
    /// that does not hold.
    pub fn check(&self) -> Result<(), &'static str> {
        if self.items.is_empty() {
            return Err("sale has no items");
        }
        if self
            .items
            .iter()
            .any(|i| i.quantity < 1 || !i.price.is_positive())
        {
            return Err("item with non-positive price or quantity");
        }
        if self.total.is_negative() || self.total.units() > MAX_AMOUNT {
            return Err("total out of range");
        }
        let items_total = self.items.iter().try_fold(Money::zero(), |acc, i| {
            acc.checked_add(i.price.checked_mul(i.quantity)?)
        });
        if items_total != Some(self.total) {
            return Err("total does not match items");
        }
        match (self.payment_method.is_cash(), self.change) {
            (true, Some(change)) if change.is_negative() => Err("negative change"),
            (false, Some(_)) => Err("change recorded on a non-cash sale"),
            _ => Ok(()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn hammer() -> Product {
        Product {
            id: "1".to_string(),
            name: "Martillo".to_string(),
            price: Money::from_units(10_000),
            quantity: 20,
        }
    }

    #[test]
    fn test_line_item_freezes_product_data() {
        let mut product = hammer();
        let line = SaleLineItem::from_product(&product);
        product.price = Money::from_units(99_999);
        product.name = "Martillo Pro".to_string();

        assert_eq!(line.name, "Martillo");
        assert_eq!(line.price.units(), 10_000);
        assert_eq!(line.quantity, 1);
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("efectivo".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!("Cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!("tarjeta".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!(
            "transferencia".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::Transfer
        );
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_payment_method_wire_names() {
        let json = serde_json::to_string(&PaymentMethod::Transfer).unwrap();
        assert_eq!(json, "\"transferencia\"");
        let back: PaymentMethod = serde_json::from_str("\"efectivo\"").unwrap();
        assert!(back.is_cash());
    }

    #[test]
    fn test_sale_wire_format() {
        let sale = Sale {
            id: "s1".to_string(),
            items: vec![SaleLineItem {
                quantity: 3,
                ..SaleLineItem::from_product(&hammer())
            }],
            total: Money::from_units(30_000),
            payment_method: PaymentMethod::Card,
            date: "2024-03-01T15:04:05.000Z".parse().unwrap(),
            change: None,
        };

        let value = serde_json::to_value(&sale).unwrap();
        assert_eq!(value["paymentMethod"], "tarjeta");
        assert_eq!(value["items"][0]["productId"], "1");
        assert_eq!(value["total"], 30_000);
        assert!(value.get("change").is_none());

        let back: Sale = serde_json::from_value(value).unwrap();
        assert_eq!(back, sale);
    }

    fn hammer_sale() -> Sale {
        Sale {
            id: "s1".to_string(),
            items: vec![SaleLineItem {
                quantity: 3,
                ..SaleLineItem::from_product(&hammer())
            }],
            total: Money::from_units(30_000),
            payment_method: PaymentMethod::Cash,
            date: Utc::now(),
            change: Some(Money::zero()),
        }
    }

    #[test]
    fn test_sale_check() {
        assert_eq!(hammer_sale().check(), Ok(()));
        assert_eq!(
            Sale { change: None, payment_method: PaymentMethod::Card, ..hammer_sale() }.check(),
            Ok(())
        );

        let bad = [
            Sale { total: Money::from_units(-30_000), ..hammer_sale() },
            Sale { total: Money::from_units(29_999), ..hammer_sale() },
            Sale { payment_method: PaymentMethod::Transfer, ..hammer_sale() },
            Sale { change: Some(Money::from_units(-1)), ..hammer_sale() },
            Sale { items: Vec::new(), total: Money::zero(), ..hammer_sale() },
        ];
        for sale in bad {
            assert!(sale.check().is_err(), "{:?}", sale);
        }

        let mut huge = hammer_sale();
        huge.items[0].price = Money::from_units(i64::MAX);
        huge.total = Money::from_units(i64::MAX);
        assert!(huge.check().is_err());
    }

    #[test]
    fn test_sale_summary() {
        let sale = Sale {
            id: "s1".to_string(),
            items: vec![
                SaleLineItem {
                    quantity: 3,
                    ..SaleLineItem::from_product(&hammer())
                },
                SaleLineItem {
                    product_id: "3".to_string(),
                    name: "Clavos (1kg)".to_string(),
                    price: Money::from_units(100),
                    quantity: 2,
                },
            ],
            total: Money::from_units(30_200),
            payment_method: PaymentMethod::Cash,
            date: Utc::now(),
            change: Some(Money::zero()),
        };

        assert_eq!(sale.summary(), "Martillo (3), Clavos (1kg) (2)");
        assert_eq!(sale.unit_count(), 5);
        assert_eq!(sale.items_total(), sale.total);
    }

    #[test]
    fn test_product_well_formed() {
        assert!(hammer().is_well_formed());
        assert!(!Product { price: Money::zero(), ..hammer() }.is_well_formed());
        assert!(!Product { quantity: -1, ..hammer() }.is_well_formed());
        assert!(!Product { name: " ".to_string(), ..hammer() }.is_well_formed());
        assert!(Product { quantity: 0, ..hammer() }.is_well_formed());
        assert!(!Product { price: Money::from_units(MAX_PRICE + 1), ..hammer() }.is_well_formed());
    }
}
