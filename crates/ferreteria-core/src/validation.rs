//! # Validation Module
//!
//! Input validation for inventory operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Front-end form                                               │
//! │  └── Immediate feedback (empty name, price field)                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Range rules, run before any store is mutated                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: PosState                                                     │
//! │  └── Cross-store rules (reservation, stock, payment)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ferreteria_core::validation::{validate_price, validate_product_name};
//! use ferreteria_core::Money;
//!
//! assert!(validate_product_name("Martillo").is_ok());
//! assert!(validate_price(Money::from_units(0)).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_AMOUNT, MAX_PRICE, MAX_PRODUCT_NAME_LEN, MAX_STOCK};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty or whitespace only
/// - At most 120 characters after trimming
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price.
///
/// ## Rules
/// - Strictly positive
/// - At most [`MAX_PRICE`]
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    if price.units() > MAX_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 1,
            max: MAX_PRICE,
        });
    }

    Ok(())
}

/// Validates the stock a new product is created with.
///
/// ## Rules
/// A product must enter the catalog with at least one unit and at most
/// [`MAX_STOCK`]. Later edits may bring it down to zero (see
/// [`validate_stock_level`]).
pub fn validate_initial_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    validate_stock_level(qty)
}

/// Validates a stock level set by an edit. Zero is allowed.
pub fn validate_stock_level(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_STOCK {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 0,
            max: MAX_STOCK,
        });
    }

    Ok(())
}

/// Validates a money amount such as tendered cash or an opening balance.
///
/// ## Rules
/// - Not negative
/// - At most [`MAX_AMOUNT`]
///
/// ## User Workflow
/// ```text
/// Cashier types "cash received: -5000"
///      │
///      ▼
/// validate_amount("cash received", -5000)
///      │
///      └── Error: "cash received cannot be negative"
/// ```
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    if amount.units() > MAX_AMOUNT {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_AMOUNT,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Clavos (1kg)").is_ok());
        assert!(validate_product_name("  Pintura Blanca  ").is_ok());

        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(MAX_PRODUCT_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::from_units(1)).is_ok());
        assert!(validate_price(Money::from_units(0)).is_err());
        assert!(validate_price(Money::from_units(-100)).is_err());

        assert!(validate_price(Money::from_units(MAX_PRICE)).is_ok());
        assert!(matches!(
            validate_price(Money::from_units(i64::MAX / 2 + 1)),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_quantities() {
        assert!(validate_initial_quantity(1).is_ok());
        assert!(validate_initial_quantity(0).is_err());
        assert!(validate_initial_quantity(-3).is_err());

        assert!(validate_stock_level(0).is_ok());
        assert!(validate_stock_level(12).is_ok());
        assert!(validate_stock_level(-1).is_err());

        assert!(validate_stock_level(MAX_STOCK).is_ok());
        assert!(validate_stock_level(i64::MAX).is_err());
        assert!(validate_initial_quantity(MAX_STOCK + 1).is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount("cash received", Money::zero()).is_ok());
        assert!(validate_amount("cash received", Money::from_units(MAX_AMOUNT)).is_ok());

        let err = validate_amount("cash received", Money::from_units(i64::MIN)).unwrap_err();
        assert_eq!(err.to_string(), "cash received cannot be negative");
        assert!(matches!(
            validate_amount("opening balance", Money::from_units(i64::MAX)),
            Err(ValidationError::OutOfRange { .. })
        ));
    }
}
