//! # Error Types
//!
//! Domain-specific error types for ferreteria-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ferreteria-core errors (this file)                                    │
//! │  ├── CoreError        - Transaction model rule violations              │
//! │  └── ValidationError  - Input shape/range failures                     │
//! │                                                                         │
//! │  ferreteria-store errors (separate crate)                              │
//! │  └── StoreError       - Snapshot slot read/write failures              │
//! │                                                                         │
//! │  terminal errors (in app)                                              │
//! │  └── ApiError         - What the front-end sees (serialized)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Front-end notice        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//! Every operation that returns one of these errors has left the inventory,
//! the in-progress sale, the register and the ledger exactly as they were.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised by the transaction model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Input failed validation (empty name, non-positive price, ...).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No product with this id exists in the inventory.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The product has no stock left to reserve.
    ///
    /// ## User Workflow
    /// ```text
    /// Click "Martillo" (stock: 0)
    ///      │
    ///      ▼
    /// OutOfStock { product_id: "1", name: "Martillo" }
    ///      │
    ///      ▼
    /// UI shows: "No stock left for Martillo"
    /// ```
    #[error("No stock left for {name} ({product_id})")]
    OutOfStock { product_id: String, name: String },

    /// The product is reserved by the in-progress sale and cannot be deleted.
    #[error("Product {product_id} is reserved by the current sale ({reserved} units)")]
    ProductReserved { product_id: String, reserved: i64 },

    /// Tried to complete a sale that has no lines.
    #[error("The current sale has no items")]
    EmptySale,

    /// Cash tendered does not cover the sale total.
    #[error("Cash received {received} is less than the total {total}")]
    InsufficientPayment { total: Money, received: Money },

    /// `confirm_reset` was called without a pending `request_reset`.
    #[error("No register reset has been requested")]
    ResetNotRequested,

    /// `confirm_reset` was called with a token from a different request.
    #[error("Reset confirmation token does not match the pending request")]
    ResetTokenMismatch,
}

impl CoreError {
    /// True for errors that are caused by bad user input rather than state.
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any store is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be greater than zero.
    #[error("{field} must be greater than zero")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Value falls outside the accepted range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value is not in the allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::OutOfStock {
            product_id: "1".to_string(),
            name: "Martillo".to_string(),
        };
        assert_eq!(err.to_string(), "No stock left for Martillo (1)");

        let err = CoreError::InsufficientPayment {
            total: Money::from_units(30_000),
            received: Money::from_units(20_000),
        };
        assert_eq!(
            err.to_string(),
            "Cash received $20.000 is less than the total $30.000"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::Negative {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity cannot be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "price".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(core_err.is_validation());
        assert!(!CoreError::EmptySale.is_validation());
    }
}
