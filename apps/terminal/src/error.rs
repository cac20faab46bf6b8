//! # API Error Type
//!
//! Unified error type for terminal commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Ferretería POS                     │
//! │                                                                         │
//! │  Presentation layer          Rust Backend                               │
//! │  ──────────────────          ────────────                               │
//! │                                                                         │
//! │  add_to_sale("1")                                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Rule violated? ─── CoreError::OutOfStock { .. } ──┐            │  │
//! │  │         │                                          ▼            │  │
//! │  │  Slot unreadable? ── StoreError::Io { .. } ────► ApiError ─────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  e.code    = "OUT_OF_STOCK"                                             │
//! │  e.message = "No stock left for Martillo (1)"                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Snapshot *write* failures never reach this type: they are logged and
//! the user operation still succeeds.

use ferreteria_core::CoreError;
use ferreteria_store::StoreError;
use serde::Serialize;

use crate::state::ConfigError;

/// API error returned from terminal commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INSUFFICIENT_PAYMENT",
///   "message": "Cash received $20.000 is less than the total $30.000"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed
    ValidationError,

    /// Product has no units left to reserve
    OutOfStock,

    /// Product is reserved by the current sale
    Conflict,

    /// Completing a sale with no lines
    EmptySale,

    /// Cash received below the total
    InsufficientPayment,

    /// Unknown product id
    NotFound,

    /// Register reset without a matching request
    ResetNotConfirmed,

    /// Snapshot slot could not be read
    StorageError,

    /// Anything else
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::Validation(_) => ErrorCode::ValidationError,
            CoreError::ProductNotFound(_) => ErrorCode::NotFound,
            CoreError::OutOfStock { .. } => ErrorCode::OutOfStock,
            CoreError::ProductReserved { .. } => ErrorCode::Conflict,
            CoreError::EmptySale => ErrorCode::EmptySale,
            CoreError::InsufficientPayment { .. } => ErrorCode::InsufficientPayment,
            CoreError::ResetNotRequested | CoreError::ResetTokenMismatch => {
                ErrorCode::ResetNotConfirmed
            }
        };
        let message = match err {
            CoreError::Validation(e) => e.to_string(),
            other => other.to_string(),
        };
        ApiError::new(code, message)
    }
}

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!("Snapshot store error: {}", err);
        match err {
            StoreError::Io { .. } => {
                ApiError::new(ErrorCode::StorageError, "Could not access saved data")
            }
            StoreError::Corrupt(_) => {
                ApiError::new(ErrorCode::StorageError, "Saved data is unreadable")
            }
            StoreError::Serialization(_) => ApiError::internal("Could not encode state"),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::internal(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use ferreteria_core::{Money, ValidationError};

    #[test]
    fn test_core_error_codes() {
        let cases = [
            (
                CoreError::Validation(ValidationError::Required {
                    field: "name".into(),
                }),
                ErrorCode::ValidationError,
            ),
            (CoreError::ProductNotFound("9".into()), ErrorCode::NotFound),
            (
                CoreError::ProductReserved {
                    product_id: "1".into(),
                    reserved: 2,
                },
                ErrorCode::Conflict,
            ),
            (CoreError::EmptySale, ErrorCode::EmptySale),
            (CoreError::ResetTokenMismatch, ErrorCode::ResetNotConfirmed),
        ];
        for (err, code) in cases {
            assert_eq!(ApiError::from(err).code, code);
        }
    }

    #[test]
    fn test_serialization() {
        let err = ApiError::from(CoreError::InsufficientPayment {
            total: Money::from_units(30_000),
            received: Money::from_units(20_000),
        });
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "INSUFFICIENT_PAYMENT");
        assert_eq!(
            json["message"],
            "Cash received $20.000 is less than the total $30.000"
        );
    }

    #[test]
    fn test_validation_message_is_unwrapped() {
        let err = ApiError::from(CoreError::Validation(ValidationError::MustBePositive {
            field: "price".into(),
        }));
        assert_eq!(err.message, "price must be greater than zero");
    }
}
