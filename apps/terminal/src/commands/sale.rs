//! # Sale Commands
//!
//! Sales tab: build the current sale, preview the payment, settle it.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Checkout Flow                                     │
//! │                                                                         │
//! │  add_to_sale("1") ×3 ──► SaleView { total: $30.000 }                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  payment_preview("efectivo", 20000)                                     │
//! │       │    shortfall $10.000, canComplete = false ──► button disabled   │
//! │       ▼                                                                 │
//! │  payment_preview("efectivo", 30000)                                     │
//! │       │    change $0, canComplete = true                                │
//! │       ▼                                                                 │
//! │  complete_sale("efectivo", 30000) ──► ReceiptResponse                   │
//! │                                                                         │
//! │  abandon_sale() at any point returns every reserved unit to stock.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::product::unexpected;
use crate::error::ApiError;
use crate::state::{TerminalConfig, TerminalState};
use ferreteria_core::validation::validate_amount;
use ferreteria_core::{Command, Money, Outcome, PaymentMethod, Sale, SaleBuilder, SalePhase};

/// One line of the current sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineDto {
    pub product_id: String,
    pub name: String,
    pub price: Money,
    pub quantity: i64,
    pub line_total: Money,
    pub line_total_display: String,
}

/// The current sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleView {
    pub items: Vec<SaleLineDto>,
    pub total: Money,
    pub total_display: String,
    pub unit_count: i64,
    pub phase: SalePhase,
}

impl SaleView {
    fn new(sale: &SaleBuilder, config: &TerminalConfig) -> Self {
        let total = sale.total();
        SaleView {
            items: sale
                .lines()
                .iter()
                .map(|l| SaleLineDto {
                    product_id: l.product_id.clone(),
                    name: l.name.clone(),
                    price: l.price,
                    quantity: l.quantity,
                    line_total: l.line_total(),
                    line_total_display: config.format_currency(l.line_total()),
                })
                .collect(),
            total,
            total_display: config.format_currency(total),
            unit_count: sale.unit_count(),
            phase: sale.phase(),
        }
    }
}

/// Whether the current sale can be settled with the given payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPreview {
    pub payment_method: PaymentMethod,
    pub total: Money,
    /// Cash payments only; zero while short.
    pub change: Option<Money>,
    /// Cash still missing; zero for card and transfer.
    pub shortfall: Money,
    pub can_complete: bool,
}

/// Input of the "complete sale" action.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteSaleInput {
    pub payment_method: String,
    pub cash_received: Option<i64>,
}

/// A completed sale plus display strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptResponse {
    pub sale: Sale,
    pub summary: String,
    pub total_display: String,
    pub change_display: Option<String>,
}

/// Units released by `abandon_sale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbandonResponse {
    pub units_released: i64,
}

fn parse_method(method: &str) -> Result<PaymentMethod, ApiError> {
    method
        .parse::<PaymentMethod>()
        .map_err(|e| ApiError::validation(e.to_string()))
}

fn current_view(state: &TerminalState) -> SaleView {
    let config = state.config();
    state.with_state(|pos| SaleView::new(pos.current_sale(), config))
}

pub fn get_sale(state: &TerminalState) -> Result<SaleView, ApiError> {
    debug!("get_sale command");
    Ok(current_view(state))
}

/// Reserves one unit of `product_id`.
pub fn add_to_sale(state: &TerminalState, product_id: &str) -> Result<SaleView, ApiError> {
    debug!(product_id = %product_id, "add_to_sale command");
    state.execute(Command::AddLine {
        product_id: product_id.to_string(),
    })?;
    Ok(current_view(state))
}

/// Releases one unit of `product_id`. Not an error if it is not in the sale.
pub fn remove_from_sale(state: &TerminalState, product_id: &str) -> Result<SaleView, ApiError> {
    debug!(product_id = %product_id, "remove_from_sale command");
    state.execute(Command::RemoveLine {
        product_id: product_id.to_string(),
    })?;
    Ok(current_view(state))
}

pub fn abandon_sale(state: &TerminalState) -> Result<AbandonResponse, ApiError> {
    debug!("abandon_sale command");
    match state.execute(Command::AbandonSale)? {
        Outcome::SaleAbandoned { units_released } => Ok(AbandonResponse { units_released }),
        other => Err(unexpected(other)),
    }
}

/// Evaluates the payment constraint without changing anything.
///
/// Negative or out-of-range tendered cash is a `VALIDATION_ERROR`.
pub fn payment_preview(
    state: &TerminalState,
    method: &str,
    cash_received: Option<i64>,
) -> Result<PaymentPreview, ApiError> {
    let payment_method = parse_method(method)?;
    let (total, has_items) =
        state.with_state(|pos| (pos.sale_total(), !pos.current_sale().is_empty()));

    let preview = if payment_method.is_cash() {
        let received = Money::from_units(cash_received.unwrap_or(0));
        validate_amount("cash received", received)
            .map_err(|e| ApiError::validation(e.to_string()))?;
        let shortfall = total.saturating_shortfall(received);
        PaymentPreview {
            payment_method,
            total,
            change: Some(if shortfall.is_zero() {
                received - total
            } else {
                Money::zero()
            }),
            shortfall,
            can_complete: has_items && shortfall.is_zero(),
        }
    } else {
        PaymentPreview {
            payment_method,
            total,
            change: None,
            shortfall: Money::zero(),
            can_complete: has_items,
        }
    };
    Ok(preview)
}

/// Settles the current sale.
pub fn complete_sale(
    state: &TerminalState,
    input: CompleteSaleInput,
) -> Result<ReceiptResponse, ApiError> {
    debug!(method = %input.payment_method, "complete_sale command");
    let payment_method = parse_method(&input.payment_method)?;

    let sale = match state.execute(Command::CompleteSale {
        payment_method,
        cash_received: input.cash_received.map(Money::from_units),
    })? {
        Outcome::SaleCompleted(sale) => sale,
        other => return Err(unexpected(other)),
    };

    let config = state.config();
    info!(sale_id = %sale.id, total = %config.format_currency(sale.total), "Receipt ready");
    Ok(ReceiptResponse {
        summary: sale.summary(),
        total_display: config.format_currency(sale.total),
        change_display: sale.change.map(|c| config.format_currency(c)),
        sale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::terminal;
    use crate::error::ErrorCode;

    fn cash(amount: i64) -> CompleteSaleInput {
        CompleteSaleInput {
            payment_method: "efectivo".into(),
            cash_received: Some(amount),
        }
    }

    #[test]
    fn test_build_sale() {
        let state = terminal();
        add_to_sale(&state, "1").unwrap();
        add_to_sale(&state, "3").unwrap();
        let view = add_to_sale(&state, "1").unwrap();

        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items[0].quantity, 2);
        assert_eq!(view.total_display, "$20.100");
        assert_eq!(view.unit_count, 3);
        assert_eq!(view.phase, SalePhase::Building);
    }

    #[test]
    fn test_unknown_and_empty_products() {
        let state = terminal();
        assert_eq!(
            add_to_sale(&state, "99").unwrap_err().code,
            ErrorCode::NotFound
        );

        crate::commands::product::update_product(
            &state,
            "2",
            ferreteria_core::ProductUpdate {
                quantity: Some(0),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(
            add_to_sale(&state, "2").unwrap_err().code,
            ErrorCode::OutOfStock
        );
    }

    #[test]
    fn test_remove_missing_line_is_noop() {
        let state = terminal();
        let view = remove_from_sale(&state, "1").unwrap();
        assert!(view.items.is_empty());
        assert_eq!(view.phase, SalePhase::Empty);
    }

    #[test]
    fn test_payment_preview_cash() {
        let state = terminal();
        for _ in 0..3 {
            add_to_sale(&state, "1").unwrap();
        }

        let short = payment_preview(&state, "efectivo", Some(20_000)).unwrap();
        assert!(!short.can_complete);
        assert_eq!(short.shortfall.units(), 10_000);
        assert_eq!(short.change, Some(Money::zero()));

        let exact = payment_preview(&state, "cash", Some(35_000)).unwrap();
        assert!(exact.can_complete);
        assert_eq!(exact.change, Some(Money::from_units(5_000)));
    }

    #[test]
    fn test_negative_cash_is_a_validation_error() {
        let state = terminal();
        add_to_sale(&state, "1").unwrap();

        for amount in [-1, i64::MIN] {
            assert_eq!(
                payment_preview(&state, "efectivo", Some(amount))
                    .unwrap_err()
                    .code,
                ErrorCode::ValidationError
            );
            assert_eq!(
                complete_sale(&state, cash(amount)).unwrap_err().code,
                ErrorCode::ValidationError
            );
        }
        assert_eq!(get_sale(&state).unwrap().unit_count, 1);
    }

    #[test]
    fn test_payment_preview_card_and_empty_sale() {
        let state = terminal();
        let empty = payment_preview(&state, "tarjeta", None).unwrap();
        assert!(!empty.can_complete);

        add_to_sale(&state, "2").unwrap();
        let card = payment_preview(&state, "tarjeta", None).unwrap();
        assert!(card.can_complete);
        assert_eq!(card.change, None);

        assert_eq!(
            payment_preview(&state, "cheque", None).unwrap_err().code,
            ErrorCode::ValidationError
        );
    }

    #[test]
    fn test_complete_cash_sale() {
        let state = terminal();
        for _ in 0..3 {
            add_to_sale(&state, "1").unwrap();
        }

        let err = complete_sale(&state, cash(20_000)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientPayment);
        assert_eq!(get_sale(&state).unwrap().unit_count, 3);

        let receipt = complete_sale(&state, cash(30_000)).unwrap();
        assert_eq!(receipt.summary, "Martillo (3)");
        assert_eq!(receipt.total_display, "$30.000");
        assert_eq!(receipt.change_display.as_deref(), Some("$0"));
        assert!(get_sale(&state).unwrap().items.is_empty());

        assert_eq!(
            complete_sale(&state, cash(30_000)).unwrap_err().code,
            ErrorCode::EmptySale
        );
    }

    #[test]
    fn test_abandon_sale() {
        let state = terminal();
        add_to_sale(&state, "4").unwrap();
        add_to_sale(&state, "4").unwrap();

        assert_eq!(abandon_sale(&state).unwrap().units_released, 2);
        let stock = state.with_state(|pos| pos.product("4").map(|p| p.quantity));
        assert_eq!(stock, Some(15));
    }
}
