//! # Cash Register Commands
//!
//! Cash register tab: balances, sales history and the two-step reset.
//!
//! ## Reset Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Register Reset                                    │
//! │                                                                         │
//! │  request_register_reset()                                               │
//! │       │  ResetRequest { token, prompt, salesToClear, ... }              │
//! │       ▼                                                                 │
//! │  Front-end shows `prompt` in a confirmation dialog                      │
//! │       │                                                                 │
//! │       ├── Cancel ──► cancel_register_reset()                            │
//! │       │                                                                 │
//! │       └── Accept ──► confirm_register_reset(token)                      │
//! │                          │                                              │
//! │                          ▼                                              │
//! │              initial := current, salesTotal := 0, history cleared       │
//! │                                                                         │
//! │  A sale completed between the two steps voids the token                 │
//! │  (RESET_NOT_CONFIRMED); the user has to confirm the new figures.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::product::unexpected;
use crate::error::ApiError;
use crate::state::{TerminalConfig, TerminalState};
use ferreteria_core::{CashRegister, Command, Money, Outcome, PaymentMethod, ResetToken, Sale};

/// Register balances with display strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterView {
    pub initial_amount: Money,
    pub current_amount: Money,
    pub sales_total: Money,
    pub sales_count: usize,
    pub initial_display: String,
    pub current_display: String,
    pub sales_total_display: String,
}

impl RegisterView {
    fn new(register: &CashRegister, sales_count: usize, config: &TerminalConfig) -> Self {
        RegisterView {
            initial_amount: register.initial_amount,
            current_amount: register.current_amount,
            sales_total: register.sales_total,
            sales_count,
            initial_display: config.format_currency(register.initial_amount),
            current_display: config.format_currency(register.current_amount),
            sales_total_display: config.format_currency(register.sales_total),
        }
    }
}

/// One row of the sales history table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleHistoryRow {
    pub id: String,
    /// RFC 3339 timestamp.
    pub date: String,
    /// "Martillo (3), Clavos (1kg) (2)"
    pub items: String,
    pub total: Money,
    pub total_display: String,
    pub payment_method: PaymentMethod,
    pub change: Option<Money>,
}

impl SaleHistoryRow {
    fn new(sale: &Sale, config: &TerminalConfig) -> Self {
        SaleHistoryRow {
            id: sale.id.clone(),
            date: sale.date.to_rfc3339(),
            items: sale.summary(),
            total: sale.total,
            total_display: config.format_currency(sale.total),
            payment_method: sale.payment_method,
            change: sale.change,
        }
    }
}

/// First step of the reset: what the user is asked to confirm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetRequest {
    pub token: ResetToken,
    pub prompt: String,
    pub sales_to_clear: usize,
    pub new_opening_balance: Money,
}

/// Result of a confirmed reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetResponse {
    pub cleared_sales: usize,
    pub register: RegisterView,
}

pub fn get_register(state: &TerminalState) -> Result<RegisterView, ApiError> {
    debug!("get_register command");
    let config = state.config();
    Ok(state.with_state(|pos| RegisterView::new(pos.cash_register(), pos.history().len(), config)))
}

/// Completed sales since the last reset, oldest first.
pub fn sales_history(state: &TerminalState) -> Result<Vec<SaleHistoryRow>, ApiError> {
    debug!("sales_history command");
    let config = state.config();
    Ok(state.with_state(|pos| {
        pos.history()
            .iter()
            .map(|s| SaleHistoryRow::new(s, config))
            .collect()
    }))
}

pub fn request_register_reset(state: &TerminalState) -> Result<ResetRequest, ApiError> {
    debug!("request_register_reset command");
    let token = match state.execute(Command::RequestReset)? {
        Outcome::ResetRequested(token) => token,
        other => return Err(unexpected(other)),
    };

    let config = state.config();
    let (sales_to_clear, new_opening_balance) =
        state.with_state(|pos| (pos.history().len(), pos.cash_register().current_amount));

    Ok(ResetRequest {
        token,
        prompt: format!(
            "Reset the cash register? {} sales will be cleared and the opening balance becomes {}.",
            sales_to_clear,
            config.format_currency(new_opening_balance)
        ),
        sales_to_clear,
        new_opening_balance,
    })
}

/// Withdraws a pending reset. Returns whether one was pending.
pub fn cancel_register_reset(state: &TerminalState) -> Result<bool, ApiError> {
    debug!("cancel_register_reset command");
    match state.execute(Command::CancelReset)? {
        Outcome::ResetCancelled(was_pending) => Ok(was_pending),
        other => Err(unexpected(other)),
    }
}

pub fn confirm_register_reset(
    state: &TerminalState,
    token: &str,
) -> Result<ResetResponse, ApiError> {
    debug!("confirm_register_reset command");
    let summary = match state.execute(Command::ConfirmReset {
        token: ResetToken::from(token.to_string()),
    })? {
        Outcome::ResetConfirmed(summary) => summary,
        other => return Err(unexpected(other)),
    };

    Ok(ResetResponse {
        cleared_sales: summary.cleared_sales,
        register: get_register(state)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::sale::{add_to_sale, complete_sale, CompleteSaleInput};
    use crate::commands::testing::terminal;
    use crate::error::ErrorCode;

    fn sell(state: &TerminalState, product_id: &str, units: usize, method: &str) {
        for _ in 0..units {
            add_to_sale(state, product_id).unwrap();
        }
        let total = state.with_state(|pos| pos.sale_total().units());
        complete_sale(
            state,
            CompleteSaleInput {
                payment_method: method.into(),
                cash_received: Some(total),
            },
        )
        .unwrap();
    }

    #[test]
    fn test_register_and_history() {
        let state = terminal();
        sell(&state, "1", 3, "efectivo");
        sell(&state, "3", 2, "transferencia");

        let register = get_register(&state).unwrap();
        assert_eq!(register.current_display, "$130.200");
        assert_eq!(register.sales_total.units(), 30_200);
        assert_eq!(register.sales_count, 2);

        let history = sales_history(&state).unwrap();
        assert_eq!(history[0].items, "Martillo (3)");
        assert_eq!(history[1].items, "Clavos (1kg) (2)");
        assert_eq!(history[1].payment_method, PaymentMethod::Transfer);
        assert_eq!(history[1].change, None);
    }

    #[test]
    fn test_two_step_reset() {
        let state = terminal();
        sell(&state, "1", 3, "efectivo");
        sell(&state, "2", 4, "tarjeta");

        let request = request_register_reset(&state).unwrap();
        assert_eq!(request.sales_to_clear, 2);
        assert!(request.prompt.contains("$150.000"));

        let response = confirm_register_reset(&state, request.token.as_str()).unwrap();
        assert_eq!(response.cleared_sales, 2);
        assert_eq!(response.register.initial_amount.units(), 150_000);
        assert!(response.register.sales_total.is_zero());
        assert!(sales_history(&state).unwrap().is_empty());
    }

    #[test]
    fn test_reset_without_confirmation_is_refused() {
        let state = terminal();
        assert_eq!(
            confirm_register_reset(&state, "made-up").unwrap_err().code,
            ErrorCode::ResetNotConfirmed
        );

        let request = request_register_reset(&state).unwrap();
        assert!(cancel_register_reset(&state).unwrap());
        assert_eq!(
            confirm_register_reset(&state, request.token.as_str())
                .unwrap_err()
                .code,
            ErrorCode::ResetNotConfirmed
        );
    }

    #[test]
    fn test_sale_between_steps_voids_token() {
        let state = terminal();
        let request = request_register_reset(&state).unwrap();
        sell(&state, "2", 1, "tarjeta");

        assert!(confirm_register_reset(&state, request.token.as_str()).is_err());
        assert_eq!(sales_history(&state).unwrap().len(), 1);
    }
}
