//! # Commands
//!
//! Every state-changing request expressed as data, so that callers can
//! log it, replay it, and decide uniformly when a snapshot must be written.
//!
//! ```text
//! front-end action ──► Command ──► PosState::execute ──► Outcome
//!                                                          │
//!                             command.is_mutation()? ──────┴──► save snapshot
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreResult;
use crate::money::Money;
use crate::state::{PosState, ResetSummary, ResetToken};
use crate::types::{PaymentMethod, Product, ProductUpdate, Sale, SaleLineItem};

/// A request against the transaction model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    AddProduct {
        name: String,
        price: Money,
        quantity: i64,
    },
    UpdateProduct {
        id: String,
        update: ProductUpdate,
    },
    DeleteProduct {
        id: String,
    },
    AddLine {
        product_id: String,
    },
    RemoveLine {
        product_id: String,
    },
    CompleteSale {
        payment_method: PaymentMethod,
        cash_received: Option<Money>,
    },
    AbandonSale,
    RequestReset,
    CancelReset,
    ConfirmReset {
        token: ResetToken,
    },
}

impl Command {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::AddProduct { .. } => "add_product",
            Command::UpdateProduct { .. } => "update_product",
            Command::DeleteProduct { .. } => "delete_product",
            Command::AddLine { .. } => "add_line",
            Command::RemoveLine { .. } => "remove_line",
            Command::CompleteSale { .. } => "complete_sale",
            Command::AbandonSale => "abandon_sale",
            Command::RequestReset => "request_reset",
            Command::CancelReset => "cancel_reset",
            Command::ConfirmReset { .. } => "confirm_reset",
        }
    }

    /// Whether a successful run changes persisted state.
    ///
    /// Reset requests live only in memory and are never persisted.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Command::RequestReset | Command::CancelReset)
    }
}

/// What a successful [`Command`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    ProductSaved(Product),
    ProductDeleted(Product),
    LineAdded(SaleLineItem),
    /// `false` when the product had no line in the sale.
    LineRemoved(bool),
    SaleCompleted(Sale),
    SaleAbandoned { units_released: i64 },
    ResetRequested(ResetToken),
    ResetCancelled(bool),
    ResetConfirmed(ResetSummary),
}

impl PosState {
    /// Runs one command. On `Err` the state is unchanged.
    pub fn execute(&mut self, command: Command) -> CoreResult<Outcome> {
        debug!(command = command.name(), "Executing command");

        let outcome = match command {
            Command::AddProduct {
                name,
                price,
                quantity,
            } => Outcome::ProductSaved(self.add_product(&name, price, quantity)?),
            Command::UpdateProduct { id, update } => {
                Outcome::ProductSaved(self.update_product(&id, update)?)
            }
            Command::DeleteProduct { id } => Outcome::ProductDeleted(self.delete_product(&id)?),
            Command::AddLine { product_id } => Outcome::LineAdded(self.add_line(&product_id)?),
            Command::RemoveLine { product_id } => Outcome::LineRemoved(self.remove_line(&product_id)),
            Command::CompleteSale {
                payment_method,
                cash_received,
            } => Outcome::SaleCompleted(self.complete_sale(payment_method, cash_received)?),
            Command::AbandonSale => Outcome::SaleAbandoned {
                units_released: self.abandon_sale(),
            },
            Command::RequestReset => Outcome::ResetRequested(self.request_reset()),
            Command::CancelReset => Outcome::ResetCancelled(self.cancel_reset()),
            Command::ConfirmReset { token } => Outcome::ResetConfirmed(self.confirm_reset(&token)?),
        };
        Ok(outcome)
    }
}
