//! # Product Commands
//!
//! Inventory tab: list, search, add, edit and delete products.
//!
//! ## Search Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Search Flow                                  │
//! │                                                                         │
//! │  User types "clav"                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  search_products("clav")        available_products("clav")              │
//! │  (inventory tab)                (sales tab)                             │
//! │       │                               │                                 │
//! │       ▼                               ▼                                 │
//! │  name contains "clav",          same, and quantity > 0                  │
//! │  case-insensitive                                                       │
//! │       │                               │                                 │
//! │       └───────────────┬───────────────┘                                 │
//! │                       ▼                                                 │
//! │  Vec<ProductDto> in catalog order                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ApiError, ErrorCode};
use crate::state::{TerminalConfig, TerminalState};
use ferreteria_core::{Command, Money, Outcome, Product, ProductUpdate};

/// Product as shown to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub price_display: String,
    pub quantity: i64,
    pub available: bool,
}

impl ProductDto {
    pub fn new(p: &Product, config: &TerminalConfig) -> Self {
        ProductDto {
            id: p.id.clone(),
            name: p.name.clone(),
            price: p.price,
            price_display: config.format_currency(p.price),
            quantity: p.quantity,
            available: p.is_available(),
        }
    }
}

/// Input of the "add product" form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProductInput {
    pub name: String,
    pub price: i64,
    pub quantity: i64,
}

fn to_dtos(products: Vec<&Product>, config: &TerminalConfig) -> Vec<ProductDto> {
    products
        .into_iter()
        .map(|p| ProductDto::new(p, config))
        .collect()
}

/// Every product, in catalog order.
pub fn list_products(state: &TerminalState) -> Result<Vec<ProductDto>, ApiError> {
    debug!("list_products command");
    let config = state.config();
    Ok(state.with_state(|pos| {
        pos.inventory()
            .products()
            .iter()
            .map(|p| ProductDto::new(p, config))
            .collect()
    }))
}

/// Products whose name contains `term`, case-insensitively.
pub fn search_products(state: &TerminalState, term: &str) -> Result<Vec<ProductDto>, ApiError> {
    debug!(term = %term, "search_products command");
    let config = state.config();
    Ok(state.with_state(|pos| to_dtos(pos.search(term), config)))
}

/// Products the sales tab can offer: matching `term` and in stock.
pub fn available_products(
    state: &TerminalState,
    term: Option<&str>,
) -> Result<Vec<ProductDto>, ApiError> {
    debug!(term = ?term, "available_products command");
    let config = state.config();
    Ok(state.with_state(|pos| to_dtos(pos.available_products(term.unwrap_or("")), config)))
}

pub fn add_product(state: &TerminalState, input: NewProductInput) -> Result<ProductDto, ApiError> {
    debug!(name = %input.name, "add_product command");
    let outcome = state.execute(Command::AddProduct {
        name: input.name,
        price: Money::from_units(input.price),
        quantity: input.quantity,
    })?;
    saved_product(outcome, state.config())
}

/// Applies the fields present in `update`; absent fields are kept.
pub fn update_product(
    state: &TerminalState,
    id: &str,
    update: ProductUpdate,
) -> Result<ProductDto, ApiError> {
    debug!(id = %id, "update_product command");
    if update.is_empty() {
        return Err(ApiError::validation("Nothing to update"));
    }
    let outcome = state.execute(Command::UpdateProduct {
        id: id.to_string(),
        update,
    })?;
    saved_product(outcome, state.config())
}

/// Deletes a product. Fails with `CONFLICT` while the current sale holds
/// units of it.
pub fn delete_product(state: &TerminalState, id: &str) -> Result<ProductDto, ApiError> {
    debug!(id = %id, "delete_product command");
    match state.execute(Command::DeleteProduct { id: id.to_string() })? {
        Outcome::ProductDeleted(p) => Ok(ProductDto::new(&p, state.config())),
        other => Err(unexpected(other)),
    }
}

fn saved_product(outcome: Outcome, config: &TerminalConfig) -> Result<ProductDto, ApiError> {
    match outcome {
        Outcome::ProductSaved(p) => Ok(ProductDto::new(&p, config)),
        other => Err(unexpected(other)),
    }
}

pub(crate) fn unexpected(outcome: Outcome) -> ApiError {
    ApiError::new(
        ErrorCode::Internal,
        format!("Unexpected command outcome: {:?}", outcome),
    )
}
