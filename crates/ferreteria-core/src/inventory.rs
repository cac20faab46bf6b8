//! # Inventory Store
//!
//! Mapping of product id → product, kept in insertion order.
//!
//! The inventory knows nothing about the in-progress sale. Reservation
//! rules (who may decrement stock, when a delete is refused) live in
//! [`crate::sale`] and [`crate::state`]; this module only offers the raw,
//! validated table operations.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{new_id, Product, ProductUpdate};
use crate::validation::{
    validate_initial_quantity, validate_price, validate_product_name, validate_stock_level,
};

/// The product table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    products: Vec<Product>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an inventory from already-validated products (snapshot restore).
    pub fn from_products(products: Vec<Product>) -> Self {
        Inventory { products }
    }

    /// The hardware store's starter catalog.
    pub fn starter_catalog() -> Self {
        let seed = [
            ("1", "Martillo", 10_000, 20),
            ("2", "Destornillador", 5_000, 30),
            ("3", "Clavos (1kg)", 100, 50),
            ("4", "Pintura Blanca", 250_000, 15),
        ];
        Inventory {
            products: seed
                .into_iter()
                .map(|(id, name, price, quantity)| Product {
                    id: id.to_string(),
                    name: name.to_string(),
                    price: Money::from_units(price),
                    quantity,
                })
                .collect(),
        }
    }

    /// Validates and appends a new product with a fresh id.
    ///
    /// ## Errors
    /// `Validation` if the name is blank, the price ≤ 0 or the quantity ≤ 0.
    pub fn add(&mut self, name: &str, price: Money, quantity: i64) -> CoreResult<&Product> {
        validate_product_name(name)?;
        validate_price(price)?;
        validate_initial_quantity(quantity)?;

        let product = Product {
            id: new_id(),
            name: name.trim().to_string(),
            price,
            quantity,
        };
        debug!(id = %product.id, name = %product.name, "Product added");

        self.products.push(product);
        let idx = self.products.len() - 1;
        Ok(&self.products[idx])
    }

    /// Applies a partial edit. Fields left as `None` are kept.
    ///
    /// All checks run against the *resulting* product before anything is
    /// written, so a rejected update leaves the product untouched.
    pub fn update(&mut self, id: &str, update: ProductUpdate) -> CoreResult<&Product> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;

        if let Some(name) = update.name.as_deref() {
            validate_product_name(name)?;
        }
        validate_price(update.price.unwrap_or(product.price))?;
        validate_stock_level(update.quantity.unwrap_or(product.quantity))?;

        if let Some(name) = update.name {
            product.name = name.trim().to_string();
        }
        if let Some(price) = update.price {
            product.price = price;
        }
        if let Some(quantity) = update.quantity {
            product.quantity = quantity;
        }

        Ok(&*product)
    }

    /// Removes a product. Callers are responsible for the reservation check.
    pub fn remove(&mut self, id: &str) -> CoreResult<Product> {
        let idx = self
            .index_of(id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;
        Ok(self.products.remove(idx))
    }

    /// Products whose name contains `term`, case-insensitively.
    ///
    /// The term is matched as typed (no trimming). An empty term matches
    /// everything; a term that matches nothing gives an empty list.
    pub fn search(&self, term: &str) -> Vec<&Product> {
        let needle = term.to_lowercase();
        self.products
            .iter()
            .filter(|p| p.name_matches(&needle))
            .collect()
    }

    /// Search restricted to products with stock left, as listed on the
    /// sales screen.
    pub fn available(&self, term: &str) -> Vec<&Product> {
        self.search(term)
            .into_iter()
            .filter(|p| p.is_available())
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == id)
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.products.iter().position(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Total units on the shelf across all products.
    pub fn total_units(&self) -> i64 {
        self.products.iter().map(|p| p.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn test_add_product_then_search_finds_it() {
        let mut inv = Inventory::new();
        let id = inv
            .add("Llave Inglesa", Money::from_units(18_000), 7)
            .unwrap()
            .id
            .clone();

        let found = inv.search("Llave Inglesa");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, id);
        assert_eq!(found[0].price.units(), 18_000);
        assert_eq!(found[0].quantity, 7);
    }

    #[test]
    fn test_add_product_rejects_bad_input() {
        let mut inv = Inventory::new();
        assert!(matches!(
            inv.add("  ", Money::from_units(100), 1),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));
        assert!(inv.add("Sierra", Money::zero(), 1).is_err());
        assert!(inv.add("Sierra", Money::from_units(100), 0).is_err());
        assert!(inv.is_empty());
    }

    #[test]
    fn test_add_trims_name_and_ids_are_unique() {
        let mut inv = Inventory::new();
        let a = inv.add("  Taladro ", Money::from_units(1), 1).unwrap().id.clone();
        let b = inv.add("Taladro", Money::from_units(1), 1).unwrap().id.clone();
        assert_ne!(a, b);
        assert_eq!(inv.get(&a).unwrap().name, "Taladro");
    }

    #[test]
    fn test_update_keeps_unaffected_fields() {
        let mut inv = Inventory::starter_catalog();
        inv.update(
            "2",
            ProductUpdate {
                price: Some(Money::from_units(5_500)),
                ..Default::default()
            },
        )
        .unwrap();

        let p = inv.get("2").unwrap();
        assert_eq!(p.name, "Destornillador");
        assert_eq!(p.price.units(), 5_500);
        assert_eq!(p.quantity, 30);
    }

    #[test]
    fn test_update_allows_zero_stock_but_not_negative() {
        let mut inv = Inventory::starter_catalog();
        let zero = ProductUpdate {
            quantity: Some(0),
            ..Default::default()
        };
        assert!(inv.update("1", zero).is_ok());

        let negative = ProductUpdate {
            quantity: Some(-1),
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        assert!(inv.update("1", negative).is_err());
        // Rejected update did not touch the name either
        assert_eq!(inv.get("1").unwrap().name, "Martillo");
    }

    #[test]
    fn test_update_unknown_product() {
        let mut inv = Inventory::starter_catalog();
        assert!(matches!(
            inv.update("nope", ProductUpdate::default()),
            Err(CoreError::ProductNotFound(_))
        ));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let inv = Inventory::starter_catalog();
        let names: Vec<_> = inv
            .search("PINTURA")
            .into_iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Pintura Blanca"]);
        assert_eq!(inv.search("").len(), 4);
        assert!(inv.search("sierra").is_empty());
    }

    #[test]
    fn test_search_is_a_plain_substring_filter() {
        let inv = Inventory::starter_catalog();
        let names: Vec<_> = inv.search(" ").into_iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Clavos (1kg)", "Pintura Blanca"]);

        assert!(inv.search(" martillo").is_empty());
        assert!(inv.search(&"x".repeat(500)).is_empty());
    }

    #[test]
    fn test_available_hides_empty_shelves() {
        let mut inv = Inventory::starter_catalog();
        inv.get_mut("3").unwrap().quantity = 0;
        let ids: Vec<_> = inv
            .available("")
            .into_iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "2", "4"]);
    }

    #[test]
    fn test_remove() {
        let mut inv = Inventory::starter_catalog();
        let removed = inv.remove("4").unwrap();
        assert_eq!(removed.name, "Pintura Blanca");
        assert!(!inv.contains("4"));
        assert!(inv.remove("4").is_err());
    }
}
