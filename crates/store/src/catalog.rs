//! Product catalog.
//!
//! A fixed, read-only list of products. The built-in dataset ships with the
//! crate; a JSON file of the same shape can replace it.

use std::collections::HashSet;

use shopfront_core::{Product, ProductId};
use thiserror::Error;
use tracing::debug;

/// Category name that matches every product.
pub const ALL_CATEGORIES: &str = "All";

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// Errors loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate product id: {0}")]
    DuplicateId(ProductId),

    #[error("Product {0} must have a positive price")]
    InvalidPrice(ProductId),
}

/// The product catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, checking IDs are unique and prices positive.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] or [`CatalogError::InvalidPrice`].
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(&product.id) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
            if !product.price.is_positive() {
                return Err(CatalogError::InvalidPrice(product.id.clone()));
            }
        }
        Ok(Self { products })
    }

    /// The mock dataset bundled with the crate.
    ///
    /// # Errors
    ///
    /// Only fails if the bundled JSON is malformed.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parse a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Json`] for malformed input, plus the checks of
    /// [`Catalog::new`].
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        debug!(products = products.len(), "Parsed catalog");
        Self::new(products)
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == id)
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// `"All"` followed by each distinct category in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut categories = vec![ALL_CATEGORIES];
        for product in &self.products {
            if !categories.contains(&product.category.as_str()) {
                categories.push(&product.category);
            }
        }
        categories
    }

    /// Home-screen listing: products in `category` (or all for `"All"`)
    /// whose name or category contains `query`, ignoring case. An empty query
    /// matches everything.
    #[must_use]
    pub fn filter(&self, category: &str, query: &str) -> Vec<&Product> {
        let needle = query.to_lowercase();
        self.products
            .iter()
            .filter(|product| category == ALL_CATEGORIES || product.category == category)
            .filter(|product| matches_query(product, &needle))
            .collect()
    }

    /// Search-screen listing. A blank query returns nothing.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Product> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.products
            .iter()
            .filter(|product| matches_query(product, &needle))
            .collect()
    }
}

fn matches_query(product: &Product, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle) || product.category.to_lowercase().contains(needle)
}
