//! Integration tests for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_properties` - Cart invariants and the documented order scenarios
//! - `cart_invariants` - Generated operation sequences checked against a model
//! - `session_scripts` - YAML session replay against the built-in catalog
//!
//! Shared fixtures live in [`fixtures`].

pub mod fixtures {
    //! Snapshot and catalog builders shared by the test files.

    use shopfront_core::{CurrencyCode, Price, ProductId, ProductSnapshot};
    use shopfront_store::{Catalog, CatalogError};

    /// A USD snapshot with the given ID and price in cents.
    ///
    /// # Panics
    ///
    /// Panics if `id` is blank.
    #[must_use]
    pub fn snapshot(id: &str, cents: i64) -> ProductSnapshot {
        ProductSnapshot::new(
            product_id(id),
            format!("Product {id}"),
            Price::from_cents(cents, CurrencyCode::USD),
            format!("https://images.example.com/{id}.jpg"),
            "Test".to_string(),
            4.0,
            0,
        )
    }

    /// Parse a product ID.
    ///
    /// # Panics
    ///
    /// Panics if `id` is blank.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn product_id(id: &str) -> ProductId {
        ProductId::parse(id).expect("fixture product id must not be blank")
    }

    /// The bundled catalog.
    ///
    /// # Errors
    ///
    /// Propagates [`CatalogError`] from the bundled dataset.
    pub fn catalog() -> Result<Catalog, CatalogError> {
        Catalog::builtin()
    }
}
