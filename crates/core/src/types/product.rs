//! Product records and the snapshots captured from them.

use serde::{Deserialize, Serialize};

use crate::types::{ProductId, Price};

/// A catalog product.
///
/// Catalog records are read-only for the lifetime of the process. Anything
/// that needs to remember a product (a cart line, a wishlist entry) takes a
/// [`ProductSnapshot`] instead of holding on to the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Image URL.
    pub image: String,
    pub category: String,
    /// Average review rating, 0-5.
    pub rating: f32,
    pub review_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Product {
    /// Capture the display data of this product as an owned snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            unit_price: self.price,
            image: self.image.clone(),
            category: self.category.clone(),
            rating: self.rating,
            review_count: self.review_count,
        }
    }
}

/// Immutable copy of a product's display data at the time it was captured.
///
/// Later catalog changes do not reach a snapshot; a cart line keeps the unit
/// price it was added at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    id: ProductId,
    name: String,
    unit_price: Price,
    image: String,
    category: String,
    rating: f32,
    review_count: u32,
}

impl ProductSnapshot {
    /// Create a snapshot from its parts.
    #[must_use]
    pub const fn new(
        id: ProductId,
        name: String,
        unit_price: Price,
        image: String,
        category: String,
        rating: f32,
        review_count: u32,
    ) -> Self {
        Self {
            id,
            name,
            unit_price,
            image,
            category,
            rating,
            review_count,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn unit_price(&self) -> Price {
        self.unit_price
    }

    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub const fn rating(&self) -> f32 {
        self.rating
    }

    #[must_use]
    pub const fn review_count(&self) -> u32 {
        self.review_count
    }
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        product.snapshot()
    }
}
