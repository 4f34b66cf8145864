//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! shop-cli catalog list --category Sports
//! shop-cli catalog search headphones
//! shop-cli catalog show 2
//! shop-cli catalog categories
//! ```

use shopfront_core::{Product, ProductId};
use shopfront_store::Catalog;
use tracing::info;

/// One-line listing of a product.
fn summary(product: &Product) -> String {
    format!(
        "{:>4}  {:<28} {:>10}  {:<12} {:.1} ({} reviews)",
        product.id.as_str(),
        product.name,
        product.price.display(),
        product.category,
        product.rating,
        product.review_count
    )
}

/// List products the way the home screen does.
pub fn list(catalog: &Catalog, category: &str, query: &str) {
    let products = catalog.filter(category, query);
    info!(category, query, "{} product(s)", products.len());
    for product in products {
        info!("{}", summary(product));
    }
}

/// Search products the way the search screen does.
pub fn search(catalog: &Catalog, query: &str) {
    let results = catalog.search(query);
    let plural = if results.len() == 1 { "" } else { "s" };
    info!("{} result{plural} found", results.len());
    for product in results {
        info!("{}", summary(product));
    }
}

/// Show one product in full.
///
/// # Errors
///
/// Returns an error if the ID is empty or not in the catalog.
pub fn show(catalog: &Catalog, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let id = ProductId::parse(id)?;
    let product = catalog
        .get(&id)
        .ok_or_else(|| format!("Product not found: {id}"))?;

    info!("{}", product.name);
    info!("  Price:    {}", product.price.display());
    info!("  Category: {}", product.category);
    info!(
        "  Rating:   {:.1} ({} reviews)",
        product.rating, product.review_count
    );
    info!("  Image:    {}", product.image);
    if let Some(description) = &product.description {
        info!("  {description}");
    }
    Ok(())
}

/// List the category filter chips.
pub fn categories(catalog: &Catalog) {
    for category in catalog.categories() {
        info!("{category}");
    }
}
