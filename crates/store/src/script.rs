//! Replayable shopping sessions.
//!
//! A session script is a list of the gestures a shopper makes on the screens
//! (add to cart, step a quantity, tap remove, heart a product, check out),
//! replayed in order against a catalog and a pair of stores.
//!
//! ```yaml
//! name: weekend order
//! steps:
//!   - action: add
//!     product: "1"
//!     quantity: 2
//!   - action: wishlist_add
//!     product: "4"
//!   - action: checkout
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopfront_core::{Product, ProductId, ProductSnapshot};
use thiserror::Error;
use tracing::{info, instrument};

use crate::cart::{CartStore, LineItem};
use crate::catalog::Catalog;
use crate::error::StoreError;
use crate::flows::{self, Confirm, OrderConfirmation};
use crate::totals::OrderTotals;
use crate::wishlist::WishlistStore;

const fn one() -> u32 {
    1
}

/// One user gesture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Add {
        product: ProductId,
        #[serde(default = "one")]
        quantity: u32,
    },
    /// The cart screen's quantity stepper. Zero or below asks to remove.
    SetQuantity { product: ProductId, quantity: i64 },
    /// The cart screen's remove button, behind a confirmation.
    Remove { product: ProductId },
    Clear,
    WishlistAdd { product: ProductId },
    WishlistRemove { product: ProductId },
    WishlistToggle { product: ProductId },
    /// Add a wishlist entry to the cart. The entry stays in the wishlist.
    WishlistToCart { product: ProductId },
    Checkout,
}

impl Step {
    /// Action name as written in scripts.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::SetQuantity { .. } => "set_quantity",
            Self::Remove { .. } => "remove",
            Self::Clear => "clear",
            Self::WishlistAdd { .. } => "wishlist_add",
            Self::WishlistRemove { .. } => "wishlist_remove",
            Self::WishlistToggle { .. } => "wishlist_toggle",
            Self::WishlistToCart { .. } => "wishlist_to_cart",
            Self::Checkout => "checkout",
        }
    }
}

/// A named list of steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionScript {
    #[serde(default)]
    pub name: Option<String>,
    pub steps: Vec<Step>,
}

/// A step that failed. Steps before it were applied; steps after it were not.
#[derive(Debug, Error)]
#[error("step {index} ({action}) failed: {source}")]
pub struct ScriptError {
    /// Zero-based position of the failing step.
    pub index: usize,
    pub action: &'static str,
    #[source]
    pub source: StoreError,
}

/// State after a session has run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub steps_applied: usize,
    pub lines: Vec<LineItem>,
    pub item_count: u64,
    pub subtotal: Decimal,
    pub totals: OrderTotals,
    pub wishlist: Vec<ProductSnapshot>,
    pub orders: Vec<OrderConfirmation>,
}

/// Replays steps against a catalog and stores.
pub struct Session<'a> {
    catalog: &'a Catalog,
    cart: &'a CartStore,
    wishlist: &'a WishlistStore,
    confirm: &'a dyn Confirm,
}

impl<'a> Session<'a> {
    #[must_use]
    pub fn new(
        catalog: &'a Catalog,
        cart: &'a CartStore,
        wishlist: &'a WishlistStore,
        confirm: &'a dyn Confirm,
    ) -> Self {
        Self {
            catalog,
            cart,
            wishlist,
            confirm,
        }
    }

    /// Run every step in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns a [`ScriptError`] naming the failing step.
    #[instrument(skip_all, fields(name = script.name.as_deref().unwrap_or("unnamed")))]
    pub fn run(&self, script: &SessionScript) -> Result<SessionReport, ScriptError> {
        let mut orders = Vec::new();

        for (index, step) in script.steps.iter().enumerate() {
            let order = self.apply(step).map_err(|source| ScriptError {
                index,
                action: step.action(),
                source,
            })?;
            orders.extend(order);
        }

        let cart = self.cart.snapshot();
        info!(
            steps = script.steps.len(),
            items = cart.item_count(),
            subtotal = %cart.subtotal(),
            "Session complete"
        );

        Ok(SessionReport {
            steps_applied: script.steps.len(),
            item_count: cart.item_count(),
            subtotal: cart.subtotal(),
            totals: cart.order_totals(),
            lines: cart.lines().to_vec(),
            wishlist: self.wishlist.items(),
            orders,
        })
    }

    /// Apply a single step. Returns the order if the step was a confirmed
    /// checkout.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for products missing from the catalog
    /// (or the wishlist, for `wishlist_to_cart`), and whatever the store
    /// operation itself rejects.
    pub fn apply(&self, step: &Step) -> Result<Option<OrderConfirmation>, StoreError> {
        match step {
            Step::Add { product, quantity } => {
                let snapshot = self.lookup(product)?.snapshot();
                self.cart.add_item(snapshot, *quantity)?;
            }
            Step::SetQuantity { product, quantity } => {
                flows::change_quantity(self.cart, product, *quantity, self.confirm)?;
            }
            Step::Remove { product } => {
                flows::remove_with_confirmation(self.cart, product, self.confirm);
            }
            Step::Clear => self.cart.clear(),
            Step::WishlistAdd { product } => {
                self.wishlist.add(self.lookup(product)?.snapshot())?;
            }
            Step::WishlistRemove { product } => {
                self.wishlist.remove(product);
            }
            Step::WishlistToggle { product } => {
                self.wishlist.toggle(self.lookup(product)?.snapshot())?;
            }
            Step::WishlistToCart { product } => {
                let snapshot = self
                    .wishlist
                    .get(product)
                    .ok_or_else(|| StoreError::NotFound(product.clone()))?;
                self.cart.add_one(snapshot)?;
            }
            Step::Checkout => return flows::checkout(self.cart, self.confirm),
        }
        Ok(None)
    }

    fn lookup(&self, product: &ProductId) -> Result<&'a Product, StoreError> {
        self.catalog
            .get(product)
            .ok_or_else(|| StoreError::NotFound(product.clone()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::flows::{AlwaysConfirm, NeverConfirm};

    fn id(s: &str) -> ProductId {
        ProductId::parse(s).unwrap()
    }

    #[test]
    fn test_parse_yaml_script() {
        let yaml = r#"
name: smoke
steps:
  - action: add
    product: "1"
  - action: add
    product: "2"
    quantity: 3
  - action: set_quantity
    product: "2"
    quantity: -1
  - action: wishlist_toggle
    product: "4"
  - action: clear
  - action: checkout
"#;
        let script: SessionScript = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(script.name.as_deref(), Some("smoke"));
        assert_eq!(
            script.steps,
            vec![
                Step::Add {
                    product: id("1"),
                    quantity: 1,
                },
                Step::Add {
                    product: id("2"),
                    quantity: 3,
                },
                Step::SetQuantity {
                    product: id("2"),
                    quantity: -1,
                },
                Step::WishlistToggle { product: id("4") },
                Step::Clear,
                Step::Checkout,
            ]
        );
    }

    #[test]
    fn test_run_builds_cart_and_wishlist() {
        let catalog = Catalog::builtin().unwrap();
        let cart = CartStore::new();
        let wishlist = WishlistStore::new();
        let session = Session::new(&catalog, &cart, &wishlist, &AlwaysConfirm);

        let script = SessionScript {
            name: None,
            steps: vec![
                Step::Add {
                    product: id("6"),
                    quantity: 2,
                },
                Step::WishlistAdd { product: id("8") },
                Step::WishlistToCart { product: id("8") },
                Step::Checkout,
            ],
        };
        let report = session.run(&script).unwrap();

        // 2 × 29.99 + 24.00
        assert_eq!(report.item_count, 3);
        assert_eq!(report.subtotal, Decimal::new(8398, 2));
        assert!(report.totals.free_shipping());
        assert_eq!(report.wishlist.len(), 1);
        assert_eq!(report.orders.len(), 1);
        assert_eq!(report.orders[0].item_count, 3);
    }

    #[test]
    fn test_cancelled_remove_keeps_line() {
        let catalog = Catalog::builtin().unwrap();
        let cart = CartStore::new();
        let wishlist = WishlistStore::new();
        let session = Session::new(&catalog, &cart, &wishlist, &NeverConfirm);

        let script = SessionScript {
            name: None,
            steps: vec![
                Step::Add {
                    product: id("1"),
                    quantity: 1,
                },
                Step::Remove { product: id("1") },
                Step::SetQuantity {
                    product: id("1"),
                    quantity: 0,
                },
                Step::Checkout,
            ],
        };
        let report = session.run(&script).unwrap();
        assert_eq!(report.item_count, 1);
        assert!(report.orders.is_empty());
    }

    #[test]
    fn test_failure_reports_step_index() {
        let catalog = Catalog::builtin().unwrap();
        let cart = CartStore::new();
        let wishlist = WishlistStore::new();
        let session = Session::new(&catalog, &cart, &wishlist, &AlwaysConfirm);

        let script = SessionScript {
            name: None,
            steps: vec![
                Step::Add {
                    product: id("1"),
                    quantity: 1,
                },
                Step::Add {
                    product: id("404"),
                    quantity: 1,
                },
                Step::Clear,
            ],
        };
        let err = session.run(&script).unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.action, "add");
        assert_eq!(err.source, StoreError::NotFound(id("404")));
        // The first step stays applied and the clear never ran.
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_wishlist_to_cart_requires_entry() {
        let catalog = Catalog::builtin().unwrap();
        let cart = CartStore::new();
        let wishlist = WishlistStore::new();
        let session = Session::new(&catalog, &cart, &wishlist, &AlwaysConfirm);

        assert_eq!(
            session.apply(&Step::WishlistToCart { product: id("2") }),
            Err(StoreError::NotFound(id("2")))
        );
    }
}
