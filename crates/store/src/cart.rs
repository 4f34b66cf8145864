//! Shopping cart.
//!
//! [`Cart`] is the aggregate: quantity-tracked lines keyed by product ID, in
//! the order they were first added. [`CartStore`] is the single owner the
//! rest of the application talks to. It serializes mutations behind one
//! mutex and notifies subscribers after each change.
//!
//! Invariants held by every operation:
//! - a product ID appears in at most one line
//! - every stored quantity is at least 1
//! - a line's unit price never changes after the line is created
//! - the subtotal never exceeds [`MAX_SUBTOTAL`]

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;
use serde::Serialize;
use shopfront_core::{CurrencyCode, Price, ProductId, ProductSnapshot};
use tracing::{debug, instrument, warn};

use crate::error::{Result, StoreError, validate_snapshot};
use crate::observer::{Observer, Observers, SubscriptionId};
use crate::totals::{self, MAX_SUBTOTAL, OrderTotals};

/// One row in the cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    snapshot: ProductSnapshot,
    quantity: u32,
}

impl LineItem {
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        self.snapshot.id()
    }

    /// Product data captured when the line was created.
    #[must_use]
    pub const fn snapshot(&self) -> &ProductSnapshot {
        &self.snapshot
    }

    /// Always at least 1.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        // Bounded by the cart's subtotal limit, so this cannot overflow.
        self.snapshot.unit_price().amount * Decimal::from(self.quantity)
    }
}

/// Change published by a [`CartStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// `added` units were added; the line now holds `quantity`.
    ItemAdded {
        product_id: ProductId,
        added: u32,
        quantity: u32,
    },
    QuantityUpdated {
        product_id: ProductId,
        quantity: u32,
    },
    ItemRemoved {
        product_id: ProductId,
    },
    Cleared,
}

/// Result of [`Cart::update_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// The line now holds this quantity.
    Set(u32),
    /// The requested quantity was zero or negative; the line is gone.
    Removed,
}

/// The cart aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cart {
    lines: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add `quantity` units of a product.
    ///
    /// An existing line keeps its snapshot and has its quantity incremented;
    /// otherwise a new line is appended. Returns the line's new quantity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidArgument`] if `quantity` is zero, the
    /// snapshot's price is not positive, its currency differs from the lines
    /// already in the cart, the quantity would overflow, or the subtotal
    /// would exceed [`MAX_SUBTOTAL`].
    pub fn add_item(&mut self, snapshot: ProductSnapshot, quantity: u32) -> Result<u32> {
        if quantity == 0 {
            return Err(StoreError::InvalidArgument(
                "quantity must be a positive integer".to_string(),
            ));
        }
        validate_snapshot(&snapshot)?;

        let currency = snapshot.unit_price().currency_code;
        if !self.lines.is_empty() && currency != self.currency() {
            return Err(StoreError::InvalidArgument(format!(
                "cannot mix {} with {} in one cart",
                currency.code(),
                self.currency().code()
            )));
        }

        let (unit_price, quantity) = match self.line(snapshot.id()) {
            Some(line) => {
                let total = line.quantity.checked_add(quantity).ok_or_else(|| {
                    StoreError::InvalidArgument(format!(
                        "quantity for product {} would overflow",
                        snapshot.id()
                    ))
                })?;
                (line.snapshot.unit_price(), total)
            }
            None => (snapshot.unit_price(), quantity),
        };
        self.check_subtotal(snapshot.id(), unit_price, quantity)?;

        if let Some(line) = self.line_mut(snapshot.id()) {
            line.quantity = quantity;
        } else {
            self.lines.push(LineItem { snapshot, quantity });
        }
        Ok(quantity)
    }

    /// Check that giving `product_id` a line of `quantity × unit_price` keeps
    /// the subtotal within [`MAX_SUBTOTAL`].
    fn check_subtotal(
        &self,
        product_id: &ProductId,
        unit_price: Price,
        quantity: u32,
    ) -> Result<()> {
        let others: Decimal = self
            .lines
            .iter()
            .filter(|line| line.product_id() != product_id)
            .map(LineItem::line_total)
            .sum();
        let within_limit = unit_price
            .times(quantity)
            .and_then(|line_total| line_total.checked_add(others))
            .is_some_and(|subtotal| subtotal <= MAX_SUBTOTAL);

        if within_limit {
            Ok(())
        } else {
            Err(StoreError::InvalidArgument(format!(
                "{quantity} of product {product_id} would push the subtotal above {MAX_SUBTOTAL}"
            )))
        }
    }

    /// Set a line's quantity. Zero or below removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if there is no line for `product_id`,
    /// or [`StoreError::InvalidArgument`] if `new_quantity` exceeds `u32::MAX`
    /// or would push the subtotal above [`MAX_SUBTOTAL`].
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        new_quantity: i64,
    ) -> Result<QuantityUpdate> {
        if !self.contains(product_id) {
            return Err(StoreError::NotFound(product_id.clone()));
        }

        if new_quantity <= 0 {
            self.remove_item(product_id);
            return Ok(QuantityUpdate::Removed);
        }

        let quantity = u32::try_from(new_quantity).map_err(|_| {
            StoreError::InvalidArgument(format!("quantity {new_quantity} is out of range"))
        })?;
        if let Some(unit_price) = self.line(product_id).map(|line| line.snapshot.unit_price()) {
            self.check_subtotal(product_id, unit_price, quantity)?;
        }
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = quantity;
        }
        Ok(QuantityUpdate::Set(quantity))
    }

    /// Remove a line. Removing an absent product is a no-op.
    pub fn remove_item(&mut self, product_id: &ProductId) -> Option<LineItem> {
        let index = self
            .lines
            .iter()
            .position(|line| line.product_id() == product_id)?;
        Some(self.lines.remove(index))
    }

    /// Remove every line. Returns how many lines were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.lines.len();
        self.lines.clear();
        removed
    }

    /// Lines in display order.
    #[must_use]
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&LineItem> {
        self.lines.iter().find(|line| line.product_id() == product_id)
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut LineItem> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id() == product_id)
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.line(product_id).is_some()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of `quantity × unit_price` across all lines. Never above
    /// [`MAX_SUBTOTAL`].
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(LineItem::line_total).sum()
    }

    /// Currency of the lines in the cart, USD when empty.
    #[must_use]
    pub fn currency(&self) -> CurrencyCode {
        self.lines
            .first()
            .map(|line| line.snapshot.unit_price().currency_code)
            .unwrap_or_default()
    }

    /// Shipping and tax estimate for the current subtotal.
    #[must_use]
    pub fn order_totals(&self) -> OrderTotals {
        totals::estimate(self.subtotal())
    }
}

/// Shared owner of the cart.
///
/// Cheaply cloneable via `Arc`; every clone refers to the same cart.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

#[derive(Debug, Default)]
struct CartStoreInner {
    cart: Mutex<Cart>,
    observers: Observers<CartEvent>,
}

impl CartStore {
    /// Create a store holding an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // Mutations validate before writing, so a poisoned cart is still consistent.
    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.inner
            .cart
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Add one unit of a product.
    ///
    /// # Errors
    ///
    /// See [`CartStore::add_item`].
    pub fn add_one(&self, snapshot: ProductSnapshot) -> Result<()> {
        self.add_item(snapshot, 1)
    }

    /// Add `quantity` units of a product.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidArgument`] for a zero quantity, an
    /// invalid snapshot, or a subtotal above [`MAX_SUBTOTAL`]. The cart is
    /// left unchanged.
    #[instrument(skip(self, snapshot), fields(product_id = %snapshot.id()))]
    pub fn add_item(&self, snapshot: ProductSnapshot, quantity: u32) -> Result<()> {
        let product_id = snapshot.id().clone();
        let result = self.lock().add_item(snapshot, quantity);

        match result {
            Ok(new_quantity) => {
                debug!(quantity = new_quantity, "Added to cart");
                self.inner.observers.notify(&CartEvent::ItemAdded {
                    product_id,
                    added: quantity,
                    quantity: new_quantity,
                });
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Rejected add to cart");
                Err(e)
            }
        }
    }

    /// Set a line's quantity exactly. Zero or below removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the product has no line.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn update_quantity(&self, product_id: &ProductId, new_quantity: i64) -> Result<()> {
        let result = self.lock().update_quantity(product_id, new_quantity);

        let event = match result {
            Ok(QuantityUpdate::Set(quantity)) => {
                debug!(quantity, "Updated cart quantity");
                CartEvent::QuantityUpdated {
                    product_id: product_id.clone(),
                    quantity,
                }
            }
            Ok(QuantityUpdate::Removed) => {
                debug!("Quantity dropped to zero, removed line");
                CartEvent::ItemRemoved {
                    product_id: product_id.clone(),
                }
            }
            Err(e) => {
                warn!(error = %e, "Rejected quantity update");
                return Err(e);
            }
        };
        self.inner.observers.notify(&event);
        Ok(())
    }

    /// Remove a line if present. Never fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn remove_item(&self, product_id: &ProductId) -> Option<LineItem> {
        let removed = self.lock().remove_item(product_id);

        if removed.is_some() {
            debug!("Removed from cart");
            self.inner.observers.notify(&CartEvent::ItemRemoved {
                product_id: product_id.clone(),
            });
        }
        removed
    }

    /// Remove every line.
    pub fn clear(&self) {
        let removed = self.lock().clear();

        if removed > 0 {
            debug!(lines = removed, "Cleared cart");
            self.inner.observers.notify(&CartEvent::Cleared);
        }
    }

    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lock().item_count()
    }

    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lock().subtotal()
    }

    #[must_use]
    pub fn order_totals(&self) -> OrderTotals {
        self.lock().order_totals()
    }

    /// Copy of the lines in display order.
    #[must_use]
    pub fn lines(&self) -> Vec<LineItem> {
        self.lock().lines().to_vec()
    }

    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<LineItem> {
        self.lock().line(product_id).cloned()
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.lock().contains(product_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the whole cart, for rendering several derived values from one
    /// consistent state.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.lock().clone()
    }

    /// Subscribe to cart changes.
    pub fn subscribe(&self, observer: Arc<dyn Observer<CartEvent>>) -> SubscriptionId {
        self.inner.observers.subscribe(observer)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.observers.unsubscribe(id)
    }
}
