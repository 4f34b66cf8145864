//! Wishlist.
//!
//! The cart pattern applied to a set: entries are unique by product ID, kept
//! in the order they were added, and have no quantity.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use shopfront_core::{ProductId, ProductSnapshot};
use tracing::{debug, instrument};

use crate::error::{Result, validate_snapshot};
use crate::observer::{Observer, Observers, SubscriptionId};

/// Change published by a [`WishlistStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WishlistEvent {
    Added { product_id: ProductId, name: String },
    Removed { product_id: ProductId, name: String },
    Cleared,
}

/// The wishlist aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Wishlist {
    items: Vec<ProductSnapshot>,
}

impl Wishlist {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add a product if it is not already present.
    ///
    /// Returns `true` if it was inserted.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::InvalidArgument`] if the snapshot's price
    /// is not positive.
    pub fn add(&mut self, snapshot: ProductSnapshot) -> Result<bool> {
        validate_snapshot(&snapshot)?;
        if self.contains(snapshot.id()) {
            return Ok(false);
        }
        self.items.push(snapshot);
        Ok(true)
    }

    /// Remove a product. Removing an absent product is a no-op.
    pub fn remove(&mut self, product_id: &ProductId) -> Option<ProductSnapshot> {
        let index = self.items.iter().position(|item| item.id() == product_id)?;
        Some(self.items.remove(index))
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.iter().any(|item| item.id() == product_id)
    }

    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&ProductSnapshot> {
        self.items.iter().find(|item| item.id() == product_id)
    }

    /// Entries in the order they were added.
    #[must_use]
    pub fn items(&self) -> &[ProductSnapshot] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove every entry. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.items.len();
        self.items.clear();
        removed
    }
}

/// Shared owner of the wishlist.
#[derive(Debug, Clone, Default)]
pub struct WishlistStore {
    inner: Arc<WishlistStoreInner>,
}

#[derive(Debug, Default)]
struct WishlistStoreInner {
    wishlist: Mutex<Wishlist>,
    observers: Observers<WishlistEvent>,
}

impl WishlistStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Wishlist> {
        self.inner
            .wishlist
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a product if absent. Returns `true` if it was inserted.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::InvalidArgument`] for an invalid snapshot.
    #[instrument(skip(self, snapshot), fields(product_id = %snapshot.id()))]
    pub fn add(&self, snapshot: ProductSnapshot) -> Result<bool> {
        let event = WishlistEvent::Added {
            product_id: snapshot.id().clone(),
            name: snapshot.name().to_string(),
        };
        let inserted = self.lock().add(snapshot)?;

        if inserted {
            debug!("Added to wishlist");
            self.inner.observers.notify(&event);
        }
        Ok(inserted)
    }

    /// Remove a product if present.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn remove(&self, product_id: &ProductId) -> Option<ProductSnapshot> {
        let removed = self.lock().remove(product_id);

        if let Some(snapshot) = &removed {
            debug!("Removed from wishlist");
            self.inner.observers.notify(&WishlistEvent::Removed {
                product_id: product_id.clone(),
                name: snapshot.name().to_string(),
            });
        }
        removed
    }

    /// Remove the product if present, add it otherwise.
    ///
    /// Returns whether the product is in the wishlist afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::InvalidArgument`] when adding an invalid
    /// snapshot.
    pub fn toggle(&self, snapshot: ProductSnapshot) -> Result<bool> {
        if self.remove(snapshot.id()).is_some() {
            return Ok(false);
        }
        self.add(snapshot)?;
        Ok(true)
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.lock().contains(product_id)
    }

    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<ProductSnapshot> {
        self.lock().get(product_id).cloned()
    }

    #[must_use]
    pub fn items(&self) -> Vec<ProductSnapshot> {
        self.lock().items().to_vec()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        if self.lock().clear() > 0 {
            debug!("Cleared wishlist");
            self.inner.observers.notify(&WishlistEvent::Cleared);
        }
    }

    pub fn subscribe(&self, observer: Arc<dyn Observer<WishlistEvent>>) -> SubscriptionId {
        self.inner.observers.subscribe(observer)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.observers.unsubscribe(id)
    }
}
