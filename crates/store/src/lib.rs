//! Shopfront Store - In-memory storefront state.
//!
//! This crate owns everything the screens read and mutate:
//!
//! - [`catalog`] - The static product catalog, category listing and search
//! - [`cart`] - Quantity-tracked cart lines with derived item count and subtotal
//! - [`wishlist`] - The same pattern applied to a set of products
//! - [`totals`] - Shipping and tax estimate for a subtotal
//! - [`flows`] - Confirmation-gated removal, quantity stepping and checkout
//! - [`observer`] - Change notifications for the presentation layer
//! - [`script`] - Replayable sessions of user actions
//!
//! # Architecture
//!
//! Stores are plain objects behind a single mutex. There is no persistence and
//! no background work: every operation is synchronous and completes
//! immediately. Derived values are recomputed from current state on every
//! read.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod error;
pub mod flows;
pub mod observer;
pub mod script;
pub mod totals;
pub mod wishlist;

pub use cart::{Cart, CartEvent, CartStore, LineItem};
pub use catalog::{Catalog, CatalogError};
pub use error::{Result, StoreError};
pub use flows::{AlwaysConfirm, Confirm, NeverConfirm, OrderConfirmation, Prompt};
pub use observer::{Observer, Observers, SubscriptionId};
pub use totals::{MAX_SUBTOTAL, OrderTotals, estimate_order_total};
pub use wishlist::{Wishlist, WishlistEvent, WishlistStore};
