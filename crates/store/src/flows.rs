//! Confirmation-gated cart flows.
//!
//! Removing a line and checking out both ask the user first. The question is
//! put through a [`Confirm`] implementation so the same flow runs behind an
//! interactive prompt, a scripted session or a test.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shopfront_core::ProductId;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::cart::{CartStore, LineItem};
use crate::error::{Result, StoreError};
use crate::totals::OrderTotals;

/// A question put to the user before a destructive action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    RemoveItem { product_id: ProductId, name: String },
    Checkout { item_count: u64 },
}

impl Prompt {
    /// Human-readable question.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::RemoveItem { name, .. } => {
                format!("Are you sure you want to remove \"{name}\" from your cart?")
            }
            Self::Checkout { item_count } => {
                let plural = if *item_count == 1 { "" } else { "s" };
                format!("Proceed to payment for {item_count} item{plural}?")
            }
        }
    }
}

/// Answers a [`Prompt`]. `false` means cancel.
pub trait Confirm {
    fn confirm(&self, prompt: &Prompt) -> bool;
}

/// Confirms everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &Prompt) -> bool {
        true
    }
}

/// Cancels everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConfirm;

impl Confirm for NeverConfirm {
    fn confirm(&self, _prompt: &Prompt) -> bool {
        false
    }
}

/// Outcome of [`remove_with_confirmation`].
#[derive(Debug, Clone, PartialEq)]
pub enum Removal {
    Removed(LineItem),
    Cancelled,
    /// There was no line to remove; nothing was asked.
    Absent,
}

/// Outcome of [`change_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    Updated(u32),
    Removed,
    Cancelled,
}

/// A simulated order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderConfirmation {
    pub confirmation_id: Uuid,
    pub placed_at: DateTime<Utc>,
    pub item_count: u64,
    pub lines: Vec<LineItem>,
    pub totals: OrderTotals,
}

/// Remove a line after the user confirms.
///
/// Cancelling leaves the cart untouched.
#[instrument(skip(store, confirm), fields(product_id = %product_id))]
pub fn remove_with_confirmation(
    store: &CartStore,
    product_id: &ProductId,
    confirm: &dyn Confirm,
) -> Removal {
    let Some(line) = store.line(product_id) else {
        return Removal::Absent;
    };

    let prompt = Prompt::RemoveItem {
        product_id: product_id.clone(),
        name: line.snapshot().name().to_string(),
    };
    if !confirm.confirm(&prompt) {
        return Removal::Cancelled;
    }

    // A line removed in the meantime counts as already gone.
    store
        .remove_item(product_id)
        .map_or(Removal::Absent, Removal::Removed)
}

/// Quantity stepper: a value of zero or below asks to remove the line,
/// anything else sets the quantity.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] if the product has no line.
pub fn change_quantity(
    store: &CartStore,
    product_id: &ProductId,
    new_quantity: i64,
    confirm: &dyn Confirm,
) -> Result<QuantityChange> {
    if !store.contains(product_id) {
        return Err(StoreError::NotFound(product_id.clone()));
    }

    if new_quantity <= 0 {
        return Ok(match remove_with_confirmation(store, product_id, confirm) {
            Removal::Removed(_) | Removal::Absent => QuantityChange::Removed,
            Removal::Cancelled => QuantityChange::Cancelled,
        });
    }

    store.update_quantity(product_id, new_quantity)?;
    let quantity = store.line(product_id).map_or(0, |line| line.quantity());
    Ok(QuantityChange::Updated(quantity))
}

/// Simulated checkout.
///
/// Returns `Ok(None)` if the user cancels. The cart is not cleared; payment
/// never actually happens.
///
/// # Errors
///
/// Returns [`StoreError::InvalidArgument`] if the cart is empty.
#[instrument(skip_all)]
pub fn checkout(store: &CartStore, confirm: &dyn Confirm) -> Result<Option<OrderConfirmation>> {
    let cart = store.snapshot();
    if cart.is_empty() {
        return Err(StoreError::InvalidArgument("cart is empty".to_string()));
    }

    let item_count = cart.item_count();
    if !confirm.confirm(&Prompt::Checkout { item_count }) {
        return Ok(None);
    }

    let order = OrderConfirmation {
        confirmation_id: Uuid::new_v4(),
        placed_at: Utc::now(),
        item_count,
        totals: cart.order_totals(),
        lines: cart.lines().to_vec(),
    };
    info!(
        confirmation_id = %order.confirmation_id,
        item_count,
        total = %order.totals.total,
        "Order placed"
    );
    Ok(Some(order))
}
