//! Store error types.
//!
//! All store errors are local and synchronous. None are retryable and none
//! leave state half-mutated: inputs are checked before anything is written.

use shopfront_core::{ProductId, ProductSnapshot};
use thiserror::Error;

/// Error returned by cart and wishlist operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Rejected input: non-positive quantity, invalid snapshot, empty cart at checkout.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The referenced product has no entry.
    #[error("Not found: {0}")]
    NotFound(ProductId),
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Check that a snapshot can be stored.
///
/// Empty IDs are already unrepresentable in [`ProductId`], so only the price
/// needs checking here.
pub(crate) fn validate_snapshot(snapshot: &ProductSnapshot) -> Result<()> {
    if !snapshot.unit_price().is_positive() {
        return Err(StoreError::InvalidArgument(format!(
            "product {} must have a positive price, got {}",
            snapshot.id(),
            snapshot.unit_price().amount
        )));
    }
    Ok(())
}
