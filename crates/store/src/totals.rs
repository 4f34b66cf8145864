//! Order total estimate.
//!
//! Fixed policy: free shipping strictly above $50, otherwise a flat $9.99,
//! and 8% tax on the subtotal. No regional or jurisdiction logic.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{Result, StoreError};

/// Subtotals strictly above this ship free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Flat shipping charge below the threshold.
pub const FLAT_SHIPPING: Decimal = Decimal::from_parts(999, 0, 0, false, 2);

/// Tax rate applied to the subtotal.
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Largest subtotal an estimate accepts (10^18). Carts never hold more.
pub const MAX_SUBTOTAL: Decimal = Decimal::from_parts(0xA764_0000, 0x0DE0_B6B3, 0, false, 0);

/// Breakdown of an estimated order total.
///
/// Values are exact; use [`OrderTotals::rounded`] for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    /// Whether this order ships free.
    #[must_use]
    pub fn free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }

    /// Copy with every component rounded to cents.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            subtotal: self.subtotal.round_dp(2),
            shipping: self.shipping.round_dp(2),
            tax: self.tax.round_dp(2),
            total: self.total.round_dp(2),
        }
    }
}

/// Estimate shipping, tax and total for a subtotal.
///
/// # Errors
///
/// Returns [`StoreError::InvalidArgument`] if `subtotal` is negative or
/// above [`MAX_SUBTOTAL`].
pub fn estimate_order_total(subtotal: Decimal) -> Result<OrderTotals> {
    if subtotal < Decimal::ZERO || subtotal > MAX_SUBTOTAL {
        return Err(StoreError::InvalidArgument(format!(
            "subtotal {subtotal} is outside 0..={MAX_SUBTOTAL}"
        )));
    }
    Ok(estimate(subtotal))
}

/// Estimate for a subtotal already known to be within `0..=MAX_SUBTOTAL`.
pub(crate) fn estimate(subtotal: Decimal) -> OrderTotals {
    let shipping = if subtotal > FREE_SHIPPING_THRESHOLD {
        Decimal::ZERO
    } else {
        FLAT_SHIPPING
    };
    let tax = subtotal * TAX_RATE;

    OrderTotals {
        subtotal,
        shipping,
        tax,
        total: subtotal + shipping + tax,
    }
}
