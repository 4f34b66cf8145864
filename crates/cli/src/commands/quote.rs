//! Order total estimate command.

use std::str::FromStr;

use rust_decimal::Decimal;
use shopfront_core::CurrencyCode;
use shopfront_store::{OrderTotals, estimate_order_total};
use tracing::info;

/// Parse a subtotal argument. Accepts an optional leading `$`.
fn parse_subtotal(input: &str) -> Result<Decimal, String> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let subtotal =
        Decimal::from_str(digits).map_err(|e| format!("Invalid subtotal {input:?}: {e}"))?;
    if subtotal.is_sign_negative() {
        return Err(format!("Subtotal cannot be negative: {input}"));
    }
    Ok(subtotal)
}

/// Log an order total breakdown, rounded to cents.
pub fn log_totals(totals: &OrderTotals, currency: CurrencyCode) {
    let totals = totals.rounded();
    let shipping = if totals.free_shipping() {
        "FREE".to_string()
    } else {
        currency.format(totals.shipping)
    };
    info!("Subtotal: {}", currency.format(totals.subtotal));
    info!("Shipping: {shipping}");
    info!("Tax:      {}", currency.format(totals.tax));
    info!("Total:    {}", currency.format(totals.total));
}

/// Estimate shipping, tax and total for a subtotal.
///
/// # Errors
///
/// Returns an error if the subtotal is not a non-negative decimal or is too
/// large to estimate.
pub fn quote(subtotal: &str) -> Result<(), Box<dyn std::error::Error>> {
    let subtotal = parse_subtotal(subtotal)?;
    let totals = estimate_order_total(subtotal)?;
    info!(
        subtotal = %totals.subtotal,
        shipping = %totals.shipping,
        tax = %totals.tax,
        total = %totals.total,
        "Order estimate"
    );
    log_totals(&totals, CurrencyCode::USD);
    Ok(())
}
