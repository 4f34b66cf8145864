//! Session replay command.
//!
//! Reads a YAML session script, replays it against a fresh cart and wishlist,
//! and logs every change the way the screens would surface it.
//!
//! # Usage
//!
//! ```bash
//! shop-cli session run demos/weekend.yaml          # ask before removals and checkout
//! shop-cli session run demos/weekend.yaml --yes    # confirm everything
//! shop-cli session run demos/weekend.yaml --json   # final report as JSON
//! ```

use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use shopfront_core::CurrencyCode;
use shopfront_store::script::{ScriptError, Session, SessionReport, SessionScript};
use shopfront_store::{
    AlwaysConfirm, CartEvent, CartStore, Catalog, Confirm, Prompt, WishlistEvent, WishlistStore,
};
use tracing::{info, warn};

use super::quote::log_totals;

/// Asks on the terminal. Anything other than `y`/`yes` cancels.
struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &Prompt) -> bool {
        let mut stderr = std::io::stderr().lock();
        if write!(stderr, "{} [y/N] ", prompt.message())
            .and_then(|()| stderr.flush())
            .is_err()
        {
            return false;
        }

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn describe_cart_event(event: &CartEvent) -> String {
    match event {
        CartEvent::ItemAdded {
            product_id,
            added,
            quantity,
        } => format!("Cart: +{added} of product {product_id} (now {quantity})"),
        CartEvent::QuantityUpdated {
            product_id,
            quantity,
        } => format!("Cart: product {product_id} quantity set to {quantity}"),
        CartEvent::ItemRemoved { product_id } => {
            format!("Cart: product {product_id} removed")
        }
        CartEvent::Cleared => "Cart: cleared".to_string(),
    }
}

fn describe_wishlist_event(event: &WishlistEvent) -> String {
    match event {
        WishlistEvent::Added { name, .. } => {
            format!("Wishlist: {name} has been added to your wishlist")
        }
        WishlistEvent::Removed { name, .. } => {
            format!("Wishlist: {name} has been removed from your wishlist")
        }
        WishlistEvent::Cleared => "Wishlist: cleared".to_string(),
    }
}

/// Replay a script against fresh stores, logging every change.
///
/// Blocks on the terminal when `auto_confirm` is off.
fn replay(
    catalog: &Catalog,
    script: &SessionScript,
    auto_confirm: bool,
) -> Result<SessionReport, ScriptError> {
    let cart = CartStore::new();
    let wishlist = WishlistStore::new();
    cart.subscribe(Arc::new(|event: &CartEvent| {
        info!("{}", describe_cart_event(event));
    }));
    wishlist.subscribe(Arc::new(|event: &WishlistEvent| {
        info!("{}", describe_wishlist_event(event));
    }));

    let confirm: &dyn Confirm = if auto_confirm {
        &AlwaysConfirm
    } else {
        &TerminalConfirm
    };
    Session::new(catalog, &cart, &wishlist, confirm).run(script)
}

fn log_report(report: &SessionReport) {
    let currency = report
        .lines
        .first()
        .map_or_else(CurrencyCode::default, |line| {
            line.snapshot().unit_price().currency_code
        });
    let plural = if report.item_count == 1 { "" } else { "s" };
    info!(
        "Shopping cart: {} item{plural} - {}",
        report.item_count,
        currency.format(report.subtotal)
    );
    for line in &report.lines {
        info!(
            "  {} x{} @ {} = {}",
            line.snapshot().name(),
            line.quantity(),
            line.snapshot().unit_price().display(),
            currency.format(line.line_total())
        );
    }
    log_totals(&report.totals, currency);

    info!("Wishlist: {} item(s)", report.wishlist.len());
    for item in &report.wishlist {
        info!("  {}", item.name());
    }

    for order in &report.orders {
        info!(
            confirmation_id = %order.confirmation_id,
            placed_at = %order.placed_at,
            "Order placed successfully! Thank you for shopping with us."
        );
    }
}

/// Replay a session script.
///
/// With `json`, the final report is printed to stdout as a JSON document and
/// logs stay on stderr.
///
/// # Errors
///
/// Returns an error if the script cannot be read or parsed, or a step fails.
pub async fn run(
    catalog: Catalog,
    file: &Path,
    auto_confirm: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = tokio::fs::read_to_string(file)
        .await
        .map_err(|e| format!("Cannot read session script {}: {e}", file.display()))?;
    let script: SessionScript = serde_yaml::from_str(&content)?;

    info!(
        path = %file.display(),
        steps = script.steps.len(),
        auto_confirm,
        "Loaded session script"
    );

    // Terminal confirmation reads stdin synchronously.
    let replayed =
        tokio::task::spawn_blocking(move || replay(&catalog, &script, auto_confirm)).await?;
    let report = match replayed {
        Ok(report) => report,
        Err(e) => {
            warn!(step = e.index, action = e.action, "Session stopped");
            return Err(e.into());
        }
    };

    if json {
        let document = serde_json::to_string_pretty(&report)?;
        #[allow(clippy::print_stdout)]
        {
            println!("{document}");
        }
        return Ok(());
    }

    log_report(&report);
    Ok(())
}
