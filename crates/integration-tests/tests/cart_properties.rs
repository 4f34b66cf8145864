//! Integration tests for the cart store.
//!
//! These exercise the public store API end to end: invariants over sequences
//! of operations, derived totals, and the documented order scenarios.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use shopfront_integration_tests::fixtures::{catalog, product_id, snapshot};
use shopfront_store::flows::{self, AlwaysConfirm, NeverConfirm, QuantityChange};
use shopfront_store::{CartStore, StoreError, estimate_order_total};

// =============================================================================
// Invariants
// =============================================================================

#[test]
fn test_adds_of_one_product_sum_into_one_line() {
    let store = CartStore::new();
    let quantities = [1, 4, 2, 7, 1];
    for quantity in quantities {
        store.add_item(snapshot("p1", 1000), quantity).unwrap();
    }

    let lines = store.lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity(), quantities.iter().sum::<u32>());
}

#[test]
fn test_non_positive_updates_remove_the_line() {
    let store = CartStore::new();
    store.add_item(snapshot("a", 1000), 3).unwrap();
    store.add_item(snapshot("b", 1000), 3).unwrap();

    store.update_quantity(&product_id("a"), 0).unwrap();
    store.update_quantity(&product_id("b"), -5).unwrap();

    assert!(!store.contains(&product_id("a")));
    assert!(!store.contains(&product_id("b")));
    assert!(store.is_empty());
}

#[test]
fn test_remove_absent_id_is_silent() {
    let store = CartStore::new();
    store.add_item(snapshot("a", 1000), 1).unwrap();
    let before = store.snapshot();

    assert!(store.remove_item(&product_id("missing")).is_none());
    assert_eq!(store.snapshot(), before);
}

#[test]
fn test_derived_values_track_every_mutation() {
    let store = CartStore::new();
    let check = |store: &CartStore| {
        let lines = store.lines();
        let count: u64 = lines.iter().map(|l| u64::from(l.quantity())).sum();
        let subtotal: Decimal = lines
            .iter()
            .map(|l| l.snapshot().unit_price().amount * Decimal::from(l.quantity()))
            .sum();
        assert_eq!(store.item_count(), count);
        assert_eq!(store.subtotal(), subtotal);
    };

    store.add_item(snapshot("a", 1999), 2).unwrap();
    check(&store);
    store.add_item(snapshot("b", 349), 5).unwrap();
    check(&store);
    store.update_quantity(&product_id("a"), 7).unwrap();
    check(&store);
    store.remove_item(&product_id("b"));
    check(&store);
    store.clear();
    check(&store);
}

#[test]
fn test_clear_is_idempotent() {
    let store = CartStore::new();
    store.add_item(snapshot("a", 1000), 1).unwrap();
    store.clear();
    let once = store.snapshot();
    store.clear();
    assert_eq!(store.snapshot(), once);
    assert_eq!(store.item_count(), 0);
}

#[test]
fn test_rejected_input_leaves_state_unchanged() {
    let store = CartStore::new();
    store.add_item(snapshot("a", 1000), 2).unwrap();
    let before = store.snapshot();

    assert!(matches!(
        store.add_item(snapshot("a", 1000), 0),
        Err(StoreError::InvalidArgument(_))
    ));
    assert!(matches!(
        store.add_item(snapshot("b", 0), 1),
        Err(StoreError::InvalidArgument(_))
    ));
    assert_eq!(
        store.update_quantity(&product_id("zzz"), 4),
        Err(StoreError::NotFound(product_id("zzz")))
    );
    assert_eq!(store.snapshot(), before);
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_two_products_below_free_shipping() {
    let store = CartStore::new();
    store.add_item(snapshot("P1", 1000), 2).unwrap();
    store.add_item(snapshot("P2", 500), 1).unwrap();

    assert_eq!(store.item_count(), 3);
    assert_eq!(store.subtotal(), Decimal::new(2500, 2));

    let totals = estimate_order_total(store.subtotal()).unwrap();
    assert_eq!(totals.shipping, Decimal::new(999, 2));
    assert_eq!(totals.tax, Decimal::new(200, 2));
    assert_eq!(totals.total, Decimal::new(3699, 2));
}

#[test]
fn test_free_shipping_threshold_is_strict() {
    let totals = estimate_order_total(Decimal::new(5001, 2)).unwrap();
    assert_eq!(totals.shipping, Decimal::ZERO);
    assert_eq!(totals.tax, Decimal::new(40008, 4));
    assert_eq!(totals.total, Decimal::new(540_108, 4));

    let at_threshold = estimate_order_total(Decimal::new(5000, 2)).unwrap();
    assert_eq!(at_threshold.shipping, Decimal::new(999, 2));
}

#[test]
fn test_add_update_remove_ends_empty() {
    let store = CartStore::new();
    store.add_item(snapshot("P1", 1000), 2).unwrap();
    store.update_quantity(&product_id("P1"), 1).unwrap();
    store.remove_item(&product_id("P1"));
    assert!(store.lines().is_empty());
}

#[test]
fn test_catalog_price_change_does_not_reach_cart() {
    let catalog = catalog().unwrap();
    let store = CartStore::new();
    let mut headphones = catalog.get(&product_id("2")).unwrap().clone();
    store.add_one(headphones.snapshot()).unwrap();

    headphones.price.amount = Decimal::new(1, 2);
    store.add_one(headphones.snapshot()).unwrap();

    let line = store.line(&product_id("2")).unwrap();
    assert_eq!(line.quantity(), 2);
    assert_eq!(line.snapshot().unit_price().amount, Decimal::new(19999, 2));
    assert_eq!(store.subtotal(), Decimal::new(39998, 2));
}

// =============================================================================
// Confirmation Flows
// =============================================================================

#[test]
fn test_cancelled_confirmations_never_mutate() {
    let store = CartStore::new();
    store.add_item(snapshot("a", 1000), 1).unwrap();
    let before = store.snapshot();

    flows::remove_with_confirmation(&store, &product_id("a"), &NeverConfirm);
    assert_eq!(
        flows::change_quantity(&store, &product_id("a"), 0, &NeverConfirm).unwrap(),
        QuantityChange::Cancelled
    );
    assert!(flows::checkout(&store, &NeverConfirm).unwrap().is_none());

    assert_eq!(store.snapshot(), before);
}

#[test]
fn test_checkout_reports_order_totals() {
    let store = CartStore::new();
    store.add_item(snapshot("a", 3000), 2).unwrap();

    let order = flows::checkout(&store, &AlwaysConfirm).unwrap().unwrap();
    assert_eq!(order.item_count, 2);
    assert_eq!(order.totals.subtotal, Decimal::new(6000, 2));
    assert!(order.totals.free_shipping());
    assert_eq!(order.totals.total, Decimal::new(6480, 2));

    let json = serde_json::to_value(&order).unwrap();
    assert_eq!(json["item_count"], 2);
    assert!(json["confirmation_id"].is_string());
}
