//! Generated operation sequences against the cart store.
//!
//! Every sequence is replayed against a plain list model; after each step the
//! store must agree with the model and hold its invariants.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use proptest::prelude::*;
use proptest::test_runner::Config;
use rust_decimal::Decimal;
use shopfront_integration_tests::fixtures::{product_id, snapshot};
use shopfront_store::{CartStore, StoreError};

const IDS: [&str; 5] = ["a", "b", "c", "d", "e"];

#[derive(Debug, Clone)]
enum Op {
    Add { id: usize, cents: i64, quantity: u32 },
    Update { id: usize, quantity: i64 },
    Remove { id: usize },
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..IDS.len(), 1_i64..10_000, 1_u32..20)
            .prop_map(|(id, cents, quantity)| Op::Add { id, cents, quantity }),
        3 => (0..IDS.len(), -3_i64..20).prop_map(|(id, quantity)| Op::Update { id, quantity }),
        2 => (0..IDS.len()).prop_map(|id| Op::Remove { id }),
        1 => Just(Op::Clear),
    ]
}

/// (id, unit price in cents, quantity) in display order.
type Model = Vec<(&'static str, i64, u32)>;

fn apply(store: &CartStore, model: &mut Model, op: &Op) {
    match *op {
        Op::Add { id, cents, quantity } => {
            store.add_item(snapshot(IDS[id], cents), quantity).unwrap();
            match model.iter_mut().find(|(m, _, _)| *m == IDS[id]) {
                Some(line) => line.2 += quantity,
                None => model.push((IDS[id], cents, quantity)),
            }
        }
        Op::Update { id, quantity } => {
            let result = store.update_quantity(&product_id(IDS[id]), quantity);
            match model.iter().position(|(m, _, _)| *m == IDS[id]) {
                None => assert_eq!(result, Err(StoreError::NotFound(product_id(IDS[id])))),
                Some(index) => {
                    result.unwrap();
                    if quantity <= 0 {
                        model.remove(index);
                    } else {
                        model[index].2 = u32::try_from(quantity).unwrap();
                    }
                }
            }
        }
        Op::Remove { id } => {
            let removed = store.remove_item(&product_id(IDS[id]));
            let index = model.iter().position(|(m, _, _)| *m == IDS[id]);
            assert_eq!(removed.is_some(), index.is_some());
            if let Some(index) = index {
                model.remove(index);
            }
        }
        Op::Clear => {
            store.clear();
            model.clear();
        }
    }
}

fn check(store: &CartStore, model: &Model) -> Result<(), TestCaseError> {
    let cart = store.snapshot();
    let lines = cart.lines();

    let mut seen = HashSet::new();
    for line in lines {
        prop_assert!(seen.insert(line.product_id().clone()), "duplicate line");
        prop_assert!(line.quantity() >= 1);
    }

    let observed: Model = lines
        .iter()
        .map(|line| {
            let id = IDS
                .iter()
                .copied()
                .find(|id| *id == line.product_id().as_str())
                .unwrap();
            let cents = line.snapshot().unit_price().amount * Decimal::ONE_HUNDRED;
            (id, i64::try_from(cents).unwrap(), line.quantity())
        })
        .collect();
    prop_assert_eq!(&observed, model);

    let count: u64 = model.iter().map(|(_, _, q)| u64::from(*q)).sum();
    let subtotal: Decimal = model
        .iter()
        .map(|(_, cents, q)| Decimal::new(*cents, 2) * Decimal::from(*q))
        .sum();
    prop_assert_eq!(cart.item_count(), count);
    prop_assert_eq!(cart.subtotal(), subtotal);
    prop_assert_eq!(cart.is_empty(), model.is_empty());
    Ok(())
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn cart_matches_model_after_every_step(ops in prop::collection::vec(op(), 1..40)) {
        let store = CartStore::new();
        let mut model = Model::new();
        for op in &ops {
            apply(&store, &mut model, op);
            check(&store, &model)?;
        }
    }

    #[test]
    fn repeated_adds_collapse_into_one_line(
        quantities in prop::collection::vec(1_u32..50, 1..20),
        cents in prop::collection::vec(1_i64..10_000, 20),
    ) {
        let store = CartStore::new();
        for (quantity, cents) in quantities.iter().zip(&cents) {
            store.add_item(snapshot("p1", *cents), *quantity).unwrap();
        }

        let lines = store.lines();
        prop_assert_eq!(lines.len(), 1);
        prop_assert_eq!(lines[0].quantity(), quantities.iter().sum::<u32>());
        prop_assert_eq!(
            lines[0].snapshot().unit_price().amount,
            Decimal::new(cents[0], 2)
        );
    }
}
