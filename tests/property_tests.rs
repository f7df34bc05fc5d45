//! Property-based tests for the vendor ledger arithmetic.
//!
//! These tests use proptest to verify the ledger invariants across a wide
//! range of inputs, helping to catch edge cases that unit tests might miss.

use dairyledger_api::ledger::{line_total, require_positive, LedgerDelta};
use proptest::prelude::*;
use rust_decimal::Decimal;

// Strategies for generating test data

/// Currency amounts between 0.01 and 9,999,999.99 with two decimal places.
fn money_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Milk quantities between 0.01 and 99,999.99 litres.
fn quantity_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000).prop_map(|centilitres| Decimal::new(centilitres, 2))
}

#[derive(Debug, Clone)]
enum LedgerOp {
    Procure(Decimal),
    Pay(Decimal),
}

fn ledger_op_strategy() -> impl Strategy<Value = LedgerOp> {
    prop_oneof![
        money_strategy().prop_map(LedgerOp::Procure),
        money_strategy().prop_map(LedgerOp::Pay),
    ]
}

proptest! {
    // current_balance == total_procurement - total_paid after any sequence
    // of procurement and payment deltas.
    #[test]
    fn ledger_invariant_holds_for_any_event_sequence(
        ops in prop::collection::vec(ledger_op_strategy(), 0..50)
    ) {
        let mut balance = Decimal::ZERO;
        let mut procurement = Decimal::ZERO;
        let mut paid = Decimal::ZERO;

        for op in ops {
            let delta = match op {
                LedgerOp::Procure(amount) => LedgerDelta::procurement_recorded(amount),
                LedgerOp::Pay(amount) => LedgerDelta::payment_recorded(amount),
            };
            balance += delta.balance;
            procurement += delta.procurement;
            paid += delta.paid;
        }

        prop_assert_eq!(balance, procurement - paid);
    }

    // Creating then deleting an entry is an exact no-op on all three
    // projections, with no rounding drift.
    #[test]
    fn create_then_delete_is_an_exact_reversal(amount in money_strategy()) {
        let create = LedgerDelta::procurement_recorded(amount);
        let delete = LedgerDelta::procurement_deleted(amount);

        prop_assert_eq!(create.balance + delete.balance, Decimal::ZERO);
        prop_assert_eq!(create.procurement + delete.procurement, Decimal::ZERO);
        prop_assert_eq!(create.paid + delete.paid, Decimal::ZERO);
    }

    // Adjusting from old to new equals deleting old and recording new.
    #[test]
    fn adjustment_equals_delete_plus_create(
        old_total in money_strategy(),
        new_total in money_strategy(),
    ) {
        let adjusted = LedgerDelta::procurement_adjusted(old_total, new_total);
        let via_replay = LedgerDelta::procurement_deleted(old_total);
        let create = LedgerDelta::procurement_recorded(new_total);

        prop_assert_eq!(adjusted.balance, via_replay.balance + create.balance);
        prop_assert_eq!(
            adjusted.procurement,
            via_replay.procurement + create.procurement
        );
    }

    // Line totals carry at most two decimal places and scale linearly in
    // whole-litre quantities.
    #[test]
    fn line_total_has_currency_precision(
        quantity in quantity_strategy(),
        rate in money_strategy(),
    ) {
        let total = line_total(quantity, rate);
        prop_assert!(total.scale() <= 2, "total {} has scale {}", total, total.scale());
        prop_assert!(total >= Decimal::ZERO);
    }

    #[test]
    fn whole_litre_totals_are_exact(litres in 1i64..100_000, rate in money_strategy()) {
        let total = line_total(Decimal::from(litres), rate);
        prop_assert_eq!(total, rate * Decimal::from(litres));
    }

    // Validation accepts exactly the positive inputs.
    #[test]
    fn positive_amounts_pass_validation(amount in money_strategy()) {
        prop_assert!(require_positive("amount", amount).is_ok());
    }

    #[test]
    fn non_positive_amounts_fail_validation(cents in -1_000_000_000i64..=0) {
        let amount = Decimal::new(cents, 2);
        prop_assert!(require_positive("amount", amount).is_err());
    }
}
