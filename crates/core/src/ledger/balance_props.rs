//! Property-based tests for ledger position bookkeeping.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balance::LedgerPosition;
use super::types::{TransactionEffect, TransactionKind};

/// Strategy for positive amounts with two decimal places.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..500_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn kind_strategy() -> impl Strategy<Value = TransactionKind> {
    prop_oneof![
        Just(TransactionKind::Purchase),
        Just(TransactionKind::Sale),
        Just(TransactionKind::Expense),
    ]
}

fn effect_strategy() -> impl Strategy<Value = TransactionEffect> {
    (kind_strategy(), amount_strategy(), 0i64..50).prop_map(|(kind, amount, tins)| {
        let tins = if kind == TransactionKind::Expense { 0 } else { tins };
        TransactionEffect::of(kind, amount, tins)
    })
}

/// Applies every effect, skipping the ones the ledger rejects.
fn apply_accepted(
    opening: Decimal,
    effects: &[TransactionEffect],
) -> (LedgerPosition, Vec<TransactionEffect>) {
    let mut position = LedgerPosition::opening(opening).unwrap();
    let mut accepted = Vec::new();
    for effect in effects {
        if let Ok(next) = position.apply(*effect) {
            position = next;
            accepted.push(*effect);
        }
    }
    (position, accepted)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Accepted operations never leave a negative balance or tin count.
    #[test]
    fn prop_position_never_negative(
        opening in amount_strategy(),
        effects in prop::collection::vec(effect_strategy(), 0..40),
    ) {
        let mut position = LedgerPosition::opening(opening).unwrap();
        for effect in effects {
            if let Ok(next) = position.apply(effect) {
                position = next;
            }
            prop_assert!(position.balance >= Decimal::ZERO);
            prop_assert!(position.tins >= 0);
        }
    }

    /// The incremental position always equals a from-scratch recompute.
    #[test]
    fn prop_incremental_equals_recompute(
        opening in amount_strategy(),
        effects in prop::collection::vec(effect_strategy(), 0..40),
    ) {
        let (position, accepted) = apply_accepted(opening, &effects);
        let recomputed = LedgerPosition::recompute(opening, accepted).unwrap();
        prop_assert_eq!(position, recomputed);
    }

    /// A rejected operation leaves the position unchanged.
    #[test]
    fn prop_rejection_has_no_effect(
        opening in amount_strategy(),
        effect in effect_strategy(),
    ) {
        let position = LedgerPosition::opening(opening).unwrap();
        match position.apply(effect) {
            Ok(next) => {
                prop_assert_eq!(next.balance, position.balance + effect.balance_delta);
                prop_assert_eq!(next.tins, position.tins + effect.tins_delta);
            }
            Err(_) => {
                prop_assert!(
                    position.balance + effect.balance_delta < Decimal::ZERO
                        || position.tins + effect.tins_delta < 0
                );
            }
        }
    }

    /// Editing a row to itself is a no-op.
    #[test]
    fn prop_replace_with_same_is_identity(
        opening in amount_strategy(),
        effects in prop::collection::vec(effect_strategy(), 1..20),
    ) {
        let (position, accepted) = apply_accepted(opening, &effects);
        for effect in accepted {
            prop_assert_eq!(position.replace(effect, effect).unwrap(), position);
        }
    }

    /// Deleting the most recent accepted row restores the previous position.
    #[test]
    fn prop_revert_last_restores_previous(
        opening in amount_strategy(),
        effects in prop::collection::vec(effect_strategy(), 1..20),
    ) {
        let (position, mut accepted) = apply_accepted(opening, &effects);
        if let Some(last) = accepted.pop() {
            let previous = LedgerPosition::recompute(opening, accepted).unwrap();
            prop_assert_eq!(position.revert(last).unwrap(), previous);
        }
    }
}
