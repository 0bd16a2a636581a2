use proptest::prelude::*;
use rust_decimal::Decimal;
use settleup_engine::core::expense::{ExpenseRecord, SplitEntry, SplitRule};
use settleup_engine::core::ledger::NetBalances;
use settleup_engine::core::money::EPSILON;
use settleup_engine::core::party::ParticipantId;
use settleup_engine::optimization::balance::BalanceAggregator;
use settleup_engine::optimization::settlement::SettlementOptimizer;
use settleup_engine::split::{compute_equal_split, EqualSplit, SplitContext, SplitStrategy};
use std::collections::HashMap;

/// A small pool of participants so expenses overlap.
fn pool() -> Vec<ParticipantId> {
    ["A", "B", "C", "D", "E", "F"]
        .into_iter()
        .map(ParticipantId::new)
        .collect()
}

fn arb_participant() -> impl Strategy<Value = ParticipantId> {
    prop::sample::select(pool())
}

/// A positive cent amount (0.01 to 100,000.00).
fn arb_total() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// An equally split expense among a random non-empty subset.
fn arb_expense() -> impl Strategy<Value = ExpenseRecord> {
    (
        arb_participant(),
        prop::sample::subsequence(pool(), 1..=6),
        arb_total(),
    )
        .prop_map(|(payer, owers, total)| {
            let ctx = SplitContext { total, members: &owers, explicit: None };
            // too small to share: the payer keeps the whole cost
            let splits = EqualSplit
                .split(&ctx)
                .unwrap_or_else(|_| vec![SplitEntry::new(payer.clone(), total)]);
            ExpenseRecord::new("generated", total, payer, SplitRule::Equal, splits)
        })
}

/// Balances that sum to zero: random cents for all but one participant,
/// the last absorbs the difference.
fn arb_balances() -> impl Strategy<Value = NetBalances> {
    prop::collection::vec(-1_000_000i64..1_000_000i64, 1..30).prop_map(|cents| {
        let mut entries: Vec<(ParticipantId, Decimal)> = cents
            .iter()
            .enumerate()
            .map(|(i, c)| (ParticipantId::new(format!("P{:02}", i)), Decimal::new(*c, 2)))
            .collect();
        let sum: Decimal = entries.iter().map(|(_, v)| *v).sum();
        entries.push((ParticipantId::new("LAST"), -sum));
        entries.into_iter().collect()
    })
}

proptest! {
    // ===================================================================
    // Equal split always reconstructs the total, one entry per member.
    // Only the last entry can dip below zero, and then the strategy
    // refuses the split.
    // ===================================================================
    #[test]
    fn equal_split_sums_to_total(total in arb_total(), n in 1usize..40) {
        let ids: Vec<ParticipantId> =
            (0..n).map(|i| ParticipantId::new(format!("M{}", i))).collect();
        let splits = compute_equal_split(total, &ids).unwrap();
        prop_assert_eq!(splits.len(), n);
        let sum: Decimal = splits.iter().map(|s| s.amount).sum();
        prop_assert_eq!(sum, total);
        prop_assert!(splits[..n - 1].iter().all(|s| s.amount >= Decimal::ZERO));

        let ctx = SplitContext { total, members: &ids, explicit: None };
        let last_negative = splits[n - 1].amount < Decimal::ZERO;
        prop_assert_eq!(EqualSplit.split(&ctx).is_err(), last_negative);
    }

    // ===================================================================
    // Tiny totals across many members: accepted splits are never negative.
    // ===================================================================
    #[test]
    fn equal_split_small_totals(cents in 1i64..200, n in 2usize..40) {
        let total = Decimal::new(cents, 2);
        let ids: Vec<ParticipantId> =
            (0..n).map(|i| ParticipantId::new(format!("M{}", i))).collect();
        let ctx = SplitContext { total, members: &ids, explicit: None };
        match EqualSplit.split(&ctx) {
            Ok(splits) => {
                prop_assert!(splits.iter().all(|s| s.amount >= Decimal::ZERO));
                let sum: Decimal = splits.iter().map(|s| s.amount).sum();
                prop_assert_eq!(sum, total);
            }
            Err(e) => prop_assert!(e.is_validation()),
        }
    }

    // ===================================================================
    // Aggregation conserves money: balances sum to zero.
    // ===================================================================
    #[test]
    fn aggregate_conserves_money(expenses in prop::collection::vec(arb_expense(), 0..40)) {
        let balances = BalanceAggregator::aggregate(&expenses);
        prop_assert!(balances.total().abs() < EPSILON);
        prop_assert!(SettlementOptimizer::validate_conservation(&balances));
    }

    // ===================================================================
    // Replaying transfers drives every balance to zero.
    // ===================================================================
    #[test]
    fn settle_reconciles(balances in arb_balances()) {
        let transfers = SettlementOptimizer::settle(&balances);
        let mut remaining: HashMap<ParticipantId, Decimal> = balances
            .raw_positions()
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        for t in &transfers {
            *remaining.entry(t.from.clone()).or_insert(Decimal::ZERO) += t.amount;
            *remaining.entry(t.to.clone()).or_insert(Decimal::ZERO) -= t.amount;
        }
        for (p, left) in remaining {
            prop_assert!(left.abs() < EPSILON, "{} left with {}", p, left);
        }
    }

    // ===================================================================
    // At most k - 1 transfers for k non-negligible balances.
    // ===================================================================
    #[test]
    fn settle_respects_transfer_bound(balances in arb_balances()) {
        let transfers = SettlementOptimizer::settle(&balances);
        let k = balances.iter().filter(|(_, v)| v.abs() >= EPSILON).count();
        prop_assert!(transfers.len() <= k.saturating_sub(1));
    }

    // ===================================================================
    // Every transfer moves at least a cent between distinct parties.
    // ===================================================================
    #[test]
    fn transfers_are_meaningful(balances in arb_balances()) {
        for t in SettlementOptimizer::settle(&balances) {
            prop_assert!(t.amount >= EPSILON);
            prop_assert!(t.amount.scale() <= 2);
            prop_assert_ne!(t.from, t.to);
        }
    }

    // ===================================================================
    // Full pipeline: expenses settle to a reconciling transfer list.
    // ===================================================================
    #[test]
    fn pipeline_settles_completely(expenses in prop::collection::vec(arb_expense(), 1..30)) {
        let balances = BalanceAggregator::aggregate(&expenses);
        let transfers = SettlementOptimizer::settle(&balances);
        let paid: Decimal = transfers.iter().map(|t| t.amount).sum();
        prop_assert_eq!(paid, balances.total_outstanding());
    }
}

#[test]
fn unbalanced_input_fails_conservation() {
    let balances: NetBalances = vec![
        (ParticipantId::new("A"), Decimal::new(5000, 2)),
        (ParticipantId::new("B"), Decimal::new(-4000, 2)),
    ]
    .into_iter()
    .collect();
    assert!(!SettlementOptimizer::validate_conservation(&balances));
}
