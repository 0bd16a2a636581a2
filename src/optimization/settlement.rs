use crate::core::directory::ExpenseProvider;
use crate::core::ledger::NetBalances;
use crate::core::money::{is_negligible, round_money, EPSILON};
use crate::core::party::ParticipantId;
use crate::optimization::balance::BalanceAggregator;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BinaryHeap;
use std::fmt;

/// A single payment that moves money from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: ParticipantId,
    pub to: ParticipantId,
    /// Always positive, in cents.
    pub amount: Decimal,
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} pays {} {}", self.from, self.to, self.amount)
    }
}

/// Heap entry: a participant and the magnitude still to be settled.
/// Ordered by magnitude first so the heap yields the largest position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Position {
    magnitude: Decimal,
    participant: ParticipantId,
}

/// Settlement Optimizer: reduces net balances to a short list of transfers.
pub struct SettlementOptimizer;

impl SettlementOptimizer {
    /// Produce transfers that bring every balance to zero.
    ///
    /// # Algorithm
    ///
    /// 1. Drop balances whose raw magnitude is below one cent, then round
    ///    the rest to cents (HALF_UP).
    /// 2. Put creditors and debtors (as positive magnitudes) in two
    ///    max-heaps.
    /// 3. Repeatedly pair the largest creditor with the largest debtor and
    ///    transfer the smaller of the two magnitudes. Whoever has a
    ///    remainder of at least one cent goes back on its heap.
    /// 4. Stop when either heap is empty.
    ///
    /// Every round fully settles at least one of the pair, so `k` non-zero
    /// balances yield at most `k - 1` transfers in O(k log k). This is a
    /// greedy bound, not a guaranteed global minimum. Which of two equal
    /// magnitudes is matched first is unspecified.
    ///
    /// # Examples
    ///
    /// ```
    /// use settleup_engine::core::ledger::NetBalances;
    /// use settleup_engine::core::party::ParticipantId;
    /// use settleup_engine::optimization::settlement::SettlementOptimizer;
    /// use rust_decimal_macros::dec;
    ///
    /// let balances: NetBalances = vec![
    ///     (ParticipantId::new("a"), dec!(100.00)),
    ///     (ParticipantId::new("b"), dec!(-60.00)),
    ///     (ParticipantId::new("c"), dec!(-40.00)),
    /// ].into_iter().collect();
    ///
    /// let transfers = SettlementOptimizer::settle(&balances);
    /// assert_eq!(transfers.len(), 2);
    /// assert!(transfers.iter().all(|t| t.to.as_str() == "a"));
    /// ```
    pub fn settle(balances: &NetBalances) -> Vec<Transfer> {
        let mut creditors = BinaryHeap::new();
        let mut debtors = BinaryHeap::new();

        for (participant, raw) in balances.raw_positions() {
            if is_negligible(*raw) {
                continue;
            }
            let balance = round_money(*raw);
            let position = Position {
                magnitude: balance.abs(),
                participant: participant.clone(),
            };
            if balance > Decimal::ZERO {
                creditors.push(position);
            } else {
                debtors.push(position);
            }
        }

        log::debug!(
            "partitioned {} balances into {} creditors and {} debtors",
            balances.len(),
            creditors.len(),
            debtors.len()
        );

        let mut transfers = Vec::new();
        while !creditors.is_empty() && !debtors.is_empty() {
            let (Some(creditor), Some(debtor)) = (creditors.pop(), debtors.pop()) else {
                break;
            };
            let amount = creditor.magnitude.min(debtor.magnitude);

            if amount >= EPSILON {
                log::debug!(
                    "transfer: {} pays {} {}",
                    debtor.participant,
                    creditor.participant,
                    amount
                );
                transfers.push(Transfer {
                    from: debtor.participant.clone(),
                    to: creditor.participant.clone(),
                    amount,
                });
            }

            let creditor_left = creditor.magnitude - amount;
            if creditor_left >= EPSILON {
                creditors.push(Position {
                    magnitude: creditor_left,
                    participant: creditor.participant,
                });
            }

            let debtor_left = debtor.magnitude - amount;
            if debtor_left >= EPSILON {
                debtors.push(Position {
                    magnitude: debtor_left,
                    participant: debtor.participant,
                });
            }
        }

        log::info!(
            "settlement complete: {} transfers generated",
            transfers.len()
        );
        transfers
    }

    /// Aggregate a group's expenses from `provider` and settle them.
    pub fn settle_group<P: ExpenseProvider + ?Sized>(provider: &P, group: &str) -> Vec<Transfer> {
        let expenses = provider.expenses_for(group);
        let balances = BalanceAggregator::aggregate(&expenses);
        log::info!(
            "settling group '{}' from {} expenses",
            group,
            expenses.len()
        );
        Self::settle(&balances)
    }

    /// Self-check: whether the balances sum to zero within one cent.
    ///
    /// Not used by [`settle`](Self::settle); a failure here means the
    /// balances were built from inconsistent expenses.
    pub fn validate_conservation(balances: &NetBalances) -> bool {
        let valid = balances.is_balanced();
        if !valid {
            log::warn!(
                "balance conservation check failed: sum is {} (should be ~0)",
                balances.total()
            );
        }
        valid
    }
}
