use crate::core::expense::ExpenseRecord;
use crate::core::ledger::NetBalances;

/// Balance Aggregator: folds recorded expenses into net balances.
pub struct BalanceAggregator;

impl BalanceAggregator {
    /// Compute every participant's net balance across `expenses`.
    ///
    /// The payer of each expense is credited its full total and each
    /// split participant is debited what they owe, so a payer's own
    /// share nets out against their credit. Accumulation is exact;
    /// [`NetBalances`] rounds to cents on read.
    ///
    /// Empty input gives empty balances. There is no failure path.
    ///
    /// # Examples
    ///
    /// ```
    /// use settleup_engine::core::expense::{ExpenseRecord, SplitEntry, SplitRule};
    /// use settleup_engine::core::party::ParticipantId;
    /// use settleup_engine::optimization::balance::BalanceAggregator;
    /// use rust_decimal_macros::dec;
    ///
    /// let [a, b, c] = ["a", "b", "c"].map(ParticipantId::new);
    /// let dinner = ExpenseRecord::new("Dinner", dec!(90.00), a.clone(), SplitRule::Equal, vec![
    ///     SplitEntry::new(a.clone(), dec!(30.00)),
    ///     SplitEntry::new(b.clone(), dec!(30.00)),
    ///     SplitEntry::new(c.clone(), dec!(30.00)),
    /// ]);
    ///
    /// let balances = BalanceAggregator::aggregate(&[dinner]);
    /// assert_eq!(balances.balance(&a), dec!(60.00));
    /// assert_eq!(balances.balance(&b), dec!(-30.00));
    /// ```
    pub fn aggregate(expenses: &[ExpenseRecord]) -> NetBalances {
        let mut balances = NetBalances::new();
        for expense in expenses {
            balances.apply_expense(expense);
        }
        log::debug!(
            "aggregated {} expenses into {} balances",
            expenses.len(),
            balances.len()
        );
        balances
    }
}
