use crate::core::expense::ExpenseRecord;
use crate::core::money::{round_money, EPSILON};
use crate::core::party::ParticipantId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Net position of every participant in a group.
///
/// A positive balance means the participant is owed money.
/// A negative balance means the participant owes money.
///
/// Positions are accumulated exactly; readers get them rounded to
/// cents (HALF_UP). The unrounded values stay available through
/// [`raw_positions`](NetBalances::raw_positions) for the optimizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetBalances {
    positions: BTreeMap<ParticipantId, Decimal>,
}

impl NetBalances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an expense: the payer is credited the full total, every
    /// split participant is debited what they owe.
    pub fn apply_expense(&mut self, expense: &ExpenseRecord) {
        *self
            .positions
            .entry(expense.payer().clone())
            .or_insert(Decimal::ZERO) += expense.total();

        for split in expense.splits() {
            *self
                .positions
                .entry(split.participant.clone())
                .or_insert(Decimal::ZERO) -= split.amount;
        }
    }

    /// Add `amount` to a participant's position.
    pub fn adjust(&mut self, participant: ParticipantId, amount: Decimal) {
        *self.positions.entry(participant).or_insert(Decimal::ZERO) += amount;
    }

    /// Rounded balance of a participant; zero if unknown.
    pub fn balance(&self, participant: &ParticipantId) -> Decimal {
        round_money(
            self.positions
                .get(participant)
                .copied()
                .unwrap_or(Decimal::ZERO),
        )
    }

    /// Rounded balances in participant order.
    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, Decimal)> + '_ {
        self.positions.iter().map(|(id, v)| (id, round_money(*v)))
    }

    /// Unrounded positions, exactly as accumulated or supplied.
    pub fn raw_positions(&self) -> &BTreeMap<ParticipantId, Decimal> {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Exact sum of all positions. Zero for a self-consistent ledger.
    pub fn total(&self) -> Decimal {
        self.positions.values().sum()
    }

    /// Whether money is conserved: the positions sum to zero within one cent.
    pub fn is_balanced(&self) -> bool {
        self.total().abs() < EPSILON
    }

    /// Total amount owed to creditors (sum of positive rounded balances).
    /// This is what actually has to change hands to settle the group.
    pub fn total_outstanding(&self) -> Decimal {
        self.iter()
            .map(|(_, v)| v)
            .filter(|v| *v > Decimal::ZERO)
            .sum()
    }
}

impl FromIterator<(ParticipantId, Decimal)> for NetBalances {
    fn from_iter<T: IntoIterator<Item = (ParticipantId, Decimal)>>(iter: T) -> Self {
        let mut balances = Self::new();
        for (id, amount) in iter {
            balances.adjust(id, amount);
        }
        balances
    }
}
