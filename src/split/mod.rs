//! Split Calculator: turns one expense into per-participant obligations.
//!
//! Each [`SplitRule`] is served by a [`SplitStrategy`] looked up in a
//! [`SplitStrategyRegistry`]. New rules plug in by registering another
//! strategy; [`record_expense`] and its callers stay unchanged.

mod equal;
mod exact;

pub use equal::{compute_equal_split, EqualSplit};
pub use exact::{compute_exact_split, ExactSplit};

use crate::core::error::{Result, SettleError};
use crate::core::expense::{ExpenseDraft, ExpenseRecord, SplitEntry, SplitRule};
use crate::core::group::Group;
use crate::core::money::{round_money, EPSILON};
use crate::core::party::ParticipantId;
use rust_decimal::Decimal;
use std::collections::HashMap;

const MAX_DESCRIPTION_LEN: usize = 255;

/// Everything a strategy may look at when splitting one expense.
#[derive(Debug, Clone, Copy)]
pub struct SplitContext<'a> {
    /// Expense total, already rounded to cents.
    pub total: Decimal,
    /// Group members in join order.
    pub members: &'a [ParticipantId],
    /// Caller-supplied amounts, if any.
    pub explicit: Option<&'a [SplitEntry]>,
}

/// One way of dividing an expense among participants.
pub trait SplitStrategy {
    /// The rule this strategy implements.
    fn rule(&self) -> SplitRule;

    /// Produce entries that add up to `ctx.total` exactly.
    fn split(&self, ctx: &SplitContext<'_>) -> Result<Vec<SplitEntry>>;
}

/// Lookup from [`SplitRule`] to the strategy that implements it.
pub struct SplitStrategyRegistry {
    strategies: HashMap<SplitRule, Box<dyn SplitStrategy + Send + Sync>>,
}

impl SplitStrategyRegistry {
    /// A registry with no strategies at all.
    pub fn empty() -> Self {
        Self {
            strategies: HashMap::new(),
        }
    }

    /// Register a strategy under its own rule, replacing any previous one.
    pub fn register(&mut self, strategy: Box<dyn SplitStrategy + Send + Sync>) {
        self.strategies.insert(strategy.rule(), strategy);
    }

    pub fn get(&self, rule: SplitRule) -> Result<&(dyn SplitStrategy + Send + Sync)> {
        self.strategies
            .get(&rule)
            .map(|s| &**s)
            .ok_or_else(|| SettleError::business_rule(format!("unsupported split rule {}", rule)))
    }

    /// Validate a draft against `group` and split it into a record.
    pub fn record(&self, group: &Group, draft: &ExpenseDraft) -> Result<ExpenseRecord> {
        let description = draft.description.trim();
        if description.is_empty() {
            return Err(SettleError::validation("description is required"));
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(SettleError::validation(format!(
                "description must not exceed {} characters",
                MAX_DESCRIPTION_LEN
            )));
        }

        let total = round_money(draft.total);
        if total < EPSILON {
            return Err(SettleError::validation(format!(
                "total amount must be greater than 0, got {}",
                draft.total
            )));
        }

        if !group.is_member(&draft.payer) {
            return Err(SettleError::business_rule(format!(
                "payer {} is not a member of group '{}'",
                draft.payer,
                group.name()
            )));
        }

        if let Some(entry) = draft
            .splits
            .iter()
            .flatten()
            .find(|e| e.amount < Decimal::ZERO)
        {
            return Err(SettleError::validation(format!(
                "split amount for {} cannot be negative",
                entry.participant
            )));
        }

        let members = group.member_ids();
        let ctx = SplitContext {
            total,
            members: &members,
            explicit: draft.splits.as_deref(),
        };
        let splits = self.get(draft.rule)?.split(&ctx)?;

        log::info!(
            "recorded {} expense '{}' in group '{}': {} paid by {}, {} splits",
            draft.rule,
            description,
            group.name(),
            total,
            draft.payer,
            splits.len()
        );

        Ok(ExpenseRecord::new(
            description,
            total,
            draft.payer.clone(),
            draft.rule,
            splits,
        ))
    }
}

impl Default for SplitStrategyRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(EqualSplit));
        registry.register(Box::new(ExactSplit));
        registry
    }
}

/// Validate and split a draft using the built-in rules.
///
/// # Examples
///
/// ```
/// use settleup_engine::core::expense::ExpenseDraft;
/// use settleup_engine::core::group::Group;
/// use settleup_engine::core::party::{Participant, ParticipantId};
/// use settleup_engine::split::record_expense;
/// use rust_decimal_macros::dec;
///
/// let group = Group::from_participants("Trip", vec![
///     Participant::new("a", "Alice"),
///     Participant::new("b", "Bob"),
/// ]).unwrap();
///
/// let draft = ExpenseDraft::equal("Fuel", dec!(50), ParticipantId::new("a"));
/// let record = record_expense(&group, &draft).unwrap();
/// assert_eq!(record.splits().len(), 2);
/// assert_eq!(record.total().to_string(), "50.00");
/// ```
pub fn record_expense(group: &Group, draft: &ExpenseDraft) -> Result<ExpenseRecord> {
    SplitStrategyRegistry::default().record(group, draft)
}
