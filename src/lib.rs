//! # settleup-engine
//!
//! Shared-expense splitting and debt simplification.
//!
//! Given the expenses of a group, this engine works out who owes what
//! for each expense, folds everything into one net balance per
//! participant, and reduces those balances to a short list of payments
//! that settles the whole group.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: participants, groups, expenses, net balances, money policy
//! - **split** — Split Calculator: equal and exact split rules behind a strategy registry
//! - **optimization** — Balance aggregation, greedy settlement, reports
//! - **simulation** — Random group generation for load testing

pub mod core;
pub mod optimization;
pub mod simulation;
pub mod split;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::error::SettleError;
    pub use crate::core::expense::{ExpenseDraft, ExpenseRecord, ExpenseSet, SplitEntry, SplitRule};
    pub use crate::core::group::Group;
    pub use crate::core::ledger::NetBalances;
    pub use crate::core::party::{Participant, ParticipantId};
    pub use crate::optimization::balance::BalanceAggregator;
    pub use crate::optimization::report::{BalanceReport, SettlementReport};
    pub use crate::optimization::settlement::{SettlementOptimizer, Transfer};
    pub use crate::split::{compute_equal_split, compute_exact_split, record_expense};
}
