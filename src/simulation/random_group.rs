//! Random group generation for load testing the engine.
//!
//! Builds a group of participants and a batch of valid expenses that
//! mixes equal and exact splits.

use crate::core::error::Result;
use crate::core::expense::{ExpenseDraft, ExpenseSet, SplitEntry};
use crate::core::group::Group;
use crate::core::party::{Participant, ParticipantId};
use crate::split::record_expense;
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::Decimal;

/// Configuration for generating a random group ledger.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Number of participants in the group.
    pub participant_count: usize,
    /// Number of expenses to record.
    pub expense_count: usize,
    /// Smallest expense, in cents.
    pub min_cents: i64,
    /// Largest expense, in cents.
    pub max_cents: i64,
    /// Probability that an expense uses an exact split.
    pub exact_ratio: f64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            participant_count: 10,
            expense_count: 30,
            min_cents: 100,
            max_cents: 50_000,
            exact_ratio: 0.3,
        }
    }
}

/// A generated group together with its recorded expenses.
#[derive(Debug, Clone)]
pub struct GeneratedLedger {
    pub group: Group,
    pub expenses: ExpenseSet,
}

/// Generate a group and random expenses for it.
///
/// Every expense goes through [`record_expense`], so the output obeys the
/// same invariants as real input.
pub fn generate_random_ledger(config: &LedgerConfig) -> Result<GeneratedLedger> {
    let mut rng = rand::thread_rng();

    let group = Group::from_participants(
        "generated",
        (0..config.participant_count.max(1))
            .map(|i| Participant::new(format!("P-{:03}", i), format!("Participant {}", i))),
    )?;
    let ids = group.member_ids();

    let min_cents = config.min_cents.max(1);
    let max_cents = config.max_cents.max(min_cents);

    let mut expenses = ExpenseSet::new();
    for n in 0..config.expense_count {
        let cents = rng.gen_range(min_cents..=max_cents);
        let total = Decimal::new(cents, 2);
        let payer = ids[rng.gen_range(0..ids.len())].clone();
        let description = format!("Expense #{}", n + 1);

        let record = if rng.gen_bool(config.exact_ratio.clamp(0.0, 1.0)) {
            let owers = random_subset(&mut rng, &ids);
            let entries = random_exact_entries(&mut rng, cents, &owers);
            let draft = ExpenseDraft::exact(description, total, payer, entries);
            record_expense(&group, &draft)?
        } else {
            let draft = ExpenseDraft::equal(description.clone(), total, payer.clone());
            match record_expense(&group, &draft) {
                Ok(record) => record,
                // too small to share evenly: cut it by hand across everyone
                Err(e) if e.is_validation() => {
                    log::debug!("{}: {}, falling back to exact split", description, e);
                    let entries = random_exact_entries(&mut rng, cents, &ids);
                    let draft = ExpenseDraft::exact(description, total, payer, entries);
                    record_expense(&group, &draft)?
                }
                Err(e) => return Err(e),
            }
        };
        expenses.add(record);
    }

    Ok(GeneratedLedger { group, expenses })
}

fn random_subset<R: Rng>(rng: &mut R, ids: &[ParticipantId]) -> Vec<ParticipantId> {
    let size = rng.gen_range(1..=ids.len());
    ids.choose_multiple(rng, size).cloned().collect()
}

/// Cut `cents` into `owers.len()` non-negative parts that add up exactly.
fn random_exact_entries<R: Rng>(
    rng: &mut R,
    cents: i64,
    owers: &[ParticipantId],
) -> Vec<SplitEntry> {
    let mut cuts: Vec<i64> = (1..owers.len()).map(|_| rng.gen_range(0..=cents)).collect();
    cuts.push(0);
    cuts.push(cents);
    cuts.sort_unstable();

    owers
        .iter()
        .zip(cuts.windows(2))
        .map(|(id, w)| SplitEntry::new(id.clone(), Decimal::new(w[1] - w[0], 2)))
        .collect()
}
