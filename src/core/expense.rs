use crate::core::error::SettleError;
use crate::core::party::ParticipantId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// How an expense total is divided among participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SplitRule {
    /// Every group member owes the same amount; the last one absorbs the
    /// rounding remainder.
    Equal,
    /// The caller names each participant and the exact amount they owe.
    Exact,
}

impl fmt::Display for SplitRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitRule::Equal => write!(f, "EQUAL"),
            SplitRule::Exact => write!(f, "EXACT"),
        }
    }
}

impl FromStr for SplitRule {
    type Err = SettleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EQUAL" => Ok(SplitRule::Equal),
            "EXACT" => Ok(SplitRule::Exact),
            other => Err(SettleError::validation(format!(
                "unknown split rule '{}'",
                other
            ))),
        }
    }
}

/// The amount a single participant owes for a single expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitEntry {
    pub participant: ParticipantId,
    pub amount: Decimal,
}

impl SplitEntry {
    pub fn new(participant: ParticipantId, amount: Decimal) -> Self {
        Self {
            participant,
            amount,
        }
    }
}

/// An expense as requested by the caller, before any validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseDraft {
    pub description: String,
    pub total: Decimal,
    pub payer: ParticipantId,
    pub rule: SplitRule,
    /// Explicit per-participant amounts; only meaningful for [`SplitRule::Exact`].
    #[serde(default)]
    pub splits: Option<Vec<SplitEntry>>,
}

impl ExpenseDraft {
    pub fn equal(description: impl Into<String>, total: Decimal, payer: ParticipantId) -> Self {
        Self {
            description: description.into(),
            total,
            payer,
            rule: SplitRule::Equal,
            splits: None,
        }
    }

    pub fn exact(
        description: impl Into<String>,
        total: Decimal,
        payer: ParticipantId,
        splits: Vec<SplitEntry>,
    ) -> Self {
        Self {
            description: description.into(),
            total,
            payer,
            rule: SplitRule::Exact,
            splits: Some(splits),
        }
    }
}

/// A recorded expense: who paid, how much, and who owes what.
///
/// Records are immutable once created. The sum of `splits` equals
/// `total` exactly; that is checked when the record is produced by
/// [`record_expense`](crate::split::record_expense) and never again.
/// The raw constructors [`new`](ExpenseRecord::new) and
/// [`restore`](ExpenseRecord::restore) trust their input: use them for
/// records that already passed validation, such as ones loaded back
/// from an [`ExpenseProvider`](crate::core::directory::ExpenseProvider).
///
/// # Examples
///
/// ```
/// use settleup_engine::core::expense::{ExpenseRecord, SplitEntry, SplitRule};
/// use settleup_engine::core::party::ParticipantId;
/// use rust_decimal_macros::dec;
///
/// let a = ParticipantId::new("a");
/// let b = ParticipantId::new("b");
/// let record = ExpenseRecord::new(
///     "Dinner",
///     dec!(40.00),
///     a.clone(),
///     SplitRule::Exact,
///     vec![SplitEntry::new(a, dec!(10.00)), SplitEntry::new(b, dec!(30.00))],
/// );
///
/// assert_eq!(record.total(), dec!(40.00));
/// assert_eq!(record.splits().len(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseRecord {
    id: Uuid,
    description: String,
    total: Decimal,
    payer: ParticipantId,
    rule: SplitRule,
    splits: Vec<SplitEntry>,
    created_at: DateTime<Utc>,
}

impl ExpenseRecord {
    /// A fresh record with a new ID, stamped now.
    pub fn new(
        description: impl Into<String>,
        total: Decimal,
        payer: ParticipantId,
        rule: SplitRule,
        splits: Vec<SplitEntry>,
    ) -> Self {
        Self::restore(
            Uuid::new_v4(),
            description,
            total,
            payer,
            rule,
            splits,
            Utc::now(),
        )
    }

    /// Rebuild a stored record, keeping its original ID and timestamp.
    pub fn restore(
        id: Uuid,
        description: impl Into<String>,
        total: Decimal,
        payer: ParticipantId,
        rule: SplitRule,
        splits: Vec<SplitEntry>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            total,
            payer,
            rule,
            splits,
            created_at,
        }
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn payer(&self) -> &ParticipantId {
        &self.payer
    }

    pub fn rule(&self) -> SplitRule {
        self.rule
    }

    pub fn splits(&self) -> &[SplitEntry] {
        &self.splits
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// All recorded expenses of one group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseSet {
    expenses: Vec<ExpenseRecord>,
}

impl ExpenseSet {
    pub fn new() -> Self {
        Self {
            expenses: Vec::new(),
        }
    }

    pub fn add(&mut self, expense: ExpenseRecord) {
        self.expenses.push(expense);
    }

    pub fn expenses(&self) -> &[ExpenseRecord] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Total amount spent across all expenses.
    pub fn gross_total(&self) -> Decimal {
        self.expenses.iter().map(|e| e.total()).sum()
    }

    /// Every participant that paid or owes something, sorted.
    pub fn participants(&self) -> Vec<ParticipantId> {
        let mut ids: Vec<ParticipantId> = self
            .expenses
            .iter()
            .flat_map(|e| {
                std::iter::once(e.payer().clone())
                    .chain(e.splits().iter().map(|s| s.participant.clone()))
            })
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

impl FromIterator<ExpenseRecord> for ExpenseSet {
    fn from_iter<T: IntoIterator<Item = ExpenseRecord>>(iter: T) -> Self {
        Self {
            expenses: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn sample_record(payer: &str, total: Decimal, owers: &[(&str, Decimal)]) -> ExpenseRecord {
        ExpenseRecord::new(
            "sample",
            total,
            ParticipantId::new(payer),
            SplitRule::Exact,
            owers
                .iter()
                .map(|(id, amt)| SplitEntry::new(ParticipantId::new(*id), *amt))
                .collect(),
        )
    }

    #[test]
    fn test_split_rule_parsing() {
        assert_eq!("EQUAL".parse::<SplitRule>().unwrap(), SplitRule::Equal);
        assert_eq!(" exact ".parse::<SplitRule>().unwrap(), SplitRule::Exact);
        let err = "PERCENT".parse::<SplitRule>().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_split_rule_serde_tags() {
        assert_eq!(serde_json::to_string(&SplitRule::Equal).unwrap(), "\"EQUAL\"");
        let rule: SplitRule = serde_json::from_str("\"EXACT\"").unwrap();
        assert_eq!(rule, SplitRule::Exact);
    }

    #[test]
    fn test_restore_keeps_identity_and_timestamp() {
        let original = sample_record("a", dec!(12.00), &[("b", dec!(12.00))]);
        let stamped = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let restored = ExpenseRecord::restore(
            original.id(),
            original.description(),
            original.total(),
            original.payer().clone(),
            original.rule(),
            original.splits().to_vec(),
            stamped,
        );
        assert_eq!(restored.id(), original.id());
        assert_eq!(restored.created_at(), stamped);
        assert_eq!(restored.splits(), original.splits());
    }

    #[test]
    fn test_expense_set_gross() {
        let set: ExpenseSet = vec![
            sample_record("a", dec!(10.00), &[("b", dec!(10.00))]),
            sample_record("b", dec!(25.50), &[("a", dec!(25.50))]),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.gross_total(), dec!(35.50));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_expense_set_participants() {
        let mut set = ExpenseSet::new();
        set.add(sample_record("a", dec!(30.00), &[("b", dec!(15.00)), ("c", dec!(15.00))]));
        set.add(sample_record("c", dec!(5.00), &[("a", dec!(5.00))]));
        let ids = set.participants();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[0].as_str(), "a");
    }
}
