use crate::core::error::{Result, SettleError};
use crate::core::expense::{SplitEntry, SplitRule};
use crate::core::money::round_money;
use crate::core::party::ParticipantId;
use crate::split::{SplitContext, SplitStrategy};
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Validate caller-specified split amounts against `total`.
///
/// Each amount is rounded to cents before summing. The rounded sum must
/// equal `total` exactly; there is no tolerance.
///
/// # Errors
///
/// - [`SettleError::Validation`] if `entries` is missing or empty, an
///   amount is negative, or the amounts do not add up to `total`.
/// - [`SettleError::BusinessRule`] if an entry names someone outside
///   `valid_members`.
pub fn compute_exact_split(
    total: Decimal,
    entries: Option<&[SplitEntry]>,
    valid_members: &HashSet<ParticipantId>,
) -> Result<Vec<SplitEntry>> {
    let entries = match entries {
        Some(e) if !e.is_empty() => e,
        _ => {
            return Err(SettleError::validation(
                "exact split requires split details",
            ))
        }
    };

    let mut sum = Decimal::ZERO;
    let mut splits = Vec::with_capacity(entries.len());
    for entry in entries {
        if !valid_members.contains(&entry.participant) {
            return Err(SettleError::business_rule(format!(
                "participant {} is not a member of the group",
                entry.participant
            )));
        }
        if entry.amount < Decimal::ZERO {
            return Err(SettleError::validation(format!(
                "split amount for {} cannot be negative",
                entry.participant
            )));
        }
        let amount = round_money(entry.amount);
        sum += amount;
        splits.push(SplitEntry::new(entry.participant.clone(), amount));
    }

    if sum != total {
        return Err(SettleError::validation(format!(
            "split amounts ({}) do not equal total amount ({})",
            sum, total
        )));
    }

    log::debug!("exact split: {} entries totaling {}", splits.len(), sum);
    Ok(splits)
}

/// [`SplitRule::Exact`]: the caller lists who owes what.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactSplit;

impl SplitStrategy for ExactSplit {
    fn rule(&self) -> SplitRule {
        SplitRule::Exact
    }

    fn split(&self, ctx: &SplitContext<'_>) -> Result<Vec<SplitEntry>> {
        let members: HashSet<ParticipantId> = ctx.members.iter().cloned().collect();
        compute_exact_split(ctx.total, ctx.explicit, &members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn members(names: &[&str]) -> HashSet<ParticipantId> {
        names.iter().map(|n| ParticipantId::new(*n)).collect()
    }

    fn entry(id: &str, amount: Decimal) -> SplitEntry {
        SplitEntry::new(ParticipantId::new(id), amount)
    }

    #[test]
    fn test_valid_entries_pass_through() {
        let entries = vec![entry("a", dec!(70)), entry("b", dec!(30.00))];
        let splits = compute_exact_split(
            dec!(100.00),
            Some(entries.as_slice()),
            &members(&["a", "b"]),
        )
        .unwrap();
        assert_eq!(splits.len(), 2);
        assert_eq!(splits[0].participant.as_str(), "a");
        assert_eq!(splits[0].amount.to_string(), "70.00");
        assert_eq!(splits[1].amount, dec!(30.00));
    }

    #[test]
    fn test_amounts_rounded_before_summing() {
        // 33.335 -> 33.34, 66.664 -> 66.66
        let entries = vec![entry("a", dec!(33.335)), entry("b", dec!(66.664))];
        let splits = compute_exact_split(
            dec!(100.00),
            Some(entries.as_slice()),
            &members(&["a", "b"]),
        )
        .unwrap();
        assert_eq!(splits[0].amount, dec!(33.34));
        assert_eq!(splits[1].amount, dec!(66.66));
    }

    #[test]
    fn test_sum_mismatch() {
        let entries = vec![entry("a", dec!(50.00)), entry("b", dec!(49.99))];
        let err = compute_exact_split(
            dec!(100.00),
            Some(entries.as_slice()),
            &members(&["a", "b"]),
        )
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_negative_amount_rejected() {
        // sums to the total, but one entry is a credit
        let entries = vec![entry("a", dec!(15.00)), entry("b", dec!(-5.00))];
        let err = compute_exact_split(
            dec!(10.00),
            Some(entries.as_slice()),
            &members(&["a", "b"]),
        )
        .unwrap_err();
        assert!(err.is_validation());

        let ids = [ParticipantId::new("a"), ParticipantId::new("b")];
        let ctx = SplitContext {
            total: dec!(10.00),
            members: &ids,
            explicit: Some(entries.as_slice()),
        };
        assert!(ExactSplit.split(&ctx).unwrap_err().is_validation());
    }

    #[test]
    fn test_unknown_participant() {
        let entries = vec![entry("a", dec!(50.00)), entry("mallory", dec!(50.00))];
        let err = compute_exact_split(
            dec!(100.00),
            Some(entries.as_slice()),
            &members(&["a", "b"]),
        )
        .unwrap_err();
        assert!(err.is_business_rule());
    }

    #[test]
    fn test_missing_or_empty_entries() {
        let m = members(&["a"]);
        assert!(compute_exact_split(dec!(1.00), None, &m)
            .unwrap_err()
            .is_validation());
        assert!(compute_exact_split(dec!(1.00), Some(&[][..]), &m)
            .unwrap_err()
            .is_validation());
    }
}
