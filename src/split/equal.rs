use crate::core::error::{Result, SettleError};
use crate::core::expense::{SplitEntry, SplitRule};
use crate::core::money::{round_money, MONEY_SCALE};
use crate::core::party::ParticipantId;
use crate::split::{SplitContext, SplitStrategy};
use rust_decimal::Decimal;

/// Split `total` evenly across `participants`, in the order given.
///
/// Everyone but the last participant owes `round(total / n)`; the last
/// owes whatever is left, so the entries always add up to `total`.
/// The same order must be passed every time for the same result.
///
/// When `total` is tiny relative to `n`, rounding the share up can push
/// the last entry below zero (0.15 among 20 leaves -0.04). The entries
/// are returned as computed; [`EqualSplit`] refuses to record them.
///
/// # Examples
///
/// ```
/// use settleup_engine::split::compute_equal_split;
/// use settleup_engine::core::party::ParticipantId;
/// use rust_decimal_macros::dec;
///
/// let ids: Vec<ParticipantId> = ["a", "b", "c"].into_iter().map(ParticipantId::new).collect();
/// let splits = compute_equal_split(dec!(100.00), &ids).unwrap();
///
/// let amounts: Vec<_> = splits.iter().map(|s| s.amount).collect();
/// assert_eq!(amounts, vec![dec!(33.33), dec!(33.33), dec!(33.34)]);
/// ```
pub fn compute_equal_split(
    total: Decimal,
    participants: &[ParticipantId],
) -> Result<Vec<SplitEntry>> {
    let Some((last, rest)) = participants.split_last() else {
        return Err(SettleError::business_rule(
            "cannot split expense: no members to split among",
        ));
    };

    let count = Decimal::from(participants.len());
    let per_person = round_money(total / count);
    let allocated = per_person * Decimal::from(rest.len());
    let mut remainder = total - allocated;
    if remainder.scale() < MONEY_SCALE {
        remainder.rescale(MONEY_SCALE);
    }

    let mut splits: Vec<SplitEntry> = rest
        .iter()
        .map(|id| SplitEntry::new(id.clone(), per_person))
        .collect();
    splits.push(SplitEntry::new(last.clone(), remainder));

    log::debug!(
        "equal split: {} across {} participants ({} each, {} to {})",
        total,
        participants.len(),
        per_person,
        remainder,
        last
    );
    Ok(splits)
}

/// [`SplitRule::Equal`]: every group member owes the same share.
///
/// A total too small for the group can round each share up far enough
/// that the last member's remainder goes negative; such splits are
/// rejected instead of recorded.
#[derive(Debug, Clone, Copy, Default)]
pub struct EqualSplit;

impl SplitStrategy for EqualSplit {
    fn rule(&self) -> SplitRule {
        SplitRule::Equal
    }

    fn split(&self, ctx: &SplitContext<'_>) -> Result<Vec<SplitEntry>> {
        let splits = compute_equal_split(ctx.total, ctx.members)?;
        if splits.iter().any(|s| s.amount < Decimal::ZERO) {
            return Err(SettleError::validation(format!(
                "total {} too small to split among {} members",
                ctx.total,
                ctx.members.len()
            )));
        }
        Ok(splits)
    }
}
