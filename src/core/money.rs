use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Number of fractional digits every settled amount carries.
pub const MONEY_SCALE: u32 = 2;

/// Smallest magnitude treated as a real balance (one cent).
///
/// Anything strictly below this is rounding noise and is ignored by
/// the settlement optimizer and the conservation check.
pub const EPSILON: Decimal = dec!(0.01);

/// Round an amount to cents using HALF_UP (ties away from zero).
///
/// The result always carries exactly [`MONEY_SCALE`] fractional digits,
/// so `100` becomes `100.00` and `33.335` becomes `33.34`.
///
/// # Examples
///
/// ```
/// use settleup_engine::core::money::round_money;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(round_money(dec!(33.335)).to_string(), "33.34");
/// assert_eq!(round_money(dec!(-0.005)).to_string(), "-0.01");
/// assert_eq!(round_money(dec!(100)).to_string(), "100.00");
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Whether a magnitude is below one cent.
pub fn is_negligible(amount: Decimal) -> bool {
    amount.abs() < EPSILON
}
