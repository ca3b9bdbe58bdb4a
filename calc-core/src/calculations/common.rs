//! Rounding helpers shared by the calculators.
//!
//! Money is rounded to cents, rates to four decimal places, both half-up
//! (midpoint away from zero).

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept for rates such as an effective tax rate (`0.1523`).
pub const RATE_DP: u32 = 4;

/// Rounds money to cents, half-up.
///
/// ```
/// use rust_decimal_macros::dec;
/// use calc_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(8340.995)), dec!(8341.00));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    round_to(value, 2)
}

/// Rounds a rate to [`RATE_DP`] places using half-up rounding.
pub fn round_rate(value: Decimal) -> Decimal {
    round_to(value, RATE_DP)
}

/// Rounds half-up to `dp` decimal places.
pub fn round_to(
    value: Decimal,
    dp: u32,
) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// The larger of two values; used to floor amounts at zero.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Rounds up to the next whole number, for quantities sold in whole units
/// (paint cans, days).
pub fn ceil_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::AwayFromZero)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn cents_round_half_away_from_zero() {
        assert_eq!(round_half_up(dec!(8340.994)), dec!(8340.99));
        assert_eq!(round_half_up(dec!(8340.995)), dec!(8341.00));
        assert_eq!(round_half_up(dec!(-5000.005)), dec!(-5000.01));
    }

    #[test]
    fn fractions_of_a_cent_vanish() {
        assert_eq!(round_half_up(dec!(0.004)), dec!(0));
        assert_eq!(round_half_up(dec!(44624.999)), dec!(44625.00));
    }

    #[test]
    fn rates_keep_four_places() {
        assert_eq!(round_rate(dec!(0.152349)), dec!(0.1523));
        assert_eq!(round_rate(dec!(0.15235)), dec!(0.1524));
        assert_eq!(round_to(dec!(22.857142), 2), dec!(22.86));
    }

    #[test]
    fn max_floors_losses_at_zero() {
        assert_eq!(max(dec!(-5000), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(max(dec!(60400), Decimal::ZERO), dec!(60400));
        assert_eq!(max(dec!(7), dec!(7)), dec!(7));
    }

    #[test]
    fn gallons_round_up_to_whole_cans() {
        assert_eq!(ceil_whole(dec!(2.01)), dec!(3));
        assert_eq!(ceil_whole(dec!(2.99)), dec!(3));
        assert_eq!(ceil_whole(dec!(3)), dec!(3));
        assert_eq!(ceil_whole(dec!(0)), dec!(0));
    }
}
