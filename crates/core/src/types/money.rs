//! Money helpers.
//!
//! Amounts are stored and computed as [`rust_decimal::Decimal`] in the
//! currency's standard unit. The payment gateway wants integer minor units
//! (e.g. paise, cents), so conversion lives here next to its tests.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Convert a decimal amount in standard units to integer minor units.
///
/// Rounds half-up to two decimal places first, so `10.005` becomes `1001`.
/// Returns `None` for negative amounts or amounts that overflow `i64`.
#[must_use]
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    if amount.is_sign_negative() {
        return None;
    }
    (amount.round_dp(2) * Decimal::ONE_HUNDRED).to_i64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_amount() {
        assert_eq!(to_minor_units(Decimal::new(1999, 2)), Some(1999));
    }

    #[test]
    fn test_rounding() {
        // 10.005 rounds half-up to 10.01
        assert_eq!(to_minor_units(Decimal::new(10_005, 3)), Some(1001));
    }

    #[test]
    fn test_zero() {
        assert_eq!(to_minor_units(Decimal::ZERO), Some(0));
    }

    #[test]
    fn test_negative_rejected() {
        assert_eq!(to_minor_units(Decimal::new(-100, 2)), None);
    }
}
