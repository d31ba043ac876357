use std::fmt;

use serde::{Deserialize, Serialize};

/// Signed amount of money in whole cents, stored as an integer.
///
/// Positive values are platform credit/revenue, negative values are platform
/// debit/expense.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Cents(i64);

impl Cents {
    pub const ZERO: Cents = Cents(0);

    pub const fn new(value: i64) -> Self {
        Cents(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Multiply by a basis-point rate (10000 bps = 100%), rounding half-up.
    ///
    /// Defined for non-negative amounts only; the input boundaries reject
    /// negative grosses and rates above 10000 bps before money math runs.
    /// The intermediate product is widened to avoid overflow near `i64::MAX`.
    pub fn mul_bps_half_up(self, bps: u16) -> Cents {
        debug_assert!(self.0 >= 0, "bps math is defined for non-negative amounts");
        let scaled = i128::from(self.0) * i128::from(bps) + 5_000;
        // at most self for bps <= 10000, so the quotient fits
        Cents((scaled / 10_000) as i64)
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        let whole = abs / 100;
        let frac = abs % 100;
        write!(f, "{sign}{whole}.{frac:02}")
    }
}

impl std::ops::Add for Cents {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Cents(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Cents {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Cents(self.0 - rhs.0)
    }
}

impl std::ops::Neg for Cents {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Cents(-self.0)
    }
}

impl std::ops::AddAssign for Cents {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_preserves_value() {
        assert_eq!(Cents::new(12345).get(), 12345);
    }

    #[test]
    fn default_is_zero() {
        assert_eq!(Cents::default(), Cents::ZERO);
    }

    #[test]
    fn mul_bps_rounds_half_up() {
        // 999 * 2.5% = 24.975 -> 25
        assert_eq!(Cents::new(999).mul_bps_half_up(250), Cents::new(25));
        // 999 * 2.4% = 23.976 -> 24
        assert_eq!(Cents::new(999).mul_bps_half_up(240), Cents::new(24));
        // exact half rounds up: 100 * 0.5% = 0.5 -> 1
        assert_eq!(Cents::new(100).mul_bps_half_up(50), Cents::new(1));
    }

    #[test]
    fn mul_bps_below_half_rounds_to_zero() {
        assert_eq!(Cents::new(1).mul_bps_half_up(1), Cents::ZERO);
    }

    #[test]
    fn mul_bps_full_rate_is_identity() {
        assert_eq!(Cents::new(777).mul_bps_half_up(10_000), Cents::new(777));
    }

    #[test]
    fn mul_bps_does_not_overflow_near_i64_max() {
        assert_eq!(
            Cents::new(i64::MAX).mul_bps_half_up(10_000),
            Cents::new(i64::MAX)
        );
        // (i64::MAX - 1) * 5000 overflows i64 by itself; widened math survives
        assert_eq!(
            Cents::new(i64::MAX - 1).mul_bps_half_up(5_000),
            Cents::new(4_611_686_018_427_387_903)
        );
    }

    #[test]
    fn display_formats_positive() {
        assert_eq!(Cents::new(123456).to_string(), "1234.56");
        assert_eq!(Cents::new(5).to_string(), "0.05");
        assert_eq!(Cents::ZERO.to_string(), "0.00");
    }

    #[test]
    fn display_formats_negative() {
        assert_eq!(Cents::new(-250).to_string(), "-2.50");
        assert_eq!(Cents::new(-1).to_string(), "-0.01");
    }

    #[test]
    fn arithmetic() {
        assert_eq!(Cents::new(100) + Cents::new(50), Cents::new(150));
        assert_eq!(Cents::new(100) - Cents::new(30), Cents::new(70));
        assert_eq!(-Cents::new(40), Cents::new(-40));

        let mut total = Cents::new(100);
        total += Cents::new(25);
        assert_eq!(total, Cents::new(125));
    }

    #[test]
    fn ordering() {
        assert!(Cents::new(-100) < Cents::ZERO);
        assert!(Cents::ZERO < Cents::new(100));
    }
}
