//! Integer rounding rules for minor-unit arithmetic

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rule used to resolve a fractional minor unit.
///
/// Only exact ties are affected; everything else rounds to the nearest unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingRule {
    /// Ties round away from zero (82.5 -> 83)
    HalfUp,
    /// Ties round to the even neighbour (82.5 -> 82, 83.5 -> 84)
    HalfEven,
}

impl RoundingRule {
    /// Divide `numerator` by `denominator`, rounding to the nearest integer.
    ///
    /// `denominator` must be non-zero; all callers pass a fixed scale.
    pub fn divide(self, numerator: u128, denominator: u128) -> u128 {
        let quotient = numerator / denominator;
        let remainder = numerator % denominator;
        let twice = remainder * 2;

        if twice > denominator {
            quotient + 1
        } else if twice < denominator {
            quotient
        } else {
            match self {
                RoundingRule::HalfUp => quotient + 1,
                RoundingRule::HalfEven => quotient + (quotient % 2),
            }
        }
    }
}

impl fmt::Display for RoundingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundingRule::HalfUp => write!(f, "half_up"),
            RoundingRule::HalfEven => write!(f, "half_even"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_division() {
        assert_eq!(RoundingRule::HalfUp.divide(1200, 100), 12);
        assert_eq!(RoundingRule::HalfEven.divide(1200, 100), 12);
    }

    #[test]
    fn test_non_tie_rounds_to_nearest() {
        // 11.70 and 11.49
        assert_eq!(RoundingRule::HalfUp.divide(1170, 100), 12);
        assert_eq!(RoundingRule::HalfEven.divide(1170, 100), 12);
        assert_eq!(RoundingRule::HalfUp.divide(1149, 100), 11);
        assert_eq!(RoundingRule::HalfEven.divide(1149, 100), 11);
    }

    #[test]
    fn test_ties() {
        assert_eq!(RoundingRule::HalfUp.divide(825, 10), 83);
        assert_eq!(RoundingRule::HalfEven.divide(825, 10), 82);

        assert_eq!(RoundingRule::HalfUp.divide(835, 10), 84);
        assert_eq!(RoundingRule::HalfEven.divide(835, 10), 84);
    }

    #[test]
    fn test_zero_numerator() {
        assert_eq!(RoundingRule::HalfUp.divide(0, 10_000), 0);
    }

    #[test]
    fn test_serde_names() {
        let rule: RoundingRule = serde_json::from_str("\"half_even\"").unwrap();
        assert_eq!(rule, RoundingRule::HalfEven);
        assert_eq!(serde_json::to_string(&RoundingRule::HalfUp).unwrap(), "\"half_up\"");
        assert_eq!(RoundingRule::HalfUp.to_string(), "half_up");
    }
}
