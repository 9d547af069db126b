//! Monotonic trend classification.

use crate::domain::ownership::OwnershipTrend;

/// True iff `v0 < v1 < v2`. Exact comparison, no epsilon.
pub fn is_strictly_increasing(values: &[f64; 3]) -> bool {
    values[0] < values[1] && values[1] < values[2]
}

/// Per-institution-type trend decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendDecision {
    pub foreign: bool,
    pub domestic: bool,
}

impl TrendDecision {
    pub fn classify(trend: &OwnershipTrend) -> Self {
        Self {
            foreign: is_strictly_increasing(&trend.foreign),
            domestic: is_strictly_increasing(&trend.domestic),
        }
    }

    /// Both institution types must be rising.
    pub fn qualifies(&self) -> bool {
        self.foreign && self.domestic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strict_increase() {
        assert!(is_strictly_increasing(&[1.0, 2.0, 3.0]));
        assert!(!is_strictly_increasing(&[1.0, 2.0, 2.0]));
        assert!(!is_strictly_increasing(&[3.0, 2.0, 1.0]));
        assert!(!is_strictly_increasing(&[1.0, 1.0, 2.0]));
        assert!(!is_strictly_increasing(&[10.0, 9.0, 15.0]));
    }

    #[test]
    fn nan_never_increases() {
        assert!(!is_strictly_increasing(&[f64::NAN, 1.0, 2.0]));
    }

    #[test]
    fn both_types_must_rise() {
        let trend = OwnershipTrend {
            foreign: [10.0, 12.0, 15.0],
            domestic: [5.0, 6.0, 7.0],
        };
        assert!(TrendDecision::classify(&trend).qualifies());

        let mixed = OwnershipTrend {
            foreign: [10.0, 12.0, 15.0],
            domestic: [5.0, 5.0, 7.0],
        };
        let decision = TrendDecision::classify(&mixed);
        assert!(decision.foreign);
        assert!(!decision.domestic);
        assert!(!decision.qualifies());

        let reversed = OwnershipTrend {
            foreign: [10.0, 9.0, 15.0],
            domestic: [5.0, 6.0, 7.0],
        };
        assert!(!TrendDecision::classify(&reversed).qualifies());
    }

    proptest! {
        #[test]
        fn matches_pairwise_comparison(a in -1e6f64..1e6, b in -1e6f64..1e6, c in -1e6f64..1e6) {
            prop_assert_eq!(is_strictly_increasing(&[a, b, c]), a < b && b < c);
        }

        #[test]
        fn any_equal_pair_fails(a in -1e6f64..1e6, d in 0.0f64..1e3) {
            prop_assert!(!is_strictly_increasing(&[a, a, a + d]));
            prop_assert!(!is_strictly_increasing(&[a - d, a, a]));
        }
    }
}
