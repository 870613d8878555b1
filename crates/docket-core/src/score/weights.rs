//! Calibrated tier weights.

use std::fmt;

use super::{ScoreBreakdown, Tier};

/// Weights that collapse a [`ScoreBreakdown`] into a single total.
///
/// Weights are derived from the schedule dimensions rather than hard-coded:
/// each tier's weight is the smallest power of ten that is at least ten times
/// the largest weighted total the tier below could ever reach. With
/// `bound = judges * slots_per_day * work_days` that gives
///
/// ```text
/// soft   = 1
/// medium = pow10 >= 10 * bound * soft
/// hard   = pow10 >= 10 * bound * medium
/// ```
///
/// # Examples
///
/// ```
/// use docket_core::{ScoreBreakdown, TierWeights};
///
/// // 2 judges, 8 slots, 5 days -> bound 80
/// let weights = TierWeights::calibrate(2, 8, 5);
/// assert_eq!(weights.soft(), 1);
/// assert_eq!(weights.medium(), 1_000);
/// assert_eq!(weights.hard(), 1_000_000);
///
/// let total = weights.total(&ScoreBreakdown::of(1, 2, 3));
/// assert_eq!(total, 1_002_003);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TierWeights {
    hard: i64,
    medium: i64,
    soft: i64,
    bound: i64,
}

impl TierWeights {
    /// Derives weights for a schedule of the given dimensions.
    pub fn calibrate(judges: usize, slots_per_day: u32, work_days: u32) -> Self {
        let bound = (judges as i64)
            .saturating_mul(slots_per_day as i64)
            .saturating_mul(work_days as i64)
            .max(1);
        let soft = 1;
        let medium = pow10_at_least(bound.saturating_mul(10).saturating_mul(soft));
        let hard = pow10_at_least(bound.saturating_mul(10).saturating_mul(medium));
        Self {
            hard,
            medium,
            soft,
            bound,
        }
    }

    /// Explicit weights, mostly useful in tests.
    pub const fn explicit(hard: i64, medium: i64, soft: i64) -> Self {
        Self {
            hard,
            medium,
            soft,
            bound: 0,
        }
    }

    #[inline]
    pub const fn hard(&self) -> i64 {
        self.hard
    }

    #[inline]
    pub const fn medium(&self) -> i64 {
        self.medium
    }

    #[inline]
    pub const fn soft(&self) -> i64 {
        self.soft
    }

    /// The violation bound the weights were calibrated against (0 if explicit).
    #[inline]
    pub const fn bound(&self) -> i64 {
        self.bound
    }

    /// Weight of a single tier.
    #[inline]
    pub const fn of(&self, tier: Tier) -> i64 {
        match tier {
            Tier::Hard => self.hard,
            Tier::Medium => self.medium,
            Tier::Soft => self.soft,
        }
    }

    /// Weighted total of a breakdown (lower is better).
    #[inline]
    pub fn total(&self, breakdown: &ScoreBreakdown) -> i64 {
        breakdown.hard() * self.hard + breakdown.medium() * self.medium + breakdown.soft() * self.soft
    }
}

impl Default for TierWeights {
    fn default() -> Self {
        Self::calibrate(1, 1, 1)
    }
}

impl fmt::Display for TierWeights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hard={} medium={} soft={}",
            self.hard, self.medium, self.soft
        )
    }
}

fn pow10_at_least(value: i64) -> i64 {
    let mut p: i64 = 1;
    while p < value {
        match p.checked_mul(10) {
            Some(next) => p = next,
            None => return i64::MAX,
        }
    }
    p
}
