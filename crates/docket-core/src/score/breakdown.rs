//! ScoreBreakdown - violation counts per tier.

use std::cmp::Ordering;
use std::fmt;

use super::Tier;

/// Violation counts for the hard, medium and soft tiers.
///
/// Counts are penalties: zero is perfect and lower is better. Comparison is
/// lexicographic (hard, then medium, then soft), which matches the ordering of
/// the weighted totals produced by calibrated [`TierWeights`](super::TierWeights).
///
/// # Examples
///
/// ```
/// use docket_core::ScoreBreakdown;
///
/// let a = ScoreBreakdown::of(0, 10, 100);
/// let b = ScoreBreakdown::of(0, 5, 200);
///
/// // Fewer medium violations wins even with more soft violations
/// assert!(b < a);
/// assert!(a.is_feasible());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreBreakdown {
    hard: i64,
    medium: i64,
    soft: i64,
}

impl ScoreBreakdown {
    /// No violations.
    pub const ZERO: ScoreBreakdown = ScoreBreakdown {
        hard: 0,
        medium: 0,
        soft: 0,
    };

    /// Creates a new breakdown.
    #[inline]
    pub const fn of(hard: i64, medium: i64, soft: i64) -> Self {
        ScoreBreakdown { hard, medium, soft }
    }

    /// Creates a breakdown with `count` placed in the given tier.
    #[inline]
    pub const fn of_tier(tier: Tier, count: i64) -> Self {
        match tier {
            Tier::Hard => ScoreBreakdown::of(count, 0, 0),
            Tier::Medium => ScoreBreakdown::of(0, count, 0),
            Tier::Soft => ScoreBreakdown::of(0, 0, count),
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

    /// Returns the count of the given tier.
    #[inline]
    pub const fn tier(&self, tier: Tier) -> i64 {
        match tier {
            Tier::Hard => self.hard,
            Tier::Medium => self.medium,
            Tier::Soft => self.soft,
        }
    }

    /// True when no hard rule is violated.
    #[inline]
    pub const fn is_feasible(&self) -> bool {
        self.hard <= 0
    }
}

impl Ord for ScoreBreakdown {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.hard.cmp(&other.hard) {
            Ordering::Equal => match self.medium.cmp(&other.medium) {
                Ordering::Equal => self.soft.cmp(&other.soft),
                other => other,
            },
            other => other,
        }
    }
}

impl_tier_ops!(ScoreBreakdown { hard, medium, soft } => of);

impl fmt::Debug for ScoreBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ScoreBreakdown({}, {}, {})",
            self.hard, self.medium, self.soft
        )
    }
}

impl fmt::Display for ScoreBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}hard/{}medium/{}soft",
            self.hard, self.medium, self.soft
        )
    }
}

impl_tier_parse!(ScoreBreakdown { hard => "hard", medium => "medium", soft => "soft" } => of);
