//! Tiered violation counts and their calibrated weights.
//!
//! A schedule's quality is a triple of violation counts (hard, medium, soft),
//! lower is better. [`TierWeights`] collapse the triple into a single total
//! whose ordering agrees with the lexicographic ordering of the counts as long
//! as the lower tiers stay within the calibrated bound.

#[macro_use]
mod macros;

mod breakdown;
mod weights;


use std::fmt;

pub use breakdown::ScoreBreakdown;
pub use weights::TierWeights;

/// Priority tier of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tier {
    /// Feasibility rules; a schedule is feasible when all hard counts are zero.
    Hard,
    /// Density of the judges' calendars.
    Medium,
    /// Quality preferences.
    Soft,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Hard => write!(f, "hard"),
            Tier::Medium => write!(f, "medium"),
            Tier::Soft => write!(f, "soft"),
        }
    }
}

/// Error when parsing a score breakdown from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreParseError {
    pub message: String,
}

impl fmt::Display for ScoreParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ScoreParseError {}
