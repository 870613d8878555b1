//! Error types for score calculation.

use docket_core::ScheduleError;
use thiserror::Error;

/// Errors raised while scoring a schedule or a move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    /// Applying or reverting the move failed.
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// Delta scoring disagrees with two full evaluations.
    #[error("Delta score {actual} differs from full score difference {expected}{}", culprit_suffix(.culprits))]
    DeltaMismatch {
        expected: i64,
        actual: i64,
        culprits: Vec<&'static str>,
    },
}

fn culprit_suffix(culprits: &[&'static str]) -> String {
    if culprits.is_empty() {
        String::new()
    } else {
        format!(" (rules: {})", culprits.join(", "))
    }
}

/// Result type alias for scoring operations.
pub type Result<T> = std::result::Result<T, ScoreError>;
