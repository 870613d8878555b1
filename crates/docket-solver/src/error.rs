//! Solver errors.

use docket_config::ConfigError;
use docket_core::ScheduleError;
use docket_scoring::ScoreError;
use thiserror::Error;

use crate::generator::GenerateError;

/// Failure of a solve run.
///
/// Running out of time is not an error; every variant here means the run
/// could not continue.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Score(#[from] ScoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("failed to build move thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// An accepted delta disagreed with full evaluation.
    #[error("score corruption after {kind} move: delta {delta}, full difference {full}")]
    ScoreCorruption {
        kind: &'static str,
        delta: i64,
        full: i64,
    },
}

pub type Result<T, E = SolverError> = std::result::Result<T, E>;
