//! Batch delta scoring of unapplied candidates.
//!
//! Candidates are scored against per-worker clones of the schedule, so the
//! driver's own schedule is never mutated by a worker. The reduction picks
//! the minimum delta and breaks ties by the lowest index, which keeps the
//! outcome independent of the thread count.

use docket_config::MoveThreadCount;
use docket_core::{CompatibilityOracle, Move, Schedule};
use docket_scoring::{RulesEngine, ScoreError, ScoringConfig};
use rayon::prelude::*;
use rayon::ThreadPool;

/// The winning candidate of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredCandidate {
    pub index: usize,
    pub delta: i64,
}

/// Where candidate batches are scored.
#[derive(Debug)]
pub enum CandidatePool {
    /// The global rayon pool.
    Global,
    /// The calling thread, against the caller's schedule.
    Sequential,
    /// A dedicated rayon pool.
    Dedicated(ThreadPool),
}

impl CandidatePool {
    pub fn from_config(count: MoveThreadCount) -> Result<Self, rayon::ThreadPoolBuildError> {
        Ok(match count {
            MoveThreadCount::Auto => Self::Global,
            MoveThreadCount::None | MoveThreadCount::Count(1) => Self::Sequential,
            MoveThreadCount::Count(n) => Self::Dedicated(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .thread_name(|i| format!("docket-score-{}", i))
                    .build()?,
            ),
        })
    }

    /// Scores every candidate and returns the best one, or `None` for an
    /// empty batch. Candidates come back unapplied.
    pub fn score_candidates(
        &self,
        schedule: &mut Schedule,
        engine: &RulesEngine,
        oracle: &CompatibilityOracle,
        scoring: &ScoringConfig,
        candidates: &mut [Move],
    ) -> Result<Option<ScoredCandidate>, ScoreError> {
        let scored = match self {
            Self::Sequential => candidates
                .iter_mut()
                .enumerate()
                .map(|(index, mv)| {
                    engine
                        .calculate_delta_score(schedule, oracle, scoring, mv)
                        .map(|delta| ScoredCandidate { index, delta })
                })
                .collect::<Result<Vec<_>, _>>()?,
            Self::Global => score_parallel(schedule, engine, oracle, scoring, candidates)?,
            Self::Dedicated(pool) => {
                let shared: &Schedule = schedule;
                pool.install(|| score_parallel(shared, engine, oracle, scoring, candidates))?
            }
        };
        Ok(scored.into_iter().min_by_key(|c| (c.delta, c.index)))
    }
}

fn score_parallel(
    schedule: &Schedule,
    engine: &RulesEngine,
    oracle: &CompatibilityOracle,
    scoring: &ScoringConfig,
    candidates: &mut [Move],
) -> Result<Vec<ScoredCandidate>, ScoreError> {
    candidates
        .par_iter_mut()
        .enumerate()
        .map_init(
            || schedule.clone(),
            |local, (index, mv)| {
                engine
                    .calculate_delta_score(local, oracle, scoring, mv)
                    .map(|delta| ScoredCandidate { index, delta })
            },
        )
        .collect()
}
