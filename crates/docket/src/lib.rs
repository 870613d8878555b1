//! Docket - court meeting scheduling in Rust
//!
//! Build a [`Problem`], lay out an initial [`Schedule`] and call [`solve`].
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use docket::prelude::*;
//!
//! let problem = Arc::new(
//!     Problem::new(
//!         vec![Judge::new(0, "Ruiz")],
//!         vec![Room::new(0, "Courtroom 1")],
//!         vec![Case::new(0)],
//!         vec![Meeting::new(0, 0, 30), Meeting::new(1, 0, 60)],
//!     )
//!     .unwrap(),
//! );
//! let oracle = CompatibilityOracle::from_problem(&problem);
//! let schedule = Schedule::new(problem, 1, 240, 30).unwrap();
//!
//! let config = SolverConfig::default()
//!     .with_random_seed(1)
//!     .with_outer_iteration_limit(5);
//! let result = docket::solve(schedule, &oracle, config).unwrap();
//! assert_eq!(result.schedule.unplanned_count(), 0);
//! assert!(result.score.is_feasible());
//! ```

// Domain and schedule
pub use docket_core::{
    Appointment, Attribute, AttributeSet, Case, CaseId, CompatibilityOracle, Dimension, Judge,
    JudgeId, Meeting, MeetingId, Move, Placement, Problem, Room, RoomId, Schedule, ScheduleError,
    ScoreBreakdown, Tier, TierWeights,
};

// Scoring
pub use docket_scoring::{FullScore, RulesEngine, ScoreAnalysis, ScoreError, ScoringConfig};

// Configuration
pub use docket_config::{ConfigError, EnvironmentMode, MoveThreadCount, SolverConfig};

// Search
pub use docket_solver::{
    BestSolution, ScheduleSnapshot, SimulatedAnnealing, SolveResult, SolveSummary, SolverError,
    TerminationReason,
};

// Whole crates, for everything the root leaves out
pub use docket_config as config;
pub use docket_scoring as scoring;
pub use docket_solver as solver;

#[cfg(feature = "console")]
pub use docket_console as console;

mod run;
pub use run::{run_solver, solve, solve_with_channel, CONFIG_FILE};

#[cfg(test)]
mod tests;

pub mod prelude {
    pub use super::{
        Attribute, Case, CompatibilityOracle, Judge, Meeting, Placement, Problem, Room, Schedule,
    };
    pub use super::{BestSolution, SolveResult, SolverConfig, SolverError};
    pub use super::{FullScore, RulesEngine, ScoringConfig};
}
