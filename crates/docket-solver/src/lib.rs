//! Docket Solver - incremental local search for court scheduling
//!
//! This crate drives the search over a [`Schedule`](docket_core::Schedule):
//! - [`SimulatedAnnealing`]: the outer/inner annealing loop with reheats
//! - [`MoveGenerator`]: single, compound, insert and contracting moves
//! - [`TabuMemory`]: recently undone dimensions, with aspiration
//! - [`ruin`]/[`recreate`]: plateau escape by partial destruction
//! - [`CandidatePool`]: parallel delta scoring of unapplied candidates
//! - [`ScheduleSnapshot`]: the best schedule, detached from the live one

pub mod annealing;
pub mod candidates;
pub mod error;
pub mod generator;
pub mod ruin;
pub mod snapshot;
pub mod stats;
pub mod tabu;


pub use annealing::{
    band_probability, metropolis, plateau_limit, BestSolution, SearchState, SimulatedAnnealing,
    SolveResult,
};
pub use candidates::{CandidatePool, ScoredCandidate};
pub use error::{Result, SolverError};
pub use generator::{GenerateError, MoveGenerator, SearchContext};
pub use ruin::{insert_candidates, recreate, removal_cap, ruin, RecreateOutcome, RuinStrategy};
pub use snapshot::{ScheduleSnapshot, SnapshotEntry};
pub use stats::{SolveSummary, SolverStats, TerminationReason};
pub use tabu::TabuMemory;
