//! Docket Core - schedule state and moves for court scheduling
//!
//! This crate provides the data the search engine works on:
//! - The immutable entity arena ([`Problem`]) and its [`CompatibilityOracle`]
//! - The mutable [`Schedule`] grid with per-meeting appointment chains
//! - Reversible [`Move`]s that keep grid and chains in sync
//! - Tiered violation counts ([`ScoreBreakdown`]) and their [`TierWeights`]

pub mod domain;
pub mod error;
pub mod moves;
pub mod schedule;
pub mod score;

#[cfg(test)]
mod test_utils;

pub use domain::{
    Attribute, AttributeSet, Case, CaseId, CompatibilityOracle, Judge, JudgeId, Meeting,
    MeetingId, Problem, Room, RoomId,
};
pub use error::{Result, ScheduleError};
pub use moves::{
    ContractingMove, ContractingSkip, DeleteMove, Dimension, InsertMove, Move, RepositionMove,
    Signature, SkipReason, Span, Touch,
};
pub use schedule::{Appointment, Placement, Schedule};
pub use score::{ScoreBreakdown, ScoreParseError, Tier, TierWeights};
