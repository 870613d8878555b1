//! The rule contract.

use std::fmt::Debug;

use docket_core::{CompatibilityOracle, Schedule, Tier};

use crate::config::ScoringConfig;
use crate::region::Region;

/// Read-only inputs of a rule evaluation.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    pub schedule: &'a Schedule,
    pub oracle: &'a CompatibilityOracle,
    pub config: &'a ScoringConfig,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        schedule: &'a Schedule,
        oracle: &'a CompatibilityOracle,
        config: &'a ScoringConfig,
    ) -> Self {
        Self {
            schedule,
            oracle,
            config,
        }
    }
}

/// A constraint evaluated twice: over the whole schedule and over a region.
///
/// # Delta protocol
///
/// The engine measures `evaluate_region` over a move's region, applies the
/// move, measures the same region again and reverts. For that difference to
/// equal the difference of two full evaluations, a rule must decompose its
/// full count into per-unit counts (cells, judge-days, meetings, ...) such
/// that
///
/// - `evaluate` is the sum over all units, and
/// - `evaluate_region` is the sum over the units listed in the region,
///   each unit counted once.
///
/// Rules whose per-unit counts also depend on the work-day horizon return
/// `true` from [`depends_on_horizon`](Rule::depends_on_horizon); when a move
/// changes the horizon the engine falls back to `evaluate` for them.
pub trait Rule: Send + Sync + Debug {
    /// Stable snake_case name used in analysis and logs.
    fn name(&self) -> &'static str;

    fn tier(&self) -> Tier;

    fn depends_on_horizon(&self) -> bool {
        false
    }

    /// Violation count over the whole schedule.
    fn evaluate(&self, ctx: &RuleContext<'_>) -> i64;

    /// Violation count over the units of `region`.
    fn evaluate_region(&self, ctx: &RuleContext<'_>, region: &Region) -> i64;
}
