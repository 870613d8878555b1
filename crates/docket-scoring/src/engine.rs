//! Full and delta evaluation over the rule battery.

use std::fmt;

use docket_core::{CompatibilityOracle, Move, Schedule, ScheduleError, ScoreBreakdown, Tier};
use tracing::trace;

use crate::analysis::{RuleAnalysis, ScoreAnalysis};
use crate::config::ScoringConfig;
use crate::error::{Result, ScoreError};
use crate::region::Region;
use crate::rule::{Rule, RuleContext};
use crate::rules::default_rules;

/// Weighted total plus the per-tier counts it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FullScore {
    pub total: i64,
    pub breakdown: ScoreBreakdown,
}

impl FullScore {
    /// `(total, hard, medium, soft)`.
    pub fn as_tuple(&self) -> (i64, i64, i64, i64) {
        (
            self.total,
            self.breakdown.hard(),
            self.breakdown.medium(),
            self.breakdown.soft(),
        )
    }

    pub fn is_feasible(&self) -> bool {
        self.breakdown.is_feasible()
    }
}

impl fmt::Display for FullScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.total, self.breakdown)
    }
}

/// Signed change of one rule's count caused by a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleDelta {
    pub name: &'static str,
    pub tier: Tier,
    pub delta: i64,
}

/// The rule battery and its two evaluation modes.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use docket_core::{Case, CompatibilityOracle, Judge, Meeting, Move, Placement, Problem, Room, Schedule};
/// use docket_scoring::{RulesEngine, ScoringConfig};
///
/// let problem = Arc::new(
///     Problem::new(
///         vec![Judge::new(0, "A")],
///         vec![Room::new(0, "R")],
///         vec![Case::new(0)],
///         vec![Meeting::new(0, 0, 30)],
///     )
///     .unwrap(),
/// );
/// let oracle = CompatibilityOracle::from_problem(&problem);
/// let mut schedule = Schedule::new(problem, 1, 240, 30).unwrap();
/// schedule.plan(0, Placement::new(0, 0, 1, 5)).unwrap();
/// let config = ScoringConfig::default().calibrated(&schedule);
///
/// let engine = RulesEngine::new();
/// let before = engine.calculate_full_score(&schedule, &oracle, &config);
///
/// let mut mv = Move::reposition(&schedule, 0, Placement::new(0, 0, 1, 1)).unwrap();
/// let delta = engine
///     .calculate_delta_score(&mut schedule, &oracle, &config, &mut mv)
///     .unwrap();
/// assert!(delta < 0);
/// assert!(!mv.is_applied());
///
/// mv.apply(&mut schedule).unwrap();
/// let after = engine.calculate_full_score(&schedule, &oracle, &config);
/// assert_eq!(after.total - before.total, delta);
/// ```
#[derive(Debug)]
pub struct RulesEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl Default for RulesEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RulesEngine {
    /// Engine with the default rule battery.
    pub fn new() -> Self {
        Self::with_rules(default_rules())
    }

    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// Evaluates every rule over the whole schedule.
    pub fn calculate_full_score(
        &self,
        schedule: &Schedule,
        oracle: &CompatibilityOracle,
        config: &ScoringConfig,
    ) -> FullScore {
        let ctx = RuleContext::new(schedule, oracle, config);
        let breakdown = self
            .rules
            .iter()
            .map(|rule| ScoreBreakdown::of_tier(rule.tier(), rule.evaluate(&ctx)))
            .fold(ScoreBreakdown::ZERO, |acc, b| acc + b);
        FullScore {
            total: config.weights().total(&breakdown),
            breakdown,
        }
    }

    /// Weighted change in total score the move would cause.
    ///
    /// The move must not be applied; it is applied and reverted transiently
    /// and left unapplied.
    pub fn calculate_delta_score(
        &self,
        schedule: &mut Schedule,
        oracle: &CompatibilityOracle,
        config: &ScoringConfig,
        mv: &mut Move,
    ) -> Result<i64> {
        let breakdown = self.calculate_delta_breakdown(schedule, oracle, config, mv)?;
        Ok(config.weights().total(&breakdown))
    }

    /// Per-tier change the move would cause.
    pub fn calculate_delta_breakdown(
        &self,
        schedule: &mut Schedule,
        oracle: &CompatibilityOracle,
        config: &ScoringConfig,
        mv: &mut Move,
    ) -> Result<ScoreBreakdown> {
        let deltas = self.deltas(schedule, oracle, config, mv)?;
        Ok(self
            .rules
            .iter()
            .zip(deltas)
            .map(|(rule, d)| ScoreBreakdown::of_tier(rule.tier(), d))
            .fold(ScoreBreakdown::ZERO, |acc, b| acc + b))
    }

    /// Per-rule change the move would cause.
    pub fn rule_deltas(
        &self,
        schedule: &mut Schedule,
        oracle: &CompatibilityOracle,
        config: &ScoringConfig,
        mv: &mut Move,
    ) -> Result<Vec<RuleDelta>> {
        let deltas = self.deltas(schedule, oracle, config, mv)?;
        Ok(self
            .rules
            .iter()
            .zip(deltas)
            .map(|(rule, delta)| RuleDelta {
                name: rule.name(),
                tier: rule.tier(),
                delta,
            })
            .collect())
    }

    /// Measure the region, apply, measure again, revert.
    ///
    /// When the move shifts the work-day horizon, horizon-dependent rules are
    /// measured with full evaluations on both sides instead.
    fn deltas(
        &self,
        schedule: &mut Schedule,
        oracle: &CompatibilityOracle,
        config: &ScoringConfig,
        mv: &mut Move,
    ) -> Result<Vec<i64>> {
        if mv.is_applied() {
            return Err(ScheduleError::MoveAlreadyApplied.into());
        }
        let region = Region::of_move(schedule.problem(), mv, config);
        let horizon = schedule.work_days();

        let mut before: Vec<i64> = {
            let ctx = RuleContext::new(schedule, oracle, config);
            self.rules
                .iter()
                .map(|rule| rule.evaluate_region(&ctx, &region))
                .collect()
        };

        mv.apply(schedule)?;
        let horizon_changed = schedule.work_days() != horizon;
        let after: Vec<i64> = {
            let ctx = RuleContext::new(schedule, oracle, config);
            self.rules
                .iter()
                .map(|rule| {
                    if horizon_changed && rule.depends_on_horizon() {
                        rule.evaluate(&ctx)
                    } else {
                        rule.evaluate_region(&ctx, &region)
                    }
                })
                .collect()
        };
        mv.revert(schedule)?;

        if horizon_changed {
            let ctx = RuleContext::new(schedule, oracle, config);
            for (rule, value) in self.rules.iter().zip(before.iter_mut()) {
                if rule.depends_on_horizon() {
                    *value = rule.evaluate(&ctx);
                }
            }
        }

        let deltas: Vec<i64> = after.iter().zip(&before).map(|(a, b)| a - b).collect();
        trace!(
            event = "delta",
            kind = mv.kind(),
            horizon_changed,
            region_meetings = region.meetings.len()
        );
        Ok(deltas)
    }

    /// Delta of the move checked against two full evaluations.
    ///
    /// Returns the delta when both agree. The move is left unapplied.
    pub fn verify_delta(
        &self,
        schedule: &mut Schedule,
        oracle: &CompatibilityOracle,
        config: &ScoringConfig,
        mv: &mut Move,
    ) -> Result<i64> {
        let rule_deltas = self.rule_deltas(schedule, oracle, config, mv)?;
        let full_before: Vec<i64> = {
            let ctx = RuleContext::new(schedule, oracle, config);
            self.rules.iter().map(|r| r.evaluate(&ctx)).collect()
        };
        mv.apply(schedule)?;
        let full_after: Vec<i64> = {
            let ctx = RuleContext::new(schedule, oracle, config);
            self.rules.iter().map(|r| r.evaluate(&ctx)).collect()
        };
        mv.revert(schedule)?;

        let mut culprits = Vec::new();
        let mut expected = ScoreBreakdown::ZERO;
        let mut actual = ScoreBreakdown::ZERO;
        for (i, rule) in self.rules.iter().enumerate() {
            let full = full_after[i] - full_before[i];
            if full != rule_deltas[i].delta {
                culprits.push(rule.name());
            }
            expected += ScoreBreakdown::of_tier(rule.tier(), full);
            actual += ScoreBreakdown::of_tier(rule.tier(), rule_deltas[i].delta);
        }

        let expected = config.weights().total(&expected);
        let actual = config.weights().total(&actual);
        if culprits.is_empty() && expected == actual {
            Ok(actual)
        } else {
            Err(ScoreError::DeltaMismatch {
                expected,
                actual,
                culprits,
            })
        }
    }

    /// Per-rule explanation of the schedule's score.
    pub fn analyze(
        &self,
        schedule: &Schedule,
        oracle: &CompatibilityOracle,
        config: &ScoringConfig,
    ) -> ScoreAnalysis {
        let ctx = RuleContext::new(schedule, oracle, config);
        let rules: Vec<RuleAnalysis> = self
            .rules
            .iter()
            .map(|rule| {
                let count = rule.evaluate(&ctx);
                RuleAnalysis {
                    name: rule.name(),
                    tier: rule.tier(),
                    count,
                    weighted: count * config.weights().of(rule.tier()),
                }
            })
            .collect();
        ScoreAnalysis::new(rules, config.weights())
    }
}
