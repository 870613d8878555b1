//! Scoring parameters and calibrated weights.

use docket_core::{Schedule, TierWeights};

/// Parameters shared by every rule, plus the tier weights calibrated for the
/// schedule's current dimensions.
///
/// Passed by reference into every engine and generator call.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use docket_core::{Case, Judge, Meeting, Problem, Room, Schedule};
/// use docket_scoring::ScoringConfig;
///
/// let problem = Problem::new(
///     vec![Judge::new(0, "A"), Judge::new(1, "B")],
///     vec![Room::new(0, "R")],
///     vec![Case::new(0)],
///     vec![Meeting::new(0, 0, 30)],
/// )
/// .unwrap();
/// let schedule = Schedule::new(Arc::new(problem), 5, 240, 30).unwrap();
///
/// let config = ScoringConfig::default().calibrated(&schedule);
/// assert_eq!(config.weights().medium(), 1_000);
/// assert!(!config.needs_recalibration(&schedule));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringConfig {
    weights: TierWeights,
    calibrated_for: Option<(usize, u32, u32)>,
    /// Weekly occupancy above this percentage is penalised per point.
    pub coverage_ceiling_pct: u32,
    /// Fixed week length used to group days into weeks.
    pub days_per_week: u32,
    /// Soft penalty per idle day after a judge's last active day.
    pub idle_day_penalty: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::new(80, 5, 1)
    }
}

impl ScoringConfig {
    pub fn new(coverage_ceiling_pct: u32, days_per_week: u32, idle_day_penalty: i64) -> Self {
        Self {
            weights: TierWeights::default(),
            calibrated_for: None,
            coverage_ceiling_pct,
            days_per_week: days_per_week.max(1),
            idle_day_penalty,
        }
    }

    /// Builder form of [`calibrate`](Self::calibrate).
    pub fn calibrated(mut self, schedule: &Schedule) -> Self {
        self.calibrate(schedule);
        self
    }

    /// Derives tier weights from the schedule's judges, slots and work days.
    pub fn calibrate(&mut self, schedule: &Schedule) {
        let dims = Self::dimensions(schedule);
        self.weights = TierWeights::calibrate(dims.0, dims.1, dims.2);
        self.calibrated_for = Some(dims);
    }

    /// Replaces the calibrated weights with fixed ones.
    pub fn with_weights(mut self, weights: TierWeights) -> Self {
        self.weights = weights;
        self.calibrated_for = None;
        self
    }

    /// True when the schedule's dimensions differ from the ones the weights
    /// were derived from. Fixed weights never need recalibration.
    pub fn needs_recalibration(&self, schedule: &Schedule) -> bool {
        self.calibrated_for
            .is_some_and(|dims| dims != Self::dimensions(schedule))
    }

    /// Work-day horizon the weights were calibrated against.
    pub fn calibrated_horizon(&self) -> Option<u32> {
        self.calibrated_for.map(|(_, _, days)| days)
    }

    #[inline]
    pub fn weights(&self) -> &TierWeights {
        &self.weights
    }

    /// 1-indexed week of a 1-indexed day.
    #[inline]
    pub fn week_of(&self, day: u32) -> u32 {
        (day - 1) / self.days_per_week + 1
    }

    /// Days belonging to a 1-indexed week.
    pub fn days_of_week(&self, week: u32) -> std::ops::RangeInclusive<u32> {
        let first = (week - 1) * self.days_per_week + 1;
        first..=first + self.days_per_week - 1
    }

    fn dimensions(schedule: &Schedule) -> (usize, u32, u32) {
        (
            schedule.problem().judge_count(),
            schedule.slots_per_day(),
            schedule.work_days(),
        )
    }
}
