//! Test utilities for docket-core
//!
//! Small hand-built problems used across the crate's test modules.

use std::sync::Arc;

use crate::domain::{Case, Judge, Meeting, Problem, Room};
use crate::schedule::{Placement, Schedule};

/// A problem with `judges` judges, `rooms` rooms and one case per entry of
/// `durations`, each case holding a single meeting of that duration.
pub fn flat_problem(judges: usize, rooms: usize, durations: &[u32]) -> Arc<Problem> {
    let problem = Problem::new(
        (0..judges).map(|i| Judge::new(i, format!("J{}", i))).collect(),
        (0..rooms).map(|i| Room::new(i, format!("R{}", i))).collect(),
        (0..durations.len()).map(Case::new).collect(),
        durations
            .iter()
            .enumerate()
            .map(|(i, d)| Meeting::new(i, i, *d))
            .collect(),
    )
    .unwrap();
    Arc::new(problem)
}

/// An 8-slot day (240 minutes, 30 minute granularity) with all meetings
/// unplanned.
pub fn eight_slot_schedule(problem: Arc<Problem>, work_days: u32) -> Schedule {
    Schedule::new(problem, work_days, 240, 30).unwrap()
}

/// Plans each `(meeting, placement)` pair in order.
pub fn plan_all(schedule: &mut Schedule, plan: &[(usize, Placement)]) {
    for (meeting, placement) in plan {
        schedule.plan(*meeting, *placement).unwrap();
    }
}
