//! Room and judge double-booking per timeslot.

use docket_core::{Appointment, Tier};
use smallvec::SmallVec;

use crate::region::Region;
use crate::rule::{Rule, RuleContext};

/// Appointments in the cell beyond the first per resource.
fn cell_conflicts(cell: &[Appointment], resource: impl Fn(&Appointment) -> usize) -> i64 {
    let mut ids: SmallVec<[usize; 8]> = cell.iter().map(resource).collect();
    ids.sort_unstable();
    ids.dedup();
    (cell.len() - ids.len()) as i64
}

/// A room hosting more than one meeting in the same timeslot.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomDoubleBooking;

impl Rule for RoomDoubleBooking {
    fn name(&self) -> &'static str {
        "room_double_booking"
    }

    fn tier(&self) -> Tier {
        Tier::Hard
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> i64 {
        ctx.schedule
            .cells()
            .map(|(_, cell)| cell_conflicts(cell, |a| a.room))
            .sum()
    }

    fn evaluate_region(&self, ctx: &RuleContext<'_>, region: &Region) -> i64 {
        region
            .slots
            .iter()
            .map(|&(day, slot)| cell_conflicts(ctx.schedule.appointments_at(day, slot), |a| a.room))
            .sum()
    }
}

/// A judge sitting in more than one meeting in the same timeslot.
#[derive(Debug, Clone, Copy, Default)]
pub struct JudgeDoubleBooking;

impl Rule for JudgeDoubleBooking {
    fn name(&self) -> &'static str {
        "judge_double_booking"
    }

    fn tier(&self) -> Tier {
        Tier::Hard
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> i64 {
        ctx.schedule
            .cells()
            .map(|(_, cell)| cell_conflicts(cell, |a| a.judge))
            .sum()
    }

    fn evaluate_region(&self, ctx: &RuleContext<'_>, region: &Region) -> i64 {
        region
            .slots
            .iter()
            .map(|&(day, slot)| cell_conflicts(ctx.schedule.appointments_at(day, slot), |a| a.judge))
            .sum()
    }
}
