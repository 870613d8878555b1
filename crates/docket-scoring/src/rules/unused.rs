//! Unused judge timeslots within the schedule's active span.

use docket_core::Tier;

use super::{judge_day_slots, occupancy};
use crate::region::Region;
use crate::rule::{Rule, RuleContext};

/// Per (judge, work day): timeslots the judge leaves empty.
///
/// The last work day is free of charge for a judge with nothing on it, so
/// the horizon itself is not penalised for judges that finish early.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnusedJudgeTimeslots;

fn unused(ctx: &RuleContext<'_>, day: u32, occupied: usize) -> i64 {
    if occupied == 0 && day == ctx.schedule.work_days() {
        0
    } else {
        ctx.schedule.slots_per_day() as i64 - occupied as i64
    }
}

impl Rule for UnusedJudgeTimeslots {
    fn name(&self) -> &'static str {
        "unused_judge_timeslots"
    }

    fn tier(&self) -> Tier {
        Tier::Medium
    }

    fn depends_on_horizon(&self) -> bool {
        true
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> i64 {
        let occupied = occupancy(ctx.schedule);
        let mut total = 0;
        for judge in 0..ctx.schedule.problem().judge_count() {
            for day in 1..=ctx.schedule.work_days() {
                let n = occupied.get(&(judge, day)).map_or(0, |s| s.len());
                total += unused(ctx, day, n);
            }
        }
        total
    }

    fn evaluate_region(&self, ctx: &RuleContext<'_>, region: &Region) -> i64 {
        region
            .judge_days
            .iter()
            .filter(|&&(judge, day)| {
                judge < ctx.schedule.problem().judge_count() && day <= ctx.schedule.work_days()
            })
            .map(|&(judge, day)| unused(ctx, day, judge_day_slots(ctx.schedule, judge, day).len()))
            .sum()
    }
}
