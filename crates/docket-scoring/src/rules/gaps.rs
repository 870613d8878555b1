//! Idle time in the judges' calendars.

use docket_core::Tier;

use super::{judge_day_slots, last_active_day, occupancy};
use crate::region::Region;
use crate::rule::{Rule, RuleContext};

/// Per (judge, day): runs of idle slots before or between the judge's
/// meetings. Per active judge: `idle_day_penalty` for every work day after
/// the judge's last active day.
#[derive(Debug, Clone, Copy, Default)]
pub struct JudgeGaps;

/// Idle runs in `1..=max(slots)`; `slots` is ascending and distinct.
fn idle_runs(slots: &[u32]) -> i64 {
    let mut runs = 0;
    let mut previous = 0;
    for &slot in slots {
        if slot > previous + 1 {
            runs += 1;
        }
        previous = slot;
    }
    runs
}

fn trailing(ctx: &RuleContext<'_>, last_active: Option<u32>) -> i64 {
    match last_active {
        Some(day) => {
            ctx.config.idle_day_penalty * ctx.schedule.work_days().saturating_sub(day) as i64
        }
        None => 0,
    }
}

impl Rule for JudgeGaps {
    fn name(&self) -> &'static str {
        "judge_gaps"
    }

    fn tier(&self) -> Tier {
        Tier::Soft
    }

    fn depends_on_horizon(&self) -> bool {
        true
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> i64 {
        let occupied = occupancy(ctx.schedule);
        let runs: i64 = occupied.values().map(|slots| idle_runs(slots)).sum();

        let mut last: Vec<Option<u32>> = vec![None; ctx.schedule.problem().judge_count()];
        for &(judge, day) in occupied.keys() {
            if let Some(entry) = last.get_mut(judge) {
                *entry = Some(entry.map_or(day, |d| d.max(day)));
            }
        }
        runs + last.into_iter().map(|l| trailing(ctx, l)).sum::<i64>()
    }

    fn evaluate_region(&self, ctx: &RuleContext<'_>, region: &Region) -> i64 {
        let runs: i64 = region
            .judge_days
            .iter()
            .map(|&(judge, day)| idle_runs(&judge_day_slots(ctx.schedule, judge, day)))
            .sum();
        let idle: i64 = region
            .judges
            .iter()
            .filter(|&&judge| judge < ctx.schedule.problem().judge_count())
            .map(|&judge| trailing(ctx, last_active_day(ctx.schedule, judge)))
            .sum();
        runs + idle
    }
}
