//! Weekly coverage above the configured ceiling.

use std::collections::BTreeMap;

use docket_core::{JudgeId, Tier};

use super::{judge_day_slots, occupancy};
use crate::region::Region;
use crate::rule::{Rule, RuleContext};

/// Per (judge, week): whole percentage points of weekly capacity used above
/// `coverage_ceiling_pct`.
///
/// Capacity is `days_per_week * slots_per_day`; weeks are fixed blocks of
/// `days_per_week` days starting at day 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeeklyCoverage;

fn over_ceiling(ctx: &RuleContext<'_>, occupied: usize) -> i64 {
    let capacity = ctx.config.days_per_week as i64 * ctx.schedule.slots_per_day() as i64;
    if capacity == 0 {
        return 0;
    }
    let pct = 100 * occupied as i64 / capacity;
    (pct - ctx.config.coverage_ceiling_pct as i64).max(0)
}

impl Rule for WeeklyCoverage {
    fn name(&self) -> &'static str {
        "weekly_coverage"
    }

    fn tier(&self) -> Tier {
        Tier::Soft
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> i64 {
        let mut weekly: BTreeMap<(JudgeId, u32), usize> = BTreeMap::new();
        for ((judge, day), slots) in occupancy(ctx.schedule) {
            *weekly.entry((judge, ctx.config.week_of(day))).or_default() += slots.len();
        }
        weekly.values().map(|&occupied| over_ceiling(ctx, occupied)).sum()
    }

    fn evaluate_region(&self, ctx: &RuleContext<'_>, region: &Region) -> i64 {
        region
            .judge_weeks
            .iter()
            .map(|&(judge, week)| {
                let occupied = ctx
                    .config
                    .days_of_week(week)
                    .map(|day| judge_day_slots(ctx.schedule, judge, day).len())
                    .sum();
                over_ceiling(ctx, occupied)
            })
            .sum()
    }
}
