//! Meetings left off the grid.

use docket_core::Tier;

use crate::region::Region;
use crate::rule::{Rule, RuleContext};

#[derive(Debug, Clone, Copy, Default)]
pub struct UnplannedMeetings;

impl Rule for UnplannedMeetings {
    fn name(&self) -> &'static str {
        "unplanned_meetings"
    }

    fn tier(&self) -> Tier {
        Tier::Soft
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> i64 {
        ctx.schedule.unplanned_count() as i64
    }

    fn evaluate_region(&self, ctx: &RuleContext<'_>, region: &Region) -> i64 {
        region
            .meetings
            .iter()
            .filter(|&&m| ctx.schedule.is_unplanned(m))
            .count() as i64
    }
}
