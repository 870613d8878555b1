//! Attribute compatibility of planned meetings.

use docket_core::{MeetingId, Placement, Tier};

use crate::region::Region;
use crate::rule::{Rule, RuleContext};

fn count_planned(
    ctx: &RuleContext<'_>,
    violates: impl Fn(&RuleContext<'_>, MeetingId, Placement) -> bool,
) -> i64 {
    ctx.schedule
        .planned_meetings()
        .filter_map(|m| ctx.schedule.placement(m).map(|p| (m, p)))
        .filter(|&(m, p)| violates(ctx, m, p))
        .count() as i64
}

fn count_region(
    ctx: &RuleContext<'_>,
    region: &Region,
    violates: impl Fn(&RuleContext<'_>, MeetingId, Placement) -> bool,
) -> i64 {
    region
        .meetings
        .iter()
        .filter_map(|&m| ctx.schedule.placement(m).map(|p| (m, p)))
        .filter(|&(m, p)| violates(ctx, m, p))
        .count() as i64
}

fn case_of(ctx: &RuleContext<'_>, meeting: MeetingId) -> Option<usize> {
    ctx.schedule.problem().case_of(meeting).ok()
}

fn case_judge(ctx: &RuleContext<'_>, meeting: MeetingId, p: Placement) -> bool {
    case_of(ctx, meeting).map_or(true, |case| !ctx.oracle.case_judge(case, p.judge))
}

fn case_room(ctx: &RuleContext<'_>, meeting: MeetingId, p: Placement) -> bool {
    case_of(ctx, meeting).map_or(true, |case| !ctx.oracle.case_room(case, p.room))
}

fn judge_room(ctx: &RuleContext<'_>, _meeting: MeetingId, p: Placement) -> bool {
    !ctx.oracle.judge_room(p.judge, p.room)
}

/// Planned meetings whose judge does not match their case.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseJudgeCompatibility;

impl Rule for CaseJudgeCompatibility {
    fn name(&self) -> &'static str {
        "case_judge_compatibility"
    }

    fn tier(&self) -> Tier {
        Tier::Hard
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> i64 {
        count_planned(ctx, case_judge)
    }

    fn evaluate_region(&self, ctx: &RuleContext<'_>, region: &Region) -> i64 {
        count_region(ctx, region, case_judge)
    }
}

/// Planned meetings whose room does not match their case.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseRoomCompatibility;

impl Rule for CaseRoomCompatibility {
    fn name(&self) -> &'static str {
        "case_room_compatibility"
    }

    fn tier(&self) -> Tier {
        Tier::Hard
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> i64 {
        count_planned(ctx, case_room)
    }

    fn evaluate_region(&self, ctx: &RuleContext<'_>, region: &Region) -> i64 {
        count_region(ctx, region, case_room)
    }
}

/// Planned meetings whose judge and room do not accept each other.
#[derive(Debug, Clone, Copy, Default)]
pub struct JudgeRoomCompatibility;

impl Rule for JudgeRoomCompatibility {
    fn name(&self) -> &'static str {
        "judge_room_compatibility"
    }

    fn tier(&self) -> Tier {
        Tier::Hard
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> i64 {
        count_planned(ctx, judge_room)
    }

    fn evaluate_region(&self, ctx: &RuleContext<'_>, region: &Region) -> i64 {
        count_region(ctx, region, judge_room)
    }
}
