//! Cases spread over several judges.

use docket_core::{CaseId, Tier};
use smallvec::SmallVec;

use crate::region::Region;
use crate::rule::{Rule, RuleContext};

/// Per case: every judge beyond the first, plus every meeting of the case
/// that is still unplanned.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseJudgeSpread;

fn case_spread(ctx: &RuleContext<'_>, case: CaseId) -> i64 {
    let Some(case) = ctx.schedule.problem().case(case) else {
        return 0;
    };
    let mut judges: SmallVec<[usize; 4]> = SmallVec::new();
    let mut unplanned = 0i64;
    for &meeting in &case.meetings {
        match ctx.schedule.placement(meeting) {
            Some(p) => {
                if !judges.contains(&p.judge) {
                    judges.push(p.judge);
                }
            }
            None => unplanned += 1,
        }
    }
    (judges.len() as i64 - 1).max(0) + unplanned
}

impl Rule for CaseJudgeSpread {
    fn name(&self) -> &'static str {
        "case_judge_spread"
    }

    fn tier(&self) -> Tier {
        Tier::Soft
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> i64 {
        (0..ctx.schedule.problem().case_count())
            .map(|case| case_spread(ctx, case))
            .sum()
    }

    fn evaluate_region(&self, ctx: &RuleContext<'_>, region: &Region) -> i64 {
        region.cases.iter().map(|&case| case_spread(ctx, case)).sum()
    }
}
