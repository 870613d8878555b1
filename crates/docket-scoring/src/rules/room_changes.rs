//! Judges changing rooms during a day.

use docket_core::Tier;

use super::heads_by_judge_day;
use crate::region::Region;
use crate::rule::{Rule, RuleContext};

/// Per (judge, day): consecutive meetings, ordered by start slot, held in
/// different rooms.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomChanges;

fn changes(rooms: impl Iterator<Item = usize>) -> i64 {
    let mut count = 0;
    let mut previous = None;
    for room in rooms {
        if previous.is_some_and(|p| p != room) {
            count += 1;
        }
        previous = Some(room);
    }
    count
}

impl Rule for RoomChanges {
    fn name(&self) -> &'static str {
        "room_changes"
    }

    fn tier(&self) -> Tier {
        Tier::Soft
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> i64 {
        heads_by_judge_day(ctx.schedule)
            .values()
            .map(|heads| changes(heads.iter().map(|&(_, _, room)| room)))
            .sum()
    }

    fn evaluate_region(&self, ctx: &RuleContext<'_>, region: &Region) -> i64 {
        region
            .judge_days
            .iter()
            .map(|&(judge, day)| {
                let heads = ctx.schedule.judge_day_placements(judge, day);
                changes(heads.iter().map(|(_, p)| p.room))
            })
            .sum()
    }
}
