//! Small fixed schedules.

use docket_core::{Placement, Schedule};

use crate::builder::ProblemBuilder;

/// One judge, one room, one day of 8 half-hour slots and a 30-minute
/// meeting planned at each given start slot (meeting `i` at `starts[i]`).
pub fn single_judge_day(starts: &[u32]) -> Schedule {
    let problem = ProblemBuilder::new()
        .judges(1)
        .rooms(1)
        .single_meeting_cases(starts.len(), 30)
        .build();
    let mut schedule = Schedule::new(problem, 1, 240, 30).expect("valid dimensions");
    for (meeting, &start) in starts.iter().enumerate() {
        schedule
            .plan(meeting, Placement::new(0, 0, 1, start))
            .expect("start fits in the day");
    }
    schedule
}

/// Two judges and two rooms over one five-day week of 8 slots.
///
/// Cases 0 and 1 have two meetings each, cases 2 to 4 one each; meetings
/// 0..=5 are planned with a split case, a gap and a room change, meeting 6
/// stays unplanned.
pub fn two_judge_week() -> Schedule {
    let problem = ProblemBuilder::new()
        .judges(2)
        .rooms(2)
        .case(&[60, 30])
        .case(&[30, 90])
        .case(&[60])
        .case(&[30])
        .case(&[120])
        .build();
    let mut schedule = Schedule::new(problem, 1, 240, 30).expect("valid dimensions");
    let plan = [
        (0, Placement::new(0, 0, 1, 1)),
        (1, Placement::new(1, 1, 1, 1)),
        (2, Placement::new(0, 1, 1, 4)),
        (3, Placement::new(1, 1, 2, 3)),
        (4, Placement::new(0, 0, 2, 1)),
        (5, Placement::new(1, 0, 3, 6)),
    ];
    for (meeting, placement) in plan {
        schedule.plan(meeting, placement).expect("placement fits");
    }
    schedule
}
