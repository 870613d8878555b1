//! The built-in rule battery.

mod compatibility;
mod coverage;
mod double_booking;
mod gaps;
mod room_changes;
mod spread;
mod unplanned;
mod unused;


use std::collections::BTreeMap;

use docket_core::{JudgeId, MeetingId, RoomId, Schedule};
use smallvec::SmallVec;

pub use compatibility::{CaseJudgeCompatibility, CaseRoomCompatibility, JudgeRoomCompatibility};
pub use coverage::WeeklyCoverage;
pub use double_booking::{JudgeDoubleBooking, RoomDoubleBooking};
pub use gaps::JudgeGaps;
pub use room_changes::RoomChanges;
pub use spread::CaseJudgeSpread;
pub use unplanned::UnplannedMeetings;
pub use unused::UnusedJudgeTimeslots;

use crate::rule::Rule;

/// The default battery, hard rules first.
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(RoomDoubleBooking),
        Box::new(JudgeDoubleBooking),
        Box::new(CaseJudgeCompatibility),
        Box::new(CaseRoomCompatibility),
        Box::new(JudgeRoomCompatibility),
        Box::new(UnusedJudgeTimeslots),
        Box::new(CaseJudgeSpread),
        Box::new(WeeklyCoverage),
        Box::new(UnplannedMeetings),
        Box::new(RoomChanges),
        Box::new(JudgeGaps),
    ]
}

/// Distinct occupied slots, ascending.
pub(crate) type Slots = SmallVec<[u32; 16]>;

/// Distinct slots one judge occupies on one day.
pub(crate) fn judge_day_slots(schedule: &Schedule, judge: JudgeId, day: u32) -> Slots {
    let mut slots = Slots::new();
    for a in schedule.appointments_on_day(day).filter(|a| a.judge == judge) {
        if slots.last() != Some(&a.timeslot) {
            slots.push(a.timeslot);
        }
    }
    slots
}

/// Distinct occupied slots of every (judge, day) with at least one appointment.
pub(crate) fn occupancy(schedule: &Schedule) -> BTreeMap<(JudgeId, u32), Slots> {
    let mut map: BTreeMap<(JudgeId, u32), Slots> = BTreeMap::new();
    // grid order is (day, slot), so each list fills in ascending order
    for a in schedule.appointments() {
        let slots = map.entry((a.judge, a.day)).or_default();
        if slots.last() != Some(&a.timeslot) {
            slots.push(a.timeslot);
        }
    }
    map
}

/// Chain heads `(start, meeting, room)` per (judge, day), sorted by start.
pub(crate) fn heads_by_judge_day(
    schedule: &Schedule,
) -> BTreeMap<(JudgeId, u32), Vec<(u32, MeetingId, RoomId)>> {
    let mut map: BTreeMap<(JudgeId, u32), Vec<(u32, MeetingId, RoomId)>> = BTreeMap::new();
    for (meeting, chain) in schedule.chains() {
        let head = chain[0];
        map.entry((head.judge, head.day))
            .or_default()
            .push((head.timeslot, meeting, head.room));
    }
    for heads in map.values_mut() {
        heads.sort_unstable();
    }
    map
}

/// Last day on which a judge holds an appointment.
pub(crate) fn last_active_day(schedule: &Schedule, judge: JudgeId) -> Option<u32> {
    schedule
        .chains()
        .filter(|(_, chain)| chain[0].judge == judge)
        .map(|(_, chain)| chain[0].day)
        .max()
}
