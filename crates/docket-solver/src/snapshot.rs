//! Detached copies of a schedule's assignment.
//!
//! The best schedule found so far is kept as a snapshot: placements of the
//! chain heads plus the unplanned set. Restoring replays the placements on
//! a fresh schedule over the same problem arena.

use std::collections::BTreeSet;
use std::sync::Arc;

use docket_core::{JudgeId, MeetingId, Placement, Problem, RoomId, Schedule, ScheduleError};
use serde::{Deserialize, Serialize};

/// Where one planned meeting's chain starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub meeting: MeetingId,
    pub judge: JudgeId,
    pub room: RoomId,
    pub day: u32,
    pub slot: u32,
}

impl SnapshotEntry {
    pub fn placement(&self) -> Placement {
        Placement::new(self.judge, self.room, self.day, self.slot)
    }
}

/// Serializable assignment of every meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSnapshot {
    entries: Vec<SnapshotEntry>,
    unplanned: Vec<MeetingId>,
    work_days: u32,
    minutes_per_day: u32,
    granularity: u32,
}

impl ScheduleSnapshot {
    /// Captures the chain heads of every planned meeting, in meeting order.
    pub fn capture(schedule: &Schedule) -> Self {
        let entries = schedule
            .chains()
            .filter_map(|(meeting, chain)| chain.first().map(|head| (meeting, head)))
            .map(|(meeting, head)| SnapshotEntry {
                meeting,
                judge: head.judge,
                room: head.room,
                day: head.day,
                slot: head.timeslot,
            })
            .collect();
        Self {
            entries,
            unplanned: schedule.unplanned_meetings().collect(),
            work_days: schedule.work_days(),
            minutes_per_day: schedule.minutes_per_day(),
            granularity: schedule.granularity(),
        }
    }

    /// Rebuilds the schedule over `problem`.
    ///
    /// Fails when the snapshot does not describe every meeting of the arena
    /// exactly once.
    pub fn restore(&self, problem: Arc<Problem>) -> Result<Schedule, ScheduleError> {
        let mut schedule = Schedule::new(
            problem,
            self.work_days,
            self.minutes_per_day,
            self.granularity,
        )?;
        for entry in &self.entries {
            schedule.plan(entry.meeting, entry.placement())?;
        }

        let expected: BTreeSet<MeetingId> = self.unplanned.iter().copied().collect();
        let actual: BTreeSet<MeetingId> = schedule.unplanned_meetings().collect();
        if expected != actual || expected.len() != self.unplanned.len() {
            return Err(ScheduleError::InvalidProblem(format!(
                "snapshot lists {} unplanned meetings, restore left {}",
                self.unplanned.len(),
                actual.len()
            )));
        }
        Ok(schedule)
    }

    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    pub fn unplanned(&self) -> &[MeetingId] {
        &self.unplanned
    }

    pub fn work_days(&self) -> u32 {
        self.work_days
    }

    pub fn planned_count(&self) -> usize {
        self.entries.len()
    }
}
