//! InsertMove - plan an unplanned meeting.

use super::{Span, Touch};
use crate::domain::MeetingId;
use crate::error::{Result, ScheduleError};
use crate::schedule::{Placement, Schedule};

/// Takes a meeting out of the unplanned list and lays its chain at `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertMove {
    meeting: MeetingId,
    to: Placement,
    len: u32,
    applied: bool,
    horizon_before: u32,
}

impl InsertMove {
    pub fn new(schedule: &Schedule, meeting: MeetingId, to: Placement) -> Result<Self> {
        let len = schedule.check_target(meeting, to)?;
        if !schedule.is_unplanned(meeting) {
            return Err(ScheduleError::NotUnplanned(meeting));
        }
        Ok(Self {
            meeting,
            to,
            len,
            applied: false,
            horizon_before: schedule.work_days(),
        })
    }

    pub fn meeting(&self) -> MeetingId {
        self.meeting
    }

    pub fn to(&self) -> Placement {
        self.to
    }

    pub fn is_applied(&self) -> bool {
        self.applied
    }

    pub(crate) fn touch(&self) -> Touch {
        Touch {
            meeting: self.meeting,
            before: None,
            after: Some(Span::from_placement(self.to, self.len)),
        }
    }

    pub fn apply(&mut self, schedule: &mut Schedule) -> Result<()> {
        if self.applied {
            return Err(ScheduleError::MoveAlreadyApplied);
        }
        // validates position, duration and membership before mutating
        let horizon = schedule.work_days();
        schedule.plan(self.meeting, self.to)?;
        schedule.trim_trailing_empty_days();
        self.horizon_before = horizon;
        self.applied = true;
        Ok(())
    }

    pub fn revert(&mut self, schedule: &mut Schedule) -> Result<()> {
        if !self.applied {
            return Err(ScheduleError::MoveNotApplied);
        }
        let placed = schedule
            .placement(self.meeting)
            .ok_or(ScheduleError::NotPlanned(self.meeting))?;
        if placed != self.to {
            return Err(ScheduleError::ChainDesync {
                meeting: self.meeting,
                detail: format!("inserted at {}, found at {}", self.to, placed),
            });
        }
        schedule.remove_chain(self.meeting)?;
        schedule.mark_unplanned(self.meeting)?;
        schedule.set_work_days(self.horizon_before);
        self.applied = false;
        Ok(())
    }
}
