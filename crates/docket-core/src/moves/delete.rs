//! DeleteMove - unplan a planned meeting.

use super::{Span, Touch};
use crate::domain::MeetingId;
use crate::error::{Result, ScheduleError};
use crate::schedule::{Placement, Schedule};

/// Empties a meeting's chain and lists it as unplanned.
///
/// Remembers the old placement so revert can lay the chain back exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteMove {
    meeting: MeetingId,
    from: Placement,
    len: u32,
    applied: bool,
    horizon_before: u32,
}

impl DeleteMove {
    pub fn new(schedule: &Schedule, meeting: MeetingId) -> Result<Self> {
        let from = schedule
            .placement(meeting)
            .ok_or(ScheduleError::NotPlanned(meeting))?;
        let len = schedule.chain_len(meeting)?;
        Ok(Self {
            meeting,
            from,
            len,
            applied: false,
            horizon_before: schedule.work_days(),
        })
    }

    pub fn meeting(&self) -> MeetingId {
        self.meeting
    }

    pub fn from(&self) -> Placement {
        self.from
    }

    pub fn is_applied(&self) -> bool {
        self.applied
    }

    pub(crate) fn touch(&self) -> Touch {
        Touch {
            meeting: self.meeting,
            before: Some(Span::from_placement(self.from, self.len)),
            after: None,
        }
    }

    pub fn apply(&mut self, schedule: &mut Schedule) -> Result<()> {
        if self.applied {
            return Err(ScheduleError::MoveAlreadyApplied);
        }
        let placed = schedule
            .placement(self.meeting)
            .ok_or(ScheduleError::NotPlanned(self.meeting))?;
        if placed != self.from {
            return Err(ScheduleError::ChainDesync {
                meeting: self.meeting,
                detail: format!("expected at {}, found at {}", self.from, placed),
            });
        }
        let horizon = schedule.work_days();
        schedule.remove_chain(self.meeting)?;
        schedule.mark_unplanned(self.meeting)?;
        schedule.trim_trailing_empty_days();
        self.horizon_before = horizon;
        self.applied = true;
        Ok(())
    }

    pub fn revert(&mut self, schedule: &mut Schedule) -> Result<()> {
        if !self.applied {
            return Err(ScheduleError::MoveNotApplied);
        }
        schedule.plan(self.meeting, self.from)?;
        schedule.set_work_days(self.horizon_before);
        self.applied = false;
        Ok(())
    }
}
