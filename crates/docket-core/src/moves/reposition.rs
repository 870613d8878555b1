//! RepositionMove - change judge, room, day and/or start slot of a chain.

use smallvec::SmallVec;

use super::{Dimension, Signature, Span, Touch};
use crate::domain::MeetingId;
use crate::error::{Result, ScheduleError};
use crate::schedule::{Appointment, Placement, Schedule};

/// Moves a planned meeting's chain from one placement to another.
///
/// Day and start changes translate every appointment of the chain by the
/// same offset in the flattened day x slot index space; apply and revert
/// run the same translation in opposite directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositionMove {
    meeting: MeetingId,
    from: Placement,
    to: Placement,
    len: u32,
    applied: bool,
    horizon_before: u32,
}

impl RepositionMove {
    pub fn new(schedule: &Schedule, meeting: MeetingId, to: Placement) -> Result<Self> {
        let from = schedule
            .placement(meeting)
            .ok_or(ScheduleError::NotPlanned(meeting))?;
        Self::between(schedule, meeting, from, to)
    }

    /// Builds a move with an explicit origin, checked on apply.
    pub fn between(
        schedule: &Schedule,
        meeting: MeetingId,
        from: Placement,
        to: Placement,
    ) -> Result<Self> {
        if from == to {
            return Err(ScheduleError::EmptyMove(meeting));
        }
        let len = schedule.check_target(meeting, to)?;
        Ok(Self {
            meeting,
            from,
            to,
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

    pub fn to(&self) -> Placement {
        self.to
    }

    /// Timeslots the chain occupies.
    pub fn chain_len(&self) -> u32 {
        self.len
    }

    pub fn is_applied(&self) -> bool {
        self.applied
    }

    /// Dimensions whose value differs between origin and target.
    pub fn changed_dimensions(&self) -> SmallVec<[Dimension; 4]> {
        Dimension::ALL
            .into_iter()
            .filter(|d| self.from.value(*d) != self.to.value(*d))
            .collect()
    }

    pub fn signatures(&self) -> SmallVec<[Signature; 4]> {
        self.changed_dimensions()
            .into_iter()
            .map(|dimension| Signature {
                meeting: self.meeting,
                dimension,
                value: self.to.value(dimension),
            })
            .collect()
    }

    pub fn reverse_signatures(&self) -> SmallVec<[Signature; 4]> {
        self.changed_dimensions()
            .into_iter()
            .map(|dimension| Signature {
                meeting: self.meeting,
                dimension,
                value: self.from.value(dimension),
            })
            .collect()
    }

    pub(crate) fn touch(&self) -> Touch {
        Touch {
            meeting: self.meeting,
            before: Some(Span::from_placement(self.from, self.len)),
            after: Some(Span::from_placement(self.to, self.len)),
        }
    }

    pub fn apply(&mut self, schedule: &mut Schedule) -> Result<()> {
        if self.applied {
            return Err(ScheduleError::MoveAlreadyApplied);
        }
        let horizon = schedule.work_days();
        shift_chain(schedule, self.meeting, self.from, self.to)?;
        schedule.trim_trailing_empty_days();
        self.horizon_before = horizon;
        self.applied = true;
        Ok(())
    }

    pub fn revert(&mut self, schedule: &mut Schedule) -> Result<()> {
        if !self.applied {
            return Err(ScheduleError::MoveNotApplied);
        }
        shift_chain(schedule, self.meeting, self.to, self.from)?;
        schedule.set_work_days(self.horizon_before);
        self.applied = false;
        Ok(())
    }
}

/// Translates a chain whose head sits at `from` so that it starts at `to`.
fn shift_chain(
    schedule: &mut Schedule,
    meeting: MeetingId,
    from: Placement,
    to: Placement,
) -> Result<()> {
    let chain = schedule.chain(meeting)?;
    let head = chain[0];
    if Placement::new(head.judge, head.room, head.day, head.timeslot) != from {
        return Err(ScheduleError::ChainDesync {
            meeting,
            detail: format!("expected head at {}, found day {} slot {}", from, head.day, head.timeslot),
        });
    }
    schedule.check_target(meeting, to)?;

    let offset = schedule.flat_index(to.day, to.start) as i64
        - schedule.flat_index(from.day, from.start) as i64;
    let old: Vec<Appointment> = chain.to_vec();
    let moved: Vec<Appointment> = old
        .iter()
        .map(|a| {
            let index = (schedule.flat_index(a.day, a.timeslot) as i64 + offset) as u64;
            let (day, timeslot) = schedule.split_index(index);
            Appointment {
                meeting,
                judge: to.judge,
                room: to.room,
                day,
                timeslot,
            }
        })
        .collect();

    for a in old {
        schedule.remove_appointment(a)?;
    }
    for a in moved {
        schedule.add_appointment(a)?;
    }
    Ok(())
}
