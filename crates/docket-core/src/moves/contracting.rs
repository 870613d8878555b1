//! ContractingMove - pull each judge's meetings towards the start of the day.

use tracing::trace;

use super::RepositionMove;
use crate::domain::{JudgeId, MeetingId};
use crate::error::{Result, ScheduleError};
use crate::schedule::{Placement, Schedule};

/// Why a meeting was left where it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The earlier slot range is taken in the meeting's room.
    RoomOccupied,
    /// The meeting already starts at or before the first free slot.
    AlreadyOptimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractingSkip {
    pub meeting: MeetingId,
    pub reason: SkipReason,
}

/// An ordered bundle of repositions, each shifting one meeting earlier in
/// its day.
///
/// The bundle is built and applied in one go by [`generate`](Self::generate)
/// and reverts as a unit, last sub-move first. It is a structural pass, not a
/// scored proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractingMove {
    moves: Vec<RepositionMove>,
    skipped: Vec<ContractingSkip>,
    applied: bool,
}

impl ContractingMove {
    /// Walks every (judge, day) in slot order and moves each meeting to the
    /// first free slot when its room allows it. Sub-moves are applied as they
    /// are emitted.
    ///
    /// The free-slot cursor starts at slot 1 and, after each meeting, moves to
    /// the end of that meeting's occupancy before the pass. A sub-move only
    /// fills idle time that existed before the pass.
    pub fn generate(schedule: &mut Schedule) -> Result<Self> {
        let mut heads: Vec<(JudgeId, u32, u32, MeetingId, Placement, u32)> = Vec::new();
        for (meeting, chain) in schedule.chains() {
            let head = chain[0];
            let placement = Placement::new(head.judge, head.room, head.day, head.timeslot);
            heads.push((
                head.judge,
                head.day,
                head.timeslot,
                meeting,
                placement,
                chain.len() as u32,
            ));
        }
        heads.sort_unstable_by_key(|&(judge, day, start, meeting, _, _)| (judge, day, start, meeting));

        let mut bundle = ContractingMove {
            moves: Vec::new(),
            skipped: Vec::new(),
            applied: true,
        };
        let mut group: Option<(JudgeId, u32)> = None;
        let mut cursor = 1u32;

        for (judge, day, start, meeting, from, len) in heads {
            if group != Some((judge, day)) {
                group = Some((judge, day));
                cursor = 1;
            }

            if start > cursor {
                if schedule.room_free(from.room, day, cursor, len, meeting) {
                    let to = Placement { start: cursor, ..from };
                    let mut sub = RepositionMove::between(schedule, meeting, from, to)?;
                    if let Err(e) = sub.apply(schedule) {
                        bundle.revert(schedule)?;
                        return Err(e);
                    }
                    trace!(event = "contract", meeting, judge, day, from = start, to = cursor);
                    bundle.moves.push(sub);
                } else {
                    bundle.skipped.push(ContractingSkip {
                        meeting,
                        reason: SkipReason::RoomOccupied,
                    });
                }
            } else {
                bundle.skipped.push(ContractingSkip {
                    meeting,
                    reason: SkipReason::AlreadyOptimal,
                });
            }

            cursor = cursor.max(start + len);
        }

        Ok(bundle)
    }

    /// Sub-moves in the order they were applied.
    pub fn moves(&self) -> &[RepositionMove] {
        &self.moves
    }

    pub fn skipped(&self) -> &[ContractingSkip] {
        &self.skipped
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn is_applied(&self) -> bool {
        self.applied
    }

    /// Re-applies the sub-moves in order, rolling back on failure.
    pub fn apply(&mut self, schedule: &mut Schedule) -> Result<()> {
        if self.applied {
            return Err(ScheduleError::MoveAlreadyApplied);
        }
        for i in 0..self.moves.len() {
            if let Err(e) = self.moves[i].apply(schedule) {
                for sub in self.moves[..i].iter_mut().rev() {
                    sub.revert(schedule)?;
                }
                return Err(e);
            }
        }
        self.applied = true;
        Ok(())
    }

    /// Reverts the sub-moves in strict reverse order.
    pub fn revert(&mut self, schedule: &mut Schedule) -> Result<()> {
        if !self.applied {
            return Err(ScheduleError::MoveNotApplied);
        }
        for sub in self.moves.iter_mut().rev() {
            sub.revert(schedule)?;
        }
        self.applied = false;
        Ok(())
    }
}
