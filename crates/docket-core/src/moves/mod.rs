//! Reversible schedule mutations.
//!
//! Every move validates all of its prerequisites before touching the
//! schedule, so a failed `apply` or `revert` leaves the schedule exactly as it
//! was. `apply` records the horizon (`work_days`) it started from and trims
//! trailing empty days afterwards; `revert` restores that horizon exactly.

mod contracting;
mod delete;
mod insert;
mod reposition;

#[cfg(test)]
mod tests;

use std::fmt;

use smallvec::SmallVec;

use crate::domain::{JudgeId, MeetingId, RoomId};
use crate::error::Result;
use crate::schedule::{Placement, Schedule};

pub use contracting::{ContractingMove, ContractingSkip, SkipReason};
pub use delete::DeleteMove;
pub use insert::InsertMove;
pub use reposition::RepositionMove;

/// A dimension of a placement that a move can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Dimension {
    Judge,
    Room,
    Day,
    Timeslot,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Judge,
        Dimension::Room,
        Dimension::Day,
        Dimension::Timeslot,
    ];
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Judge => write!(f, "judge"),
            Dimension::Room => write!(f, "room"),
            Dimension::Day => write!(f, "day"),
            Dimension::Timeslot => write!(f, "timeslot"),
        }
    }
}

impl Placement {
    /// Value of one dimension as a plain integer.
    pub fn value(&self, dimension: Dimension) -> usize {
        match dimension {
            Dimension::Judge => self.judge,
            Dimension::Room => self.room,
            Dimension::Day => self.day as usize,
            Dimension::Timeslot => self.start as usize,
        }
    }

    /// Copy with one dimension replaced.
    pub fn with(self, dimension: Dimension, value: usize) -> Self {
        let mut p = self;
        match dimension {
            Dimension::Judge => p.judge = value,
            Dimension::Room => p.room = value,
            Dimension::Day => p.day = value as u32,
            Dimension::Timeslot => p.start = value as u32,
        }
        p
    }
}

/// `(meeting, dimension, value)` triple remembered by tabu memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    pub meeting: MeetingId,
    pub dimension: Dimension,
    pub value: usize,
}

/// Position and extent of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub judge: JudgeId,
    pub room: RoomId,
    pub day: u32,
    pub start: u32,
    pub len: u32,
}

impl Span {
    pub fn from_placement(placement: Placement, len: u32) -> Self {
        Self {
            judge: placement.judge,
            room: placement.room,
            day: placement.day,
            start: placement.start,
            len,
        }
    }

    /// Timeslots covered by the span.
    pub fn slots(&self) -> impl Iterator<Item = u32> {
        self.start..self.start + self.len
    }
}

/// What a move does to one meeting. `None` means unplanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Touch {
    pub meeting: MeetingId,
    pub before: Option<Span>,
    pub after: Option<Span>,
}

/// A reversible change to a schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Move {
    /// Changes any subset of judge, room, day and start slot.
    Reposition(RepositionMove),
    /// Plans an unplanned meeting.
    Insert(InsertMove),
    /// Unplans a planned meeting.
    Delete(DeleteMove),
    /// Ordered bundle of repositions compacting the judges' days.
    Contracting(ContractingMove),
}

impl Move {
    /// Reposition of a planned meeting to `to`.
    pub fn reposition(schedule: &Schedule, meeting: MeetingId, to: Placement) -> Result<Self> {
        RepositionMove::new(schedule, meeting, to).map(Move::Reposition)
    }

    /// Insertion of an unplanned meeting at `to`.
    pub fn insert(schedule: &Schedule, meeting: MeetingId, to: Placement) -> Result<Self> {
        InsertMove::new(schedule, meeting, to).map(Move::Insert)
    }

    /// Deletion of a planned meeting.
    pub fn delete(schedule: &Schedule, meeting: MeetingId) -> Result<Self> {
        DeleteMove::new(schedule, meeting).map(Move::Delete)
    }

    pub fn apply(&mut self, schedule: &mut Schedule) -> Result<()> {
        match self {
            Move::Reposition(m) => m.apply(schedule),
            Move::Insert(m) => m.apply(schedule),
            Move::Delete(m) => m.apply(schedule),
            Move::Contracting(m) => m.apply(schedule),
        }
    }

    pub fn revert(&mut self, schedule: &mut Schedule) -> Result<()> {
        match self {
            Move::Reposition(m) => m.revert(schedule),
            Move::Insert(m) => m.revert(schedule),
            Move::Delete(m) => m.revert(schedule),
            Move::Contracting(m) => m.revert(schedule),
        }
    }

    pub fn is_applied(&self) -> bool {
        match self {
            Move::Reposition(m) => m.is_applied(),
            Move::Insert(m) => m.is_applied(),
            Move::Delete(m) => m.is_applied(),
            Move::Contracting(m) => m.is_applied(),
        }
    }

    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Move::Reposition(m) if m.changed_dimensions().len() > 1 => "compound",
            Move::Reposition(_) => "single",
            Move::Insert(_) => "insert",
            Move::Delete(_) => "delete",
            Move::Contracting(_) => "contracting",
        }
    }

    /// `(meeting, dimension, new value)` for every changed dimension.
    pub fn signatures(&self) -> SmallVec<[Signature; 4]> {
        match self {
            Move::Reposition(m) => m.signatures(),
            _ => SmallVec::new(),
        }
    }

    /// `(meeting, dimension, old value)` for every changed dimension: the
    /// signatures of the move that would undo this one.
    pub fn reverse_signatures(&self) -> SmallVec<[Signature; 4]> {
        match self {
            Move::Reposition(m) => m.reverse_signatures(),
            _ => SmallVec::new(),
        }
    }

    /// Before/after spans of every meeting the move touches.
    pub fn footprint(&self) -> Vec<Touch> {
        match self {
            Move::Reposition(m) => vec![m.touch()],
            Move::Insert(m) => vec![m.touch()],
            Move::Delete(m) => vec![m.touch()],
            Move::Contracting(m) => m.moves().iter().map(RepositionMove::touch).collect(),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Reposition(m) => write!(f, "move meeting {} {} -> {}", m.meeting(), m.from(), m.to()),
            Move::Insert(m) => write!(f, "insert meeting {} at {}", m.meeting(), m.to()),
            Move::Delete(m) => write!(f, "delete meeting {} from {}", m.meeting(), m.from()),
            Move::Contracting(m) => write!(f, "contract {} meetings", m.moves().len()),
        }
    }
}
