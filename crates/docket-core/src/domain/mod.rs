//! Static reference data: judges, rooms, cases and meetings.
//!
//! Entities live in a [`Problem`] arena and are addressed by dense integer
//! ids equal to their position in the arena. The arena is immutable once
//! built and is shared (behind an `Arc`) by every schedule and snapshot of a
//! run.

mod oracle;

#[cfg(test)]
mod tests;

use std::fmt;

use smallvec::SmallVec;

use crate::error::{Result, ScheduleError};

pub use oracle::CompatibilityOracle;

/// Index of a judge in the problem arena.
pub type JudgeId = usize;
/// Index of a room in the problem arena.
pub type RoomId = usize;
/// Index of a case in the problem arena.
pub type CaseId = usize;
/// Index of a meeting in the problem arena.
pub type MeetingId = usize;

/// A characteristic that a judge, room or case can provide or require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Attribute {
    /// Held remotely.
    Virtual,
    /// Needs a secured room or security-cleared judge.
    Security,
    /// A numbered legal specialty.
    Skill(u16),
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Virtual => write!(f, "virtual"),
            Attribute::Security => write!(f, "security"),
            Attribute::Skill(n) => write!(f, "skill#{}", n),
        }
    }
}

/// A small sorted set of attributes.
///
/// # Examples
///
/// ```
/// use docket_core::{Attribute, AttributeSet};
///
/// let provided = AttributeSet::from_iter([Attribute::Virtual, Attribute::Skill(3)]);
/// let required = AttributeSet::from_iter([Attribute::Skill(3)]);
/// assert!(provided.is_superset_of(&required));
/// assert!(!required.is_superset_of(&provided));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeSet(SmallVec<[Attribute; 4]>);

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an attribute, keeping the set sorted and duplicate-free.
    pub fn insert(&mut self, attribute: Attribute) {
        if let Err(pos) = self.0.binary_search(&attribute) {
            self.0.insert(pos, attribute);
        }
    }

    pub fn contains(&self, attribute: &Attribute) -> bool {
        self.0.binary_search(attribute).is_ok()
    }

    /// True when every attribute of `other` is in `self`.
    pub fn is_superset_of(&self, other: &AttributeSet) -> bool {
        other.0.iter().all(|a| self.contains(a))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.0.iter()
    }
}

impl FromIterator<Attribute> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        let mut set = AttributeSet::new();
        for attribute in iter {
            set.insert(attribute);
        }
        set
    }
}

/// A judge: what they provide and what they require from rooms and cases.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Judge {
    pub id: JudgeId,
    pub name: String,
    pub characteristics: AttributeSet,
    pub room_requirements: AttributeSet,
    pub case_requirements: AttributeSet,
}

impl Judge {
    pub fn new(id: JudgeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            characteristics: AttributeSet::new(),
            room_requirements: AttributeSet::new(),
            case_requirements: AttributeSet::new(),
        }
    }

    pub fn with_characteristics(mut self, attrs: impl IntoIterator<Item = Attribute>) -> Self {
        self.characteristics = attrs.into_iter().collect();
        self
    }

    pub fn with_room_requirements(mut self, attrs: impl IntoIterator<Item = Attribute>) -> Self {
        self.room_requirements = attrs.into_iter().collect();
        self
    }

    pub fn with_case_requirements(mut self, attrs: impl IntoIterator<Item = Attribute>) -> Self {
        self.case_requirements = attrs.into_iter().collect();
        self
    }
}

/// A courtroom.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub characteristics: AttributeSet,
    pub judge_requirements: AttributeSet,
    pub case_requirements: AttributeSet,
}

impl Room {
    pub fn new(id: RoomId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            characteristics: AttributeSet::new(),
            judge_requirements: AttributeSet::new(),
            case_requirements: AttributeSet::new(),
        }
    }

    pub fn with_characteristics(mut self, attrs: impl IntoIterator<Item = Attribute>) -> Self {
        self.characteristics = attrs.into_iter().collect();
        self
    }

    pub fn with_judge_requirements(mut self, attrs: impl IntoIterator<Item = Attribute>) -> Self {
        self.judge_requirements = attrs.into_iter().collect();
        self
    }

    pub fn with_case_requirements(mut self, attrs: impl IntoIterator<Item = Attribute>) -> Self {
        self.case_requirements = attrs.into_iter().collect();
        self
    }
}

/// A case groups one or more meetings that share requirements.
///
/// `meetings` is derived by [`Problem::new`]; any value set by the caller is
/// replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Case {
    pub id: CaseId,
    pub characteristics: AttributeSet,
    pub judge_requirements: AttributeSet,
    pub room_requirements: AttributeSet,
    pub meetings: Vec<MeetingId>,
}

impl Case {
    pub fn new(id: CaseId) -> Self {
        Self {
            id,
            characteristics: AttributeSet::new(),
            judge_requirements: AttributeSet::new(),
            room_requirements: AttributeSet::new(),
            meetings: Vec::new(),
        }
    }

    pub fn with_characteristics(mut self, attrs: impl IntoIterator<Item = Attribute>) -> Self {
        self.characteristics = attrs.into_iter().collect();
        self
    }

    pub fn with_judge_requirements(mut self, attrs: impl IntoIterator<Item = Attribute>) -> Self {
        self.judge_requirements = attrs.into_iter().collect();
        self
    }

    pub fn with_room_requirements(mut self, attrs: impl IntoIterator<Item = Attribute>) -> Self {
        self.room_requirements = attrs.into_iter().collect();
        self
    }
}

/// One sitting of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Meeting {
    pub id: MeetingId,
    pub case: CaseId,
    /// Length in minutes.
    pub duration: u32,
}

impl Meeting {
    pub const fn new(id: MeetingId, case: CaseId, duration: u32) -> Self {
        Self { id, case, duration }
    }
}

/// Case accepts the judge and the judge accepts the case.
pub fn case_judge_compatible(case: &Case, judge: &Judge) -> bool {
    judge.characteristics.is_superset_of(&case.judge_requirements)
        && case.characteristics.is_superset_of(&judge.case_requirements)
}

/// Case accepts the room and the room accepts the case.
pub fn case_room_compatible(case: &Case, room: &Room) -> bool {
    room.characteristics.is_superset_of(&case.room_requirements)
        && case.characteristics.is_superset_of(&room.case_requirements)
}

/// Judge accepts the room and the room accepts the judge.
pub fn judge_room_compatible(judge: &Judge, room: &Room) -> bool {
    room.characteristics.is_superset_of(&judge.room_requirements)
        && judge.characteristics.is_superset_of(&room.judge_requirements)
}

/// The immutable entity arena shared by every schedule of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    judges: Vec<Judge>,
    rooms: Vec<Room>,
    cases: Vec<Case>,
    meetings: Vec<Meeting>,
}

impl Problem {
    /// Builds an arena, checking that ids match positions and that every
    /// meeting belongs to a known case.
    pub fn new(
        judges: Vec<Judge>,
        rooms: Vec<Room>,
        mut cases: Vec<Case>,
        meetings: Vec<Meeting>,
    ) -> Result<Self> {
        if let Some((pos, j)) = judges.iter().enumerate().find(|(i, j)| j.id != *i) {
            return Err(ScheduleError::InvalidProblem(format!(
                "judge at position {} has id {}",
                pos, j.id
            )));
        }
        if let Some((pos, r)) = rooms.iter().enumerate().find(|(i, r)| r.id != *i) {
            return Err(ScheduleError::InvalidProblem(format!(
                "room at position {} has id {}",
                pos, r.id
            )));
        }
        if let Some((pos, c)) = cases.iter().enumerate().find(|(i, c)| c.id != *i) {
            return Err(ScheduleError::InvalidProblem(format!(
                "case at position {} has id {}",
                pos, c.id
            )));
        }

        for case in &mut cases {
            case.meetings.clear();
        }
        for (pos, meeting) in meetings.iter().enumerate() {
            if meeting.id != pos {
                return Err(ScheduleError::InvalidProblem(format!(
                    "meeting at position {} has id {}",
                    pos, meeting.id
                )));
            }
            let case = cases
                .get_mut(meeting.case)
                .ok_or(ScheduleError::UnknownCase(meeting.case))?;
            case.meetings.push(meeting.id);
        }

        Ok(Self {
            judges,
            rooms,
            cases,
            meetings,
        })
    }

    pub fn judges(&self) -> &[Judge] {
        &self.judges
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    pub fn meetings(&self) -> &[Meeting] {
        &self.meetings
    }

    pub fn judge(&self, id: JudgeId) -> Option<&Judge> {
        self.judges.get(id)
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub fn case(&self, id: CaseId) -> Option<&Case> {
        self.cases.get(id)
    }

    /// Looks up a meeting, failing with [`ScheduleError::UnknownMeeting`].
    pub fn meeting(&self, id: MeetingId) -> Result<&Meeting> {
        self.meetings
            .get(id)
            .ok_or(ScheduleError::UnknownMeeting(id))
    }

    /// Case of a meeting.
    pub fn case_of(&self, meeting: MeetingId) -> Result<CaseId> {
        self.meeting(meeting).map(|m| m.case)
    }

    pub fn judge_count(&self) -> usize {
        self.judges.len()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn case_count(&self) -> usize {
        self.cases.len()
    }

    pub fn meeting_count(&self) -> usize {
        self.meetings.len()
    }
}
