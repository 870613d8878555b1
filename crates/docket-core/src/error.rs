//! Error types for docket core operations.
//!
//! Every variant describes a broken contract: a caller asked the schedule or
//! a move to do something that would violate the planned/unplanned
//! bookkeeping. None of them are expected during a healthy search.

use thiserror::Error;

use crate::domain::{CaseId, MeetingId};

/// Errors raised by the schedule and the move system.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// Schedule dimensions are unusable.
    #[error("Invalid schedule dimensions: {0}")]
    InvalidDimensions(String),

    /// The problem arena is malformed.
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    /// Meeting id does not exist in the problem arena.
    #[error("Unknown meeting {0}")]
    UnknownMeeting(MeetingId),

    /// Case id does not exist in the problem arena.
    #[error("Unknown case {0}")]
    UnknownCase(CaseId),

    /// Meeting has no chain in the schedule.
    #[error("Meeting {0} is not planned")]
    NotPlanned(MeetingId),

    /// Meeting already has a chain in the schedule.
    #[error("Meeting {0} is already planned")]
    AlreadyPlanned(MeetingId),

    /// Meeting is listed as unplanned and cannot receive appointments.
    #[error("Meeting {0} is in the unplanned list")]
    AlreadyUnplanned(MeetingId),

    /// Meeting was expected in the unplanned list but is not there.
    #[error("Meeting {0} is not in the unplanned list")]
    NotUnplanned(MeetingId),

    /// Meeting has a zero-length duration.
    #[error("Meeting {0} has zero duration")]
    ZeroDuration(MeetingId),

    /// Appointment chain would not fit inside a single day.
    #[error("Meeting {meeting} needs slots {start}..={end} but a day has {slots_per_day} slots")]
    ExceedsDay {
        meeting: MeetingId,
        start: u32,
        end: u32,
        slots_per_day: u32,
    },

    /// Day or timeslot outside the 1-indexed grid.
    #[error("Position day {day}, slot {slot} is outside the grid")]
    OutOfGrid { day: u32, slot: u32 },

    /// An appointment to remove was not found in the grid.
    #[error("Appointment of meeting {meeting} at day {day}, slot {slot} not found")]
    AppointmentNotFound { meeting: MeetingId, day: u32, slot: u32 },

    /// The chain and the grid disagree.
    #[error("Chain of meeting {meeting} out of sync: {detail}")]
    ChainDesync { meeting: MeetingId, detail: String },

    /// Move was applied twice without a revert in between.
    #[error("Move is already applied")]
    MoveAlreadyApplied,

    /// Move was reverted without having been applied.
    #[error("Move is not applied")]
    MoveNotApplied,

    /// Move describes no change at all.
    #[error("Move for meeting {0} changes nothing")]
    EmptyMove(MeetingId),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, ScheduleError>;
