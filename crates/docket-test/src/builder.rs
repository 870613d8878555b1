//! Fluent construction of problem arenas.

use std::sync::Arc;

use docket_core::{Attribute, Case, Judge, Meeting, Problem, Room};

/// Builds a [`Problem`] with ids assigned in insertion order.
///
/// # Examples
///
/// ```
/// use docket_core::Attribute;
/// use docket_test::ProblemBuilder;
///
/// let problem = ProblemBuilder::new()
///     .judges(2)
///     .room_with([Attribute::Security])
///     .case(&[30, 60])
///     .build();
/// assert_eq!(problem.judge_count(), 2);
/// assert_eq!(problem.case(0).unwrap().meetings, vec![0, 1]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProblemBuilder {
    judges: Vec<Judge>,
    rooms: Vec<Room>,
    cases: Vec<Case>,
    meetings: Vec<Meeting>,
}

impl ProblemBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `n` judges without attributes.
    pub fn judges(mut self, n: usize) -> Self {
        for _ in 0..n {
            let id = self.judges.len();
            self.judges.push(Judge::new(id, format!("Judge {}", id)));
        }
        self
    }

    /// Adds a judge; its id is overwritten.
    pub fn judge(mut self, judge: Judge) -> Self {
        let id = self.judges.len();
        self.judges.push(Judge { id, ..judge });
        self
    }

    /// Adds a judge providing the given characteristics.
    pub fn judge_with(self, characteristics: impl IntoIterator<Item = Attribute>) -> Self {
        let id = self.judges.len();
        self.judge(Judge::new(id, format!("Judge {}", id)).with_characteristics(characteristics))
    }

    /// Adds `n` rooms without attributes.
    pub fn rooms(mut self, n: usize) -> Self {
        for _ in 0..n {
            let id = self.rooms.len();
            self.rooms.push(Room::new(id, format!("Room {}", id)));
        }
        self
    }

    /// Adds a room; its id is overwritten.
    pub fn room(mut self, room: Room) -> Self {
        let id = self.rooms.len();
        self.rooms.push(Room { id, ..room });
        self
    }

    /// Adds a room providing the given characteristics.
    pub fn room_with(self, characteristics: impl IntoIterator<Item = Attribute>) -> Self {
        let id = self.rooms.len();
        self.room(Room::new(id, format!("Room {}", id)).with_characteristics(characteristics))
    }

    /// Adds a case without attributes holding one meeting per duration.
    pub fn case(self, durations: &[u32]) -> Self {
        let id = self.cases.len();
        self.case_from(Case::new(id), durations)
    }

    /// Adds a case (id overwritten) holding one meeting per duration.
    pub fn case_from(mut self, case: Case, durations: &[u32]) -> Self {
        let id = self.cases.len();
        self.cases.push(Case { id, ..case });
        for &duration in durations {
            let meeting = self.meetings.len();
            self.meetings.push(Meeting::new(meeting, id, duration));
        }
        self
    }

    /// Adds `n` single-meeting cases of the same duration.
    pub fn single_meeting_cases(mut self, n: usize, duration: u32) -> Self {
        for _ in 0..n {
            self = self.case(&[duration]);
        }
        self
    }

    /// Finishes the arena.
    ///
    /// # Panics
    ///
    /// Never for arenas built through this builder, since ids always match
    /// positions.
    pub fn build(self) -> Arc<Problem> {
        let problem = Problem::new(self.judges, self.rooms, self.cases, self.meetings)
            .expect("builder assigns consistent ids");
        Arc::new(problem)
    }
}
