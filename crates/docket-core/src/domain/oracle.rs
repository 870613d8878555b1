//! Precomputed compatibility matrices.

use tracing::warn;

use super::{
    case_judge_compatible, case_room_compatible, judge_room_compatible, CaseId, JudgeId, Problem,
    RoomId,
};
use crate::error::{Result, ScheduleError};

/// Dense boolean matrix stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Matrix {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl Matrix {
    fn filled(rows: usize, cols: usize, value: bool) -> Self {
        Self {
            rows,
            cols,
            cells: vec![value; rows * cols],
        }
    }

    fn from_fn(rows: usize, cols: usize, f: impl Fn(usize, usize) -> bool) -> Self {
        let mut cells = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                cells.push(f(r, c));
            }
        }
        Self { rows, cols, cells }
    }

    fn from_rows(name: &str, rows: Vec<Vec<bool>>, cols: usize) -> Result<Self> {
        let height = rows.len();
        let mut cells = Vec::with_capacity(height * cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(ScheduleError::InvalidProblem(format!(
                    "{} matrix row {} has {} columns, expected {}",
                    name,
                    i,
                    row.len(),
                    cols
                )));
            }
            cells.extend(row);
        }
        Ok(Self {
            rows: height,
            cols,
            cells,
        })
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> Option<bool> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }
}

/// O(1) answers to "may this case sit with this judge / in this room" and
/// "may this judge sit in this room".
///
/// Lookups outside the known id ranges are logged and answered with `false`
/// so that partially specified inputs degrade instead of aborting a run.
///
/// # Examples
///
/// ```
/// use docket_core::{Attribute, Case, CompatibilityOracle, Judge, Meeting, Problem, Room};
///
/// let problem = Problem::new(
///     vec![Judge::new(0, "A"), Judge::new(1, "B").with_characteristics([Attribute::Virtual])],
///     vec![Room::new(0, "R1")],
///     vec![Case::new(0).with_judge_requirements([Attribute::Virtual])],
///     vec![Meeting::new(0, 0, 30)],
/// )
/// .unwrap();
///
/// let oracle = CompatibilityOracle::from_problem(&problem);
/// assert!(!oracle.case_judge(0, 0));
/// assert!(oracle.case_judge(0, 1));
/// assert!(!oracle.case_judge(7, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityOracle {
    case_judge: Matrix,
    case_room: Matrix,
    judge_room: Matrix,
}

impl CompatibilityOracle {
    /// Precomputes all three matrices from the arena's attribute sets.
    pub fn from_problem(problem: &Problem) -> Self {
        let cases = problem.cases();
        let judges = problem.judges();
        let rooms = problem.rooms();
        Self {
            case_judge: Matrix::from_fn(cases.len(), judges.len(), |c, j| {
                case_judge_compatible(&cases[c], &judges[j])
            }),
            case_room: Matrix::from_fn(cases.len(), rooms.len(), |c, r| {
                case_room_compatible(&cases[c], &rooms[r])
            }),
            judge_room: Matrix::from_fn(judges.len(), rooms.len(), |j, r| {
                judge_room_compatible(&judges[j], &rooms[r])
            }),
        }
    }

    /// Everything is compatible with everything.
    pub fn permissive(cases: usize, judges: usize, rooms: usize) -> Self {
        Self {
            case_judge: Matrix::filled(cases, judges, true),
            case_room: Matrix::filled(cases, rooms, true),
            judge_room: Matrix::filled(judges, rooms, true),
        }
    }

    /// Wraps externally built matrices indexed `[case][judge]`,
    /// `[case][room]` and `[judge][room]`.
    pub fn from_matrices(
        case_judge: Vec<Vec<bool>>,
        case_room: Vec<Vec<bool>>,
        judge_room: Vec<Vec<bool>>,
    ) -> Result<Self> {
        let cases = case_judge.len();
        let judges = case_judge.first().map_or(judge_room.len(), Vec::len);
        let rooms = case_room
            .first()
            .or(judge_room.first())
            .map_or(0, Vec::len);

        if case_room.len() != cases {
            return Err(ScheduleError::InvalidProblem(format!(
                "case-room matrix has {} rows, expected {}",
                case_room.len(),
                cases
            )));
        }
        if judge_room.len() != judges {
            return Err(ScheduleError::InvalidProblem(format!(
                "judge-room matrix has {} rows, expected {}",
                judge_room.len(),
                judges
            )));
        }

        Ok(Self {
            case_judge: Matrix::from_rows("case-judge", case_judge, judges)?,
            case_room: Matrix::from_rows("case-room", case_room, rooms)?,
            judge_room: Matrix::from_rows("judge-room", judge_room, rooms)?,
        })
    }

    pub fn case_judge(&self, case: CaseId, judge: JudgeId) -> bool {
        self.case_judge.get(case, judge).unwrap_or_else(|| {
            warn!(event = "oracle_miss", kind = "case_judge", case, judge);
            false
        })
    }

    pub fn case_room(&self, case: CaseId, room: RoomId) -> bool {
        self.case_room.get(case, room).unwrap_or_else(|| {
            warn!(event = "oracle_miss", kind = "case_room", case, room);
            false
        })
    }

    pub fn judge_room(&self, judge: JudgeId, room: RoomId) -> bool {
        self.judge_room.get(judge, room).unwrap_or_else(|| {
            warn!(event = "oracle_miss", kind = "judge_room", judge, room);
            false
        })
    }

    /// Number of judges the oracle knows about.
    pub fn judge_count(&self) -> usize {
        self.case_judge.cols.max(self.judge_room.rows)
    }

    /// Number of rooms the oracle knows about.
    pub fn room_count(&self) -> usize {
        self.case_room.cols.max(self.judge_room.cols)
    }

    /// Judges compatible with a case.
    pub fn judges_for_case(&self, case: CaseId) -> impl Iterator<Item = JudgeId> + '_ {
        (0..self.judge_count()).filter(move |&j| self.case_judge(case, j))
    }

    /// Rooms compatible with a case.
    pub fn rooms_for_case(&self, case: CaseId) -> impl Iterator<Item = RoomId> + '_ {
        (0..self.room_count()).filter(move |&r| self.case_room(case, r))
    }
}
