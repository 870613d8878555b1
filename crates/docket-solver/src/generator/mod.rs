//! Candidate move generation.
//!
//! Single and compound repositions enumerate every legal value of a
//! dimension, drop the tabu ones that cannot aspire, and pick one at random.
//! Insert, delete and contracting moves round out the neighbourhood.


use docket_core::{
    CompatibilityOracle, ContractingMove, Dimension, MeetingId, Move, Placement, Schedule,
    ScheduleError, Signature,
};
use docket_scoring::{RulesEngine, ScoreError, ScoringConfig};
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use thiserror::Error;
use tracing::trace;

use crate::tabu::TabuMemory;

/// Why no move could be generated.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("no planned meetings")]
    NoPlannedMeetings,

    #[error("no unplanned meetings")]
    NoUnplannedMeetings,

    #[error("meeting {meeting} has no legal alternative {dimension}")]
    NoLegalAlternative {
        meeting: MeetingId,
        dimension: Dimension,
    },

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Score(#[from] ScoreError),
}

impl GenerateError {
    /// True for the expected "nothing to propose" outcomes; the driver skips
    /// the step instead of failing.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NoPlannedMeetings | Self::NoUnplannedMeetings | Self::NoLegalAlternative { .. }
        )
    }
}

/// Everything the generator consults besides the schedule.
#[derive(Debug, Clone, Copy)]
pub struct SearchContext<'a> {
    pub oracle: &'a CompatibilityOracle,
    pub engine: &'a RulesEngine,
    pub scoring: &'a ScoringConfig,
    pub tabu: &'a TabuMemory,
    /// Weighted total of the schedule as it stands.
    pub current_total: i64,
    /// Best weighted total seen so far.
    pub best_total: i64,
}

/// Produces candidate moves for the annealing driver.
///
/// Generated moves are unapplied, except contracting moves which are applied
/// while they are built.
#[derive(Debug, Default, Clone, Copy)]
pub struct MoveGenerator;

impl MoveGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Every legal value of `dimension` for a chain currently at `target`,
    /// the current value excluded.
    ///
    /// Judges must suit the case and the room; rooms must suit the case and
    /// the judge. Days run up to one past the horizon so the schedule can
    /// grow.
    pub fn legal_values(
        &self,
        schedule: &Schedule,
        oracle: &CompatibilityOracle,
        meeting: MeetingId,
        target: Placement,
        dimension: Dimension,
    ) -> Result<Vec<usize>, GenerateError> {
        let case = schedule.problem().case_of(meeting)?;
        let values = match dimension {
            Dimension::Judge => (0..schedule.problem().judge_count())
                .filter(|&j| j != target.judge)
                .filter(|&j| oracle.case_judge(case, j) && oracle.judge_room(j, target.room))
                .collect(),
            Dimension::Room => (0..schedule.problem().room_count())
                .filter(|&r| r != target.room)
                .filter(|&r| oracle.case_room(case, r) && oracle.judge_room(target.judge, r))
                .collect(),
            Dimension::Day => (1..=schedule.work_days() + 1)
                .filter(|&d| d != target.day)
                .map(|d| d as usize)
                .collect(),
            Dimension::Timeslot => {
                let len = schedule.chain_len(meeting)?;
                let last_start = (schedule.slots_per_day() + 1).saturating_sub(len);
                (1..=last_start)
                    .filter(|&s| s != target.start)
                    .map(|s| s as usize)
                    .collect()
            }
        };
        Ok(values)
    }

    /// Legal values of `dimension` that are not tabu, or whose tabu
    /// reposition from `from` would set a new best.
    fn admissible_values(
        &self,
        ctx: &SearchContext<'_>,
        schedule: &mut Schedule,
        meeting: MeetingId,
        from: Placement,
        target: Placement,
        dimension: Dimension,
    ) -> Result<Vec<usize>, GenerateError> {
        let legal = self.legal_values(schedule, ctx.oracle, meeting, target, dimension)?;
        let mut admitted = Vec::with_capacity(legal.len());
        for value in legal {
            let sig = Signature {
                meeting,
                dimension,
                value,
            };
            if !ctx.tabu.contains(&sig) {
                admitted.push(value);
                continue;
            }
            let to = target.with(dimension, value);
            if to == from {
                continue;
            }
            let mut probe = Move::reposition(schedule, meeting, to)?;
            let delta = ctx
                .engine
                .calculate_delta_score(schedule, ctx.oracle, ctx.scoring, &mut probe)?;
            if TabuMemory::aspires(ctx.current_total, delta, ctx.best_total) {
                trace!(event = "aspiration", meeting, %dimension, value, delta);
                admitted.push(value);
            }
        }
        Ok(admitted)
    }

    /// Every admissible single-dimension reposition of `meeting`.
    ///
    /// An empty dimension is reported as
    /// [`GenerateError::NoLegalAlternative`].
    pub fn alternatives(
        &self,
        ctx: &SearchContext<'_>,
        schedule: &mut Schedule,
        meeting: MeetingId,
        dimension: Dimension,
    ) -> Result<Vec<Move>, GenerateError> {
        let from = schedule.placement(meeting).ok_or(ScheduleError::NotPlanned(meeting))?;
        let values = self.admissible_values(ctx, schedule, meeting, from, from, dimension)?;
        if values.is_empty() {
            return Err(GenerateError::NoLegalAlternative { meeting, dimension });
        }
        values
            .into_iter()
            .map(|v| Move::reposition(schedule, meeting, from.with(dimension, v)).map_err(Into::into))
            .collect()
    }

    /// A reposition of a random planned meeting along one random dimension,
    /// falling back to the other dimensions when one has no alternative.
    pub fn single<R: Rng + ?Sized>(
        &self,
        ctx: &SearchContext<'_>,
        schedule: &mut Schedule,
        rng: &mut R,
    ) -> Result<Move, GenerateError> {
        let meeting = random_planned(schedule, rng)?;
        let mut dimensions = Dimension::ALL;
        dimensions.shuffle(rng);

        for dimension in dimensions {
            match self.alternatives(ctx, schedule, meeting, dimension) {
                Ok(mut moves) => {
                    let i = rng.random_range(0..moves.len());
                    return Ok(moves.swap_remove(i));
                }
                Err(GenerateError::NoLegalAlternative { .. }) => continue,
                Err(e) => return Err(e),
            }
        }
        Err(GenerateError::NoLegalAlternative {
            meeting,
            dimension: dimensions[dimensions.len() - 1],
        })
    }

    /// A reposition of a random planned meeting changing at least two
    /// dimensions at once.
    ///
    /// Dimensions are visited in random order and each one is drawn from the
    /// values admissible given the ones already chosen, so a new judge and a
    /// new room always suit each other. Falls back to a single-dimension
    /// move when fewer than two dimensions have an alternative.
    pub fn compound<R: Rng + ?Sized>(
        &self,
        ctx: &SearchContext<'_>,
        schedule: &mut Schedule,
        rng: &mut R,
    ) -> Result<Move, GenerateError> {
        let meeting = random_planned(schedule, rng)?;
        let from = schedule.placement(meeting).ok_or(ScheduleError::NotPlanned(meeting))?;
        let wanted = rng.random_range(2..=Dimension::ALL.len());
        let mut dimensions = Dimension::ALL;
        dimensions.shuffle(rng);

        let mut target = from;
        let mut changed = 0;
        for dimension in dimensions {
            if changed == wanted {
                break;
            }
            let values = self.admissible_values(ctx, schedule, meeting, from, target, dimension)?;
            if let Some(&value) = values.choose(rng) {
                target = target.with(dimension, value);
                changed += 1;
            }
        }

        match changed {
            0 => Err(GenerateError::NoLegalAlternative {
                meeting,
                dimension: dimensions[dimensions.len() - 1],
            }),
            _ => Ok(Move::reposition(schedule, meeting, target)?),
        }
    }

    /// Insertion of a random unplanned meeting at a random compatible judge
    /// and room, on a day up to one past the horizon.
    pub fn insert<R: Rng + ?Sized>(
        &self,
        ctx: &SearchContext<'_>,
        schedule: &Schedule,
        rng: &mut R,
    ) -> Result<Move, GenerateError> {
        let unplanned: Vec<MeetingId> = schedule.unplanned_meetings().collect();
        let first = *unplanned.first().ok_or(GenerateError::NoUnplannedMeetings)?;
        // meetings that cannot fit in a day stay unplanned
        let fitting: Vec<MeetingId> = unplanned
            .into_iter()
            .filter(|&m| {
                schedule
                    .chain_len(m)
                    .is_ok_and(|len| len <= schedule.slots_per_day())
            })
            .collect();
        let &meeting = fitting.choose(rng).ok_or(GenerateError::NoLegalAlternative {
            meeting: first,
            dimension: Dimension::Timeslot,
        })?;
        let case = schedule.problem().case_of(meeting)?;

        let pairs: Vec<(usize, usize)> = ctx
            .oracle
            .judges_for_case(case)
            .flat_map(|j| {
                ctx.oracle
                    .rooms_for_case(case)
                    .filter(move |&r| ctx.oracle.judge_room(j, r))
                    .map(move |r| (j, r))
            })
            .collect();
        let &(judge, room) = pairs.choose(rng).ok_or(GenerateError::NoLegalAlternative {
            meeting,
            dimension: Dimension::Judge,
        })?;

        let len = schedule.check_target(meeting, Placement::new(judge, room, 1, 1))?;
        let day = rng.random_range(1..=schedule.work_days() + 1);
        let start = rng.random_range(1..=schedule.slots_per_day() - len + 1);
        Ok(Move::insert(
            schedule,
            meeting,
            Placement::new(judge, room, day, start),
        )?)
    }

    /// Deletion of a random planned meeting.
    pub fn delete<R: Rng + ?Sized>(
        &self,
        schedule: &Schedule,
        rng: &mut R,
    ) -> Result<Move, GenerateError> {
        let meeting = random_planned(schedule, rng)?;
        Ok(Move::delete(schedule, meeting)?)
    }

    /// Builds and applies a contracting pass over every judge's days.
    ///
    /// The returned move is already applied; revert it to undo the pass.
    pub fn contracting(&self, schedule: &mut Schedule) -> Result<Move, GenerateError> {
        Ok(Move::Contracting(ContractingMove::generate(schedule)?))
    }
}

fn random_planned<R: Rng + ?Sized>(
    schedule: &Schedule,
    rng: &mut R,
) -> Result<MeetingId, GenerateError> {
    let planned: Vec<MeetingId> = schedule.planned_meetings().collect();
    planned
        .choose(rng)
        .copied()
        .ok_or(GenerateError::NoPlannedMeetings)
}
