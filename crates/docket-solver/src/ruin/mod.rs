//! Ruin-and-recreate.
//!
//! A ruin pass unplans a batch of meetings chosen by a [`RuinStrategy`];
//! recreate then inserts every unplanned meeting, in id order, at the
//! position with the lowest delta score. The greedy rebuild does not look
//! ahead, so the result is not globally optimal.

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::fmt;

use docket_core::{
    CompatibilityOracle, JudgeId, MeetingId, Move, Placement, RoomId, Schedule, ScheduleError,
};
use docket_scoring::{RulesEngine, ScoreError, ScoringConfig};
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use tracing::trace;

use crate::candidates::CandidatePool;

/// How a ruin pass chooses its victims.
///
/// `None` resources are drawn at random from the ones in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuinStrategy {
    RandomMeetings,
    ByJudge(Option<JudgeId>),
    ByRoom(Option<RoomId>),
    ByDay(Option<u32>),
    MostLoadedJudge,
}

impl RuinStrategy {
    /// One of the strategies, uniformly, with random resources.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.random_range(0..5) {
            0 => Self::RandomMeetings,
            1 => Self::ByJudge(None),
            2 => Self::ByRoom(None),
            3 => Self::ByDay(None),
            _ => Self::MostLoadedJudge,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::RandomMeetings => "random_meetings",
            Self::ByJudge(_) => "by_judge",
            Self::ByRoom(_) => "by_room",
            Self::ByDay(_) => "by_day",
            Self::MostLoadedJudge => "most_loaded_judge",
        }
    }
}

impl fmt::Display for RuinStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByJudge(Some(j)) => write!(f, "by_judge({})", j),
            Self::ByRoom(Some(r)) => write!(f, "by_room({})", r),
            Self::ByDay(Some(d)) => write!(f, "by_day({})", d),
            other => f.write_str(other.name()),
        }
    }
}

/// Most planned meetings a pass may remove: `ceil(percentage * planned)`,
/// at least one when anything is planned.
pub fn removal_cap(planned: usize, percentage: f64) -> usize {
    if planned == 0 {
        return 0;
    }
    ((planned as f64 * percentage).ceil() as usize).clamp(1, planned)
}

/// Unplans up to [`removal_cap`] meetings chosen by `strategy` and returns
/// them in removal order.
pub fn ruin<R: Rng + ?Sized>(
    schedule: &mut Schedule,
    strategy: RuinStrategy,
    percentage: f64,
    rng: &mut R,
) -> Result<Vec<MeetingId>, ScheduleError> {
    let placed: Vec<(MeetingId, Placement)> = schedule
        .planned_meetings()
        .filter_map(|m| schedule.placement(m).map(|p| (m, p)))
        .collect();
    let cap = removal_cap(placed.len(), percentage);
    if cap == 0 {
        return Ok(Vec::new());
    }

    let mut victims: Vec<MeetingId> = match strategy {
        RuinStrategy::RandomMeetings => placed.iter().map(|&(m, _)| m).collect(),
        RuinStrategy::ByJudge(judge) => {
            let judge = judge.or_else(|| random_in_use(&placed, rng, |p| p.judge));
            select(&placed, |p| Some(p.judge) == judge)
        }
        RuinStrategy::ByRoom(room) => {
            let room = room.or_else(|| random_in_use(&placed, rng, |p| p.room));
            select(&placed, |p| Some(p.room) == room)
        }
        RuinStrategy::ByDay(day) => {
            let day = day.or_else(|| random_in_use(&placed, rng, |p| p.day));
            select(&placed, |p| Some(p.day) == day)
        }
        RuinStrategy::MostLoadedJudge => {
            let judge = most_loaded_judge(schedule, &placed)?;
            select(&placed, |p| Some(p.judge) == judge)
        }
    };
    victims.shuffle(rng);
    victims.truncate(cap);

    for &meeting in &victims {
        Move::delete(schedule, meeting)?.apply(schedule)?;
    }
    trace!(event = "ruin", strategy = strategy.name(), removed = victims.len(), cap);
    Ok(victims)
}

fn select(placed: &[(MeetingId, Placement)], keep: impl Fn(&Placement) -> bool) -> Vec<MeetingId> {
    placed
        .iter()
        .filter(|(_, p)| keep(p))
        .map(|&(m, _)| m)
        .collect()
}

fn random_in_use<T: Copy + Ord, R: Rng + ?Sized>(
    placed: &[(MeetingId, Placement)],
    rng: &mut R,
    key: impl Fn(&Placement) -> T,
) -> Option<T> {
    let mut used: Vec<T> = placed.iter().map(|(_, p)| key(p)).collect();
    used.sort_unstable();
    used.dedup();
    used.choose(rng).copied()
}

/// Judge with the most occupied slots; ties go to the lowest id.
fn most_loaded_judge(
    schedule: &Schedule,
    placed: &[(MeetingId, Placement)],
) -> Result<Option<JudgeId>, ScheduleError> {
    let mut load: BTreeMap<JudgeId, u32> = BTreeMap::new();
    for &(meeting, p) in placed {
        *load.entry(p.judge).or_default() += schedule.chain_len(meeting)?;
    }
    Ok(load
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .map(|(judge, _)| judge))
}

/// Result of a recreate pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecreateOutcome {
    /// Every unplanned meeting found a position.
    pub success: bool,
    pub inserted: usize,
}

/// Every insert position for `meeting`: compatible judge and room pairs on
/// days up to one past the horizon, at every start keeping the chain in
/// one day.
pub fn insert_candidates(
    schedule: &Schedule,
    oracle: &CompatibilityOracle,
    meeting: MeetingId,
) -> Result<Vec<Move>, ScheduleError> {
    let case = schedule.problem().case_of(meeting)?;
    let len = match schedule.chain_len(meeting) {
        Ok(len) if len <= schedule.slots_per_day() => len,
        Ok(_) | Err(ScheduleError::ZeroDuration(_)) => return Ok(Vec::new()),
        Err(err) => return Err(err),
    };
    let last_start = schedule.slots_per_day() - len + 1;

    let mut candidates = Vec::new();
    for judge in oracle.judges_for_case(case) {
        for room in oracle.rooms_for_case(case) {
            if !oracle.judge_room(judge, room) {
                continue;
            }
            for day in 1..=schedule.work_days() + 1 {
                for start in 1..=last_start {
                    let to = Placement::new(judge, room, day, start);
                    candidates.push(Move::insert(schedule, meeting, to)?);
                }
            }
        }
    }
    Ok(candidates)
}

/// Greedily inserts every unplanned meeting at its minimum-delta position.
pub fn recreate(
    schedule: &mut Schedule,
    engine: &RulesEngine,
    oracle: &CompatibilityOracle,
    scoring: &ScoringConfig,
    pool: &CandidatePool,
) -> Result<RecreateOutcome, ScoreError> {
    let unplanned: Vec<MeetingId> = schedule.unplanned_meetings().collect();
    let mut inserted = 0;

    for meeting in unplanned {
        let mut candidates = insert_candidates(schedule, oracle, meeting)?;
        let Some(best) = pool.score_candidates(schedule, engine, oracle, scoring, &mut candidates)?
        else {
            trace!(event = "recreate_skip", meeting);
            continue;
        };
        candidates.swap_remove(best.index).apply(schedule)?;
        inserted += 1;
    }

    Ok(RecreateOutcome {
        success: schedule.unplanned_count() == 0,
        inserted,
    })
}
