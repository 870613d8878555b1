//! Seeded random problems, schedules and moves for property tests.

use std::sync::Arc;

use docket_core::{Attribute, Case, Judge, Meeting, Move, Placement, Problem, Room, Schedule};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

/// Shape of a random instance.
#[derive(Debug, Clone, Copy)]
pub struct RandomShape {
    pub judges: usize,
    pub rooms: usize,
    pub cases: usize,
    pub max_meetings_per_case: usize,
    pub work_days: u32,
    pub minutes_per_day: u32,
    pub granularity: u32,
    /// Probability that a meeting starts out planned.
    pub planned_probability: f64,
    /// Probability that an entity carries or requires an attribute.
    pub attribute_probability: f64,
}

impl Default for RandomShape {
    fn default() -> Self {
        Self {
            judges: 3,
            rooms: 3,
            cases: 6,
            max_meetings_per_case: 3,
            work_days: 3,
            minutes_per_day: 240,
            granularity: 30,
            planned_probability: 0.8,
            attribute_probability: 0.25,
        }
    }
}

const ATTRIBUTES: [Attribute; 3] = [Attribute::Virtual, Attribute::Security, Attribute::Skill(1)];

fn attributes(rng: &mut StdRng, probability: f64) -> Vec<Attribute> {
    ATTRIBUTES
        .iter()
        .copied()
        .filter(|_| rng.random_bool(probability))
        .collect()
}

/// A random arena: attributes are sprinkled so some pairs are incompatible.
pub fn random_problem(rng: &mut StdRng, shape: &RandomShape) -> Arc<Problem> {
    let p = shape.attribute_probability;
    let judges = (0..shape.judges)
        .map(|id| {
            Judge::new(id, format!("Judge {}", id))
                .with_characteristics(attributes(rng, 0.5))
                .with_room_requirements(attributes(rng, p / 2.0))
                .with_case_requirements(attributes(rng, p / 2.0))
        })
        .collect();
    let rooms = (0..shape.rooms)
        .map(|id| {
            Room::new(id, format!("Room {}", id))
                .with_characteristics(attributes(rng, 0.5))
                .with_judge_requirements(attributes(rng, p / 2.0))
                .with_case_requirements(attributes(rng, p / 2.0))
        })
        .collect();
    let cases = (0..shape.cases)
        .map(|id| {
            Case::new(id)
                .with_characteristics(attributes(rng, 0.5))
                .with_judge_requirements(attributes(rng, p))
                .with_room_requirements(attributes(rng, p))
        })
        .collect();

    let slots = shape.minutes_per_day / shape.granularity;
    let mut meetings = Vec::new();
    for case in 0..shape.cases {
        let count = rng.random_range(1..=shape.max_meetings_per_case.max(1));
        for _ in 0..count {
            let len = rng.random_range(1..=slots.clamp(1, 4));
            let id = meetings.len();
            meetings.push(Meeting::new(id, case, len * shape.granularity));
        }
    }

    Arc::new(Problem::new(judges, rooms, cases, meetings).expect("generated ids are consistent"))
}

/// A random placement where the meeting's chain fits in one day, within
/// `1..=max_day`.
pub fn random_placement(rng: &mut StdRng, schedule: &Schedule, meeting: usize, max_day: u32) -> Placement {
    let len = schedule.chain_len(meeting).expect("generated durations are positive");
    let judge = rng.random_range(0..schedule.problem().judge_count());
    let room = rng.random_range(0..schedule.problem().room_count());
    let day = rng.random_range(1..=max_day.max(1));
    let start = rng.random_range(1..=schedule.slots_per_day() - len + 1);
    Placement::new(judge, room, day, start)
}

/// A random schedule for a random problem built from `seed`.
///
/// Planned meetings land anywhere, so double bookings and incompatibilities
/// are expected. Trailing empty days are trimmed.
pub fn random_schedule(seed: u64, shape: &RandomShape) -> Schedule {
    let mut rng = StdRng::seed_from_u64(seed);
    let problem = random_problem(&mut rng, shape);
    let mut schedule = Schedule::new(problem, shape.work_days, shape.minutes_per_day, shape.granularity)
        .expect("shape dimensions are valid");
    for meeting in 0..schedule.problem().meeting_count() {
        if rng.random_bool(shape.planned_probability) {
            let placement = random_placement(&mut rng, &schedule, meeting, shape.work_days);
            schedule.plan(meeting, placement).expect("placement fits");
        }
    }
    schedule.trim_trailing_empty_days();
    schedule
}

/// A random unapplied move valid for the current schedule: a reposition,
/// insert or delete, possibly growing the horizon by one day.
pub fn random_move(rng: &mut StdRng, schedule: &Schedule) -> Option<Move> {
    let planned: Vec<usize> = schedule.planned_meetings().collect();
    let unplanned: Vec<usize> = schedule.unplanned_meetings().collect();
    let max_day = schedule.work_days() + 1;

    for _ in 0..16 {
        let roll = rng.random_range(0..10);
        let mv = if roll < 7 {
            let Some(&meeting) = planned.choose(rng) else {
                continue;
            };
            let to = random_placement(rng, schedule, meeting, max_day);
            Move::reposition(schedule, meeting, to)
        } else if roll < 9 {
            let Some(&meeting) = unplanned.choose(rng) else {
                continue;
            };
            let to = random_placement(rng, schedule, meeting, max_day);
            Move::insert(schedule, meeting, to)
        } else {
            let Some(&meeting) = planned.choose(rng) else {
                continue;
            };
            Move::delete(schedule, meeting)
        };
        if let Ok(mv) = mv {
            return Some(mv);
        }
    }
    None
}
