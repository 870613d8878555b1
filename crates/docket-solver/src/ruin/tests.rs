use docket_core::{Attribute, Case, CompatibilityOracle, Placement, Schedule};
use docket_scoring::{RulesEngine, ScoringConfig};
use docket_test::{random_schedule, two_judge_week, ProblemBuilder, RandomShape};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;
use crate::candidates::CandidatePool;

fn total_meetings(schedule: &Schedule) -> usize {
    schedule.planned_count() + schedule.unplanned_count()
}

fn sorted(mut ids: Vec<usize>) -> Vec<usize> {
    ids.sort_unstable();
    ids
}

#[test]
fn test_removal_cap() {
    assert_eq!(removal_cap(10, 0.25), 3);
    assert_eq!(removal_cap(5, 0.0), 1);
    assert_eq!(removal_cap(3, 1.0), 3);
    assert_eq!(removal_cap(0, 0.5), 0);
}

#[test]
fn test_random_ruin_respects_cap() {
    let mut schedule = two_judge_week();
    let mut rng = StdRng::seed_from_u64(11);
    let removed = ruin(&mut schedule, RuinStrategy::RandomMeetings, 0.5, &mut rng).unwrap();

    assert_eq!(removed.len(), 3);
    assert_eq!(schedule.planned_count(), 3);
    assert_eq!(total_meetings(&schedule), 7);
    for m in removed {
        assert!(schedule.is_unplanned(m));
    }
    schedule.check_invariants().unwrap();
}

#[test]
fn test_ruin_by_resource() {
    let mut rng = StdRng::seed_from_u64(0);

    let mut schedule = two_judge_week();
    let removed = ruin(&mut schedule, RuinStrategy::ByJudge(Some(0)), 1.0, &mut rng).unwrap();
    assert_eq!(sorted(removed), vec![0, 2, 4]);

    let mut schedule = two_judge_week();
    let removed = ruin(&mut schedule, RuinStrategy::ByRoom(Some(0)), 1.0, &mut rng).unwrap();
    assert_eq!(sorted(removed), vec![0, 4, 5]);

    let mut schedule = two_judge_week();
    let removed = ruin(&mut schedule, RuinStrategy::ByDay(Some(2)), 1.0, &mut rng).unwrap();
    assert_eq!(sorted(removed), vec![3, 4]);
    assert_eq!(schedule.work_days(), 3);
}

#[test]
fn test_ruin_by_judge_is_capped() {
    let mut schedule = two_judge_week();
    let mut rng = StdRng::seed_from_u64(5);
    // cap is ceil(6 * 0.2) = 2 of judge 1's three meetings
    let removed = ruin(&mut schedule, RuinStrategy::ByJudge(Some(1)), 0.2, &mut rng).unwrap();
    assert_eq!(removed.len(), 2);
    assert!(removed.iter().all(|m| [1, 3, 5].contains(m)));
}

#[test]
fn test_most_loaded_judge_ties_to_lowest_id() {
    // both judges carry five slots
    let mut schedule = two_judge_week();
    let mut rng = StdRng::seed_from_u64(1);
    let removed = ruin(&mut schedule, RuinStrategy::MostLoadedJudge, 1.0, &mut rng).unwrap();
    assert_eq!(sorted(removed), vec![0, 2, 4]);
}

#[test]
fn test_ruin_on_empty_schedule() {
    let problem = ProblemBuilder::new()
        .judges(1)
        .rooms(1)
        .single_meeting_cases(2, 30)
        .build();
    let mut schedule = Schedule::new(problem, 1, 240, 30).unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    let removed = ruin(&mut schedule, RuinStrategy::random(&mut rng), 0.3, &mut rng).unwrap();
    assert!(removed.is_empty());
}

#[test]
fn test_recreate_picks_minimum_delta_position() {
    let problem = ProblemBuilder::new()
        .judges(1)
        .rooms(1)
        .single_meeting_cases(2, 30)
        .build();
    let mut schedule = Schedule::new(problem, 1, 240, 30).unwrap();
    schedule.plan(0, Placement::new(0, 0, 1, 1)).unwrap();
    let oracle = CompatibilityOracle::from_problem(schedule.problem());
    let scoring = ScoringConfig::default().calibrated(&schedule);
    let engine = RulesEngine::new();

    for pool in [CandidatePool::Sequential, CandidatePool::Global] {
        let mut copy = schedule.clone();
        let outcome = recreate(&mut copy, &engine, &oracle, &scoring, &pool).unwrap();
        assert_eq!(
            outcome,
            RecreateOutcome {
                success: true,
                inserted: 1
            }
        );
        // right after meeting 0: no gap, no new day
        assert_eq!(copy.placement(1), Some(Placement::new(0, 0, 1, 2)));
    }
}

#[test]
fn test_recreate_reports_unplaceable_meeting() {
    let problem = ProblemBuilder::new()
        .judges(1)
        .rooms(1)
        .case(&[30])
        .case_from(
            Case::new(0).with_room_requirements([Attribute::Virtual]),
            &[30],
        )
        .build();
    let mut schedule = Schedule::new(problem, 1, 240, 30).unwrap();
    let oracle = CompatibilityOracle::from_problem(schedule.problem());
    let scoring = ScoringConfig::default().calibrated(&schedule);
    let engine = RulesEngine::new();

    let outcome = recreate(
        &mut schedule,
        &engine,
        &oracle,
        &scoring,
        &CandidatePool::Sequential,
    )
    .unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.inserted, 1);
    assert!(schedule.is_unplanned(1));
}

#[test]
fn test_insert_candidates_skip_meetings_without_a_chain() {
    let problem = ProblemBuilder::new()
        .judges(1)
        .rooms(1)
        .case(&[300])
        .case(&[0])
        .build();
    let schedule = Schedule::new(problem, 1, 240, 30).unwrap();
    let oracle = CompatibilityOracle::from_problem(schedule.problem());

    assert!(insert_candidates(&schedule, &oracle, 0).unwrap().is_empty());
    assert!(insert_candidates(&schedule, &oracle, 1).unwrap().is_empty());
}

#[test]
fn test_ruin_and_recreate_conserves_meetings() {
    let engine = RulesEngine::new();
    for seed in 0..8 {
        let mut schedule = random_schedule(seed, &RandomShape::default());
        let oracle = CompatibilityOracle::from_problem(schedule.problem());
        let scoring = ScoringConfig::default().calibrated(&schedule);
        let before = total_meetings(&schedule);
        let mut rng = StdRng::seed_from_u64(seed);

        let strategy = RuinStrategy::random(&mut rng);
        let removed = ruin(&mut schedule, strategy, 0.3, &mut rng).unwrap();
        assert_eq!(total_meetings(&schedule), before);

        let unplanned = schedule.unplanned_count();
        let outcome = recreate(
            &mut schedule,
            &engine,
            &oracle,
            &scoring,
            &CandidatePool::Sequential,
        )
        .unwrap();
        assert_eq!(total_meetings(&schedule), before);
        assert_eq!(schedule.unplanned_count(), unplanned - outcome.inserted);
        assert!(outcome.inserted <= unplanned);
        assert!(removed.len() <= unplanned);
        schedule.check_invariants().unwrap();
    }
}

#[test]
fn test_insert_candidates_cover_grid() {
    let schedule = two_judge_week();
    let oracle = CompatibilityOracle::from_problem(schedule.problem());
    // meeting 6 spans four slots: 2 judges * 2 rooms * 4 days * 5 starts
    let candidates = insert_candidates(&schedule, &oracle, 6).unwrap();
    assert_eq!(candidates.len(), 80);
    assert!(candidates.iter().all(|m| m.kind() == "insert"));
}

#[test]
fn test_strategy_display() {
    assert_eq!(RuinStrategy::ByDay(Some(3)).to_string(), "by_day(3)");
    assert_eq!(RuinStrategy::ByRoom(None).to_string(), "by_room");
    assert_eq!(RuinStrategy::MostLoadedJudge.name(), "most_loaded_judge");
}
