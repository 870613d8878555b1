use super::*;
use crate::error::ScheduleError;
use crate::test_utils::{eight_slot_schedule, flat_problem, plan_all};

#[test]
fn test_reposition_apply_and_revert() {
    let mut schedule = eight_slot_schedule(flat_problem(2, 2, &[60]), 1);
    schedule.plan(0, Placement::new(0, 0, 1, 2)).unwrap();
    let before = schedule.clone();

    let mut mv = Move::reposition(&schedule, 0, Placement::new(1, 1, 1, 6)).unwrap();
    mv.apply(&mut schedule).unwrap();
    let slots: Vec<_> = schedule
        .chain(0)
        .unwrap()
        .iter()
        .map(|a| (a.judge, a.room, a.day, a.timeslot))
        .collect();
    assert_eq!(slots, vec![(1, 1, 1, 6), (1, 1, 1, 7)]);
    schedule.check_invariants().unwrap();

    mv.revert(&mut schedule).unwrap();
    assert_eq!(schedule, before);
}

#[test]
fn test_reposition_across_days_grows_then_restores_horizon() {
    let mut schedule = eight_slot_schedule(flat_problem(1, 1, &[90]), 1);
    schedule.plan(0, Placement::new(0, 0, 1, 6)).unwrap();
    let before = schedule.clone();

    let mut mv = Move::reposition(&schedule, 0, Placement::new(0, 0, 2, 1)).unwrap();
    mv.apply(&mut schedule).unwrap();
    // day 1 is now empty but still the first day; horizon is 2
    assert_eq!(schedule.work_days(), 2);
    let positions: Vec<_> = schedule
        .chain(0)
        .unwrap()
        .iter()
        .map(|a| (a.day, a.timeslot))
        .collect();
    assert_eq!(positions, vec![(2, 1), (2, 2), (2, 3)]);

    mv.revert(&mut schedule).unwrap();
    assert_eq!(schedule, before);
    assert_eq!(schedule.work_days(), 1);
}

#[test]
fn test_reposition_back_trims_trailing_day() {
    let mut schedule = eight_slot_schedule(flat_problem(1, 1, &[30, 30]), 1);
    plan_all(
        &mut schedule,
        &[(0, Placement::new(0, 0, 1, 1)), (1, Placement::new(0, 0, 3, 1))],
    );
    assert_eq!(schedule.work_days(), 3);
    let before = schedule.clone();

    let mut mv = Move::reposition(&schedule, 1, Placement::new(0, 0, 1, 2)).unwrap();
    mv.apply(&mut schedule).unwrap();
    assert_eq!(schedule.work_days(), 1);
    mv.revert(&mut schedule).unwrap();
    assert_eq!(schedule.work_days(), 3);
    assert_eq!(schedule, before);
}

#[test]
fn test_empty_reposition_rejected() {
    let mut schedule = eight_slot_schedule(flat_problem(1, 1, &[30]), 1);
    schedule.plan(0, Placement::new(0, 0, 1, 1)).unwrap();
    let err = Move::reposition(&schedule, 0, Placement::new(0, 0, 1, 1)).unwrap_err();
    assert_eq!(err, ScheduleError::EmptyMove(0));
}

#[test]
fn test_reposition_past_day_end_rejected() {
    let mut schedule = eight_slot_schedule(flat_problem(1, 1, &[90]), 1);
    schedule.plan(0, Placement::new(0, 0, 1, 1)).unwrap();
    let err = Move::reposition(&schedule, 0, Placement::new(0, 0, 1, 7)).unwrap_err();
    assert!(matches!(err, ScheduleError::ExceedsDay { .. }));

    let err = Move::reposition(&schedule, 0, Placement::new(0, 0, 1, u32::MAX)).unwrap_err();
    assert!(matches!(err, ScheduleError::ExceedsDay { end: u32::MAX, .. }));
}

#[test]
fn test_double_apply_and_double_revert_fail() {
    let mut schedule = eight_slot_schedule(flat_problem(1, 1, &[30]), 1);
    schedule.plan(0, Placement::new(0, 0, 1, 1)).unwrap();

    let mut mv = Move::reposition(&schedule, 0, Placement::new(0, 0, 1, 2)).unwrap();
    assert_eq!(mv.revert(&mut schedule).unwrap_err(), ScheduleError::MoveNotApplied);
    mv.apply(&mut schedule).unwrap();
    let applied = schedule.clone();
    assert_eq!(mv.apply(&mut schedule).unwrap_err(), ScheduleError::MoveAlreadyApplied);
    assert_eq!(schedule, applied);
}

#[test]
fn test_stale_move_fails_without_mutation() {
    let mut schedule = eight_slot_schedule(flat_problem(1, 1, &[30]), 1);
    schedule.plan(0, Placement::new(0, 0, 1, 1)).unwrap();

    let mut first = Move::reposition(&schedule, 0, Placement::new(0, 0, 1, 2)).unwrap();
    let mut stale = Move::reposition(&schedule, 0, Placement::new(0, 0, 1, 3)).unwrap();
    first.apply(&mut schedule).unwrap();
    let snapshot = schedule.clone();

    let err = stale.apply(&mut schedule).unwrap_err();
    assert!(matches!(err, ScheduleError::ChainDesync { meeting: 0, .. }));
    assert_eq!(schedule, snapshot);
    assert!(!stale.is_applied());
}

#[test]
fn test_changed_dimensions_and_signatures() {
    let mut schedule = eight_slot_schedule(flat_problem(2, 2, &[30]), 1);
    schedule.plan(0, Placement::new(0, 0, 1, 1)).unwrap();
    let mv = Move::reposition(&schedule, 0, Placement::new(1, 0, 1, 4)).unwrap();

    let Move::Reposition(inner) = &mv else {
        panic!("expected reposition");
    };
    assert_eq!(
        inner.changed_dimensions().into_vec(),
        vec![Dimension::Judge, Dimension::Timeslot]
    );
    assert_eq!(mv.kind(), "compound");

    let reverse = mv.reverse_signatures();
    assert_eq!(reverse.len(), 2);
    assert_eq!(
        reverse[0],
        Signature {
            meeting: 0,
            dimension: Dimension::Judge,
            value: 0
        }
    );
    assert_eq!(reverse[1].value, 1);
    assert_eq!(mv.signatures()[1].value, 4);
}

#[test]
fn test_insert_and_delete_round_trip() {
    let mut schedule = eight_slot_schedule(flat_problem(1, 1, &[60, 30]), 1);
    schedule.plan(1, Placement::new(0, 0, 1, 1)).unwrap();
    let before = schedule.clone();

    let mut insert = Move::insert(&schedule, 0, Placement::new(0, 0, 2, 3)).unwrap();
    insert.apply(&mut schedule).unwrap();
    assert!(schedule.is_planned(0));
    assert_eq!(schedule.work_days(), 2);
    schedule.check_invariants().unwrap();
    assert!(insert.signatures().is_empty());

    let mut delete = Move::delete(&schedule, 1).unwrap();
    delete.apply(&mut schedule).unwrap();
    assert!(schedule.is_unplanned(1));
    schedule.check_invariants().unwrap();

    delete.revert(&mut schedule).unwrap();
    insert.revert(&mut schedule).unwrap();
    assert_eq!(schedule, before);
}

#[test]
fn test_delete_of_last_day_trims_and_revert_restores() {
    let mut schedule = eight_slot_schedule(flat_problem(1, 1, &[30, 30]), 1);
    plan_all(
        &mut schedule,
        &[(0, Placement::new(0, 0, 1, 1)), (1, Placement::new(0, 0, 2, 1))],
    );
    let before = schedule.clone();

    let mut delete = Move::delete(&schedule, 1).unwrap();
    delete.apply(&mut schedule).unwrap();
    assert_eq!(schedule.work_days(), 1);
    delete.revert(&mut schedule).unwrap();
    assert_eq!(schedule, before);
}

#[test]
fn test_insert_prerequisites() {
    let mut schedule = eight_slot_schedule(flat_problem(1, 1, &[30, 0, 120]), 1);
    schedule.plan(0, Placement::new(0, 0, 1, 1)).unwrap();

    assert_eq!(
        Move::insert(&schedule, 0, Placement::new(0, 0, 1, 2)).unwrap_err(),
        ScheduleError::NotUnplanned(0)
    );
    assert_eq!(
        Move::insert(&schedule, 1, Placement::new(0, 0, 1, 2)).unwrap_err(),
        ScheduleError::ZeroDuration(1)
    );
    assert!(matches!(
        Move::insert(&schedule, 2, Placement::new(0, 0, 1, 6)).unwrap_err(),
        ScheduleError::ExceedsDay { .. }
    ));
    assert_eq!(
        Move::delete(&schedule, 2).unwrap_err(),
        ScheduleError::NotPlanned(2)
    );
}

#[test]
fn test_footprint() {
    let mut schedule = eight_slot_schedule(flat_problem(1, 2, &[60]), 1);
    schedule.plan(0, Placement::new(0, 0, 1, 1)).unwrap();
    let mv = Move::reposition(&schedule, 0, Placement::new(0, 1, 1, 3)).unwrap();
    let touches = mv.footprint();
    assert_eq!(touches.len(), 1);
    let before = touches[0].before.unwrap();
    let after = touches[0].after.unwrap();
    assert_eq!(before.slots().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!((after.room, after.start, after.len), (1, 3, 2));
}

#[test]
fn test_contracting_moves_lone_meeting_to_first_slot() {
    let mut schedule = eight_slot_schedule(flat_problem(1, 1, &[30]), 1);
    schedule.plan(0, Placement::new(0, 0, 1, 5)).unwrap();
    let before = schedule.clone();

    let mut contracting = ContractingMove::generate(&mut schedule).unwrap();
    assert_eq!(contracting.moves().len(), 1);
    assert_eq!(contracting.moves()[0].to().start, 1);
    assert_eq!(schedule.placement(0), Some(Placement::new(0, 0, 1, 1)));
    schedule.check_invariants().unwrap();

    contracting.revert(&mut schedule).unwrap();
    assert_eq!(schedule, before);
}

#[test]
fn test_contracting_fills_only_idle_time_before_the_pass() {
    let mut schedule = eight_slot_schedule(flat_problem(1, 1, &[30, 30]), 1);
    plan_all(
        &mut schedule,
        &[(0, Placement::new(0, 0, 1, 3)), (1, Placement::new(0, 0, 1, 5))],
    );

    let contracting = ContractingMove::generate(&mut schedule).unwrap();
    assert_eq!(contracting.moves().len(), 2);
    assert_eq!(schedule.placement(0).unwrap().start, 1);
    assert_eq!(schedule.placement(1).unwrap().start, 4);
}

#[test]
fn test_contracting_skips_occupied_room_and_optimal_meetings() {
    // judge 1 holds room 0 at slots 1-2, so judge 0's first meeting cannot move up
    let mut schedule = eight_slot_schedule(flat_problem(2, 1, &[30, 60, 30]), 1);
    plan_all(
        &mut schedule,
        &[
            (0, Placement::new(0, 0, 1, 3)),
            (1, Placement::new(1, 0, 1, 1)),
            (2, Placement::new(0, 0, 1, 4)),
        ],
    );
    let before = schedule.clone();

    let mut contracting = ContractingMove::generate(&mut schedule).unwrap();
    assert!(contracting.is_empty());
    let reasons: Vec<_> = contracting
        .skipped()
        .iter()
        .map(|s| (s.meeting, s.reason))
        .collect();
    assert!(reasons.contains(&(0, SkipReason::RoomOccupied)));
    assert!(reasons.contains(&(2, SkipReason::AlreadyOptimal)));
    assert!(reasons.contains(&(1, SkipReason::AlreadyOptimal)));
    assert_eq!(schedule, before);

    contracting.revert(&mut schedule).unwrap();
    assert_eq!(schedule, before);
}

#[test]
fn test_contracting_move_reapply() {
    let mut schedule = eight_slot_schedule(flat_problem(1, 1, &[30, 30]), 2);
    plan_all(
        &mut schedule,
        &[(0, Placement::new(0, 0, 1, 4)), (1, Placement::new(0, 0, 2, 6))],
    );
    let before = schedule.clone();

    let mut mv = Move::Contracting(ContractingMove::generate(&mut schedule).unwrap());
    let contracted = schedule.clone();
    assert_eq!(mv.footprint().len(), 2);

    mv.revert(&mut schedule).unwrap();
    assert_eq!(schedule, before);
    mv.apply(&mut schedule).unwrap();
    assert_eq!(schedule, contracted);
}
