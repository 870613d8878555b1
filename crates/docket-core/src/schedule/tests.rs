use super::*;
use crate::test_utils::{eight_slot_schedule, flat_problem, plan_all};

#[test]
fn test_new_rejects_bad_dimensions() {
    let problem = flat_problem(1, 1, &[30]);
    assert!(matches!(
        Schedule::new(problem.clone(), 1, 240, 0),
        Err(ScheduleError::InvalidDimensions(_))
    ));
    assert!(matches!(
        Schedule::new(problem.clone(), 1, 250, 30),
        Err(ScheduleError::InvalidDimensions(_))
    ));
    assert!(matches!(
        Schedule::new(problem, 0, 240, 30),
        Err(ScheduleError::InvalidDimensions(_))
    ));
}

#[test]
fn test_new_schedule_has_everything_unplanned() {
    let schedule = eight_slot_schedule(flat_problem(1, 1, &[30, 60, 90]), 2);
    assert_eq!(schedule.slots_per_day(), 8);
    assert_eq!(schedule.unplanned_count(), 3);
    assert_eq!(schedule.planned_count(), 0);
    schedule.check_invariants().unwrap();
}

#[test]
fn test_chain_length_rounds_up() {
    let schedule = eight_slot_schedule(flat_problem(1, 1, &[30, 45, 90, 0]), 1);
    assert_eq!(schedule.chain_len(0).unwrap(), 1);
    assert_eq!(schedule.chain_len(1).unwrap(), 2);
    assert_eq!(schedule.chain_len(2).unwrap(), 3);
    assert_eq!(schedule.chain_len(3).unwrap_err(), ScheduleError::ZeroDuration(3));
}

#[test]
fn test_plan_builds_contiguous_chain() {
    let mut schedule = eight_slot_schedule(flat_problem(1, 1, &[90]), 1);
    schedule.plan(0, Placement::new(0, 0, 1, 2)).unwrap();

    let slots: Vec<_> = schedule.chain(0).unwrap().iter().map(|a| a.timeslot).collect();
    assert_eq!(slots, vec![2, 3, 4]);
    assert_eq!(schedule.placement(0), Some(Placement::new(0, 0, 1, 2)));
    assert!(!schedule.is_unplanned(0));
    schedule.check_invariants().unwrap();
}

#[test]
fn test_plan_rejects_chain_crossing_day() {
    let mut schedule = eight_slot_schedule(flat_problem(1, 1, &[90]), 1);
    let before = schedule.clone();
    let err = schedule.plan(0, Placement::new(0, 0, 1, 7)).unwrap_err();
    assert!(matches!(err, ScheduleError::ExceedsDay { end: 9, .. }));
    assert_eq!(schedule, before);
}

#[test]
fn test_check_target_rejects_start_near_max() {
    let schedule = eight_slot_schedule(flat_problem(1, 1, &[90]), 1);
    let err = schedule
        .check_target(0, Placement::new(0, 0, 1, u32::MAX - 1))
        .unwrap_err();
    assert!(matches!(err, ScheduleError::ExceedsDay { end: u32::MAX, .. }));
}

#[test]
fn test_chain_of_unknown_meeting_fails() {
    let schedule = eight_slot_schedule(flat_problem(1, 1, &[30]), 1);
    assert_eq!(schedule.chain(5).unwrap_err(), ScheduleError::UnknownMeeting(5));
    assert_eq!(schedule.chain(0).unwrap_err(), ScheduleError::NotPlanned(0));
}

#[test]
fn test_add_appointment_of_unplanned_meeting_fails() {
    let mut schedule = eight_slot_schedule(flat_problem(1, 1, &[30]), 1);
    let err = schedule
        .add_appointment(Appointment {
            meeting: 0,
            judge: 0,
            room: 0,
            day: 1,
            timeslot: 1,
        })
        .unwrap_err();
    assert_eq!(err, ScheduleError::AlreadyUnplanned(0));
}

#[test]
fn test_add_appointment_grows_horizon_and_trim_shrinks_it() {
    let mut schedule = eight_slot_schedule(flat_problem(1, 1, &[30, 30]), 1);
    plan_all(
        &mut schedule,
        &[(0, Placement::new(0, 0, 1, 1)), (1, Placement::new(0, 0, 4, 1))],
    );
    assert_eq!(schedule.work_days(), 4);

    schedule.remove_chain(1).unwrap();
    schedule.mark_unplanned(1).unwrap();
    schedule.trim_trailing_empty_days();
    assert_eq!(schedule.work_days(), 1);
    schedule.check_invariants().unwrap();
}

#[test]
fn test_trim_never_goes_below_one_day() {
    let mut schedule = eight_slot_schedule(flat_problem(1, 1, &[30]), 3);
    schedule.trim_trailing_empty_days();
    assert_eq!(schedule.work_days(), 1);
}

#[test]
fn test_appointments_ordered_by_day_then_slot() {
    let mut schedule = eight_slot_schedule(flat_problem(2, 2, &[60, 30, 30]), 2);
    plan_all(
        &mut schedule,
        &[
            (0, Placement::new(0, 0, 2, 1)),
            (1, Placement::new(1, 1, 1, 5)),
            (2, Placement::new(0, 0, 1, 5)),
        ],
    );

    let order: Vec<_> = schedule
        .appointments()
        .map(|a| (a.day, a.timeslot, a.meeting))
        .collect();
    assert_eq!(order, vec![(1, 5, 1), (1, 5, 2), (2, 1, 0), (2, 2, 0)]);

    // restartable
    assert_eq!(schedule.appointments().count(), 4);
    assert_eq!(schedule.appointments_at(1, 5).len(), 2);
    assert_eq!(schedule.appointments_on_day(2).count(), 2);
}

#[test]
fn test_remove_missing_appointment_fails() {
    let mut schedule = eight_slot_schedule(flat_problem(1, 1, &[30]), 1);
    schedule.plan(0, Placement::new(0, 0, 1, 1)).unwrap();
    let err = schedule
        .remove_appointment(Appointment {
            meeting: 0,
            judge: 0,
            room: 0,
            day: 1,
            timeslot: 2,
        })
        .unwrap_err();
    assert!(matches!(err, ScheduleError::AppointmentNotFound { .. }));
}

#[test]
fn test_rebuild_chains_from_grid() {
    let mut schedule = eight_slot_schedule(flat_problem(1, 2, &[90, 30]), 1);
    plan_all(
        &mut schedule,
        &[(0, Placement::new(0, 0, 1, 4)), (1, Placement::new(0, 1, 1, 1))],
    );
    let expected = schedule.clone();
    schedule.chains.clear();
    schedule.rebuild_chains_from_grid().unwrap();
    assert_eq!(schedule, expected);
    schedule.check_invariants().unwrap();
}

#[test]
fn test_room_free_ignores_the_meeting_itself() {
    let mut schedule = eight_slot_schedule(flat_problem(1, 1, &[60]), 1);
    schedule.plan(0, Placement::new(0, 0, 1, 3)).unwrap();
    assert!(schedule.room_free(0, 1, 1, 3, 0));
    assert!(!schedule.room_free(0, 1, 1, 3, 1));
    assert!(schedule.room_free(0, 1, 5, 2, 1));
}

#[test]
fn test_flat_index_round_trip() {
    let schedule = eight_slot_schedule(flat_problem(1, 1, &[30]), 1);
    assert_eq!(schedule.flat_index(1, 1), 0);
    assert_eq!(schedule.flat_index(2, 1), 8);
    assert_eq!(schedule.split_index(15), (2, 8));
}

#[test]
fn test_judge_day_placements_returns_heads_only() {
    let mut schedule = eight_slot_schedule(flat_problem(2, 2, &[90, 30, 30]), 1);
    plan_all(
        &mut schedule,
        &[
            (0, Placement::new(0, 0, 1, 4)),
            (1, Placement::new(0, 1, 1, 1)),
            (2, Placement::new(1, 1, 1, 2)),
        ],
    );
    let heads = schedule.judge_day_placements(0, 1);
    assert_eq!(
        heads,
        vec![(1, Placement::new(0, 1, 1, 1)), (0, Placement::new(0, 0, 1, 4))]
    );
}
