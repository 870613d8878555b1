use docket_core::{Dimension, Move, Placement, Signature};
use docket_test::two_judge_week;

use super::*;

fn sig(meeting: usize, dimension: Dimension, value: usize) -> Signature {
    Signature {
        meeting,
        dimension,
        value,
    }
}

#[test]
fn test_new_memory_is_empty() {
    let tabu = TabuMemory::new(5);
    assert!(tabu.is_empty());
    assert_eq!(tabu.capacity(), 5);
    assert!(!tabu.contains(&sig(0, Dimension::Day, 1)));
}

#[test]
fn test_fifo_eviction() {
    let mut tabu = TabuMemory::new(2);
    tabu.record([sig(1, Dimension::Judge, 0)]);
    tabu.record([sig(2, Dimension::Judge, 0)]);
    assert!(tabu.contains(&sig(1, Dimension::Judge, 0)));

    tabu.record([sig(3, Dimension::Judge, 0)]);
    assert!(!tabu.contains(&sig(1, Dimension::Judge, 0)));
    assert!(tabu.contains(&sig(2, Dimension::Judge, 0)));
    assert!(tabu.contains(&sig(3, Dimension::Judge, 0)));
    assert_eq!(tabu.len(), 2);
}

#[test]
fn test_zero_capacity_remembers_nothing() {
    let mut tabu = TabuMemory::new(0);
    tabu.record([sig(1, Dimension::Room, 2)]);
    assert!(tabu.is_empty());
}

#[test]
fn test_reverse_of_accepted_move_is_tabu() {
    let schedule = two_judge_week();
    let mut tabu = TabuMemory::new(10);

    // meeting 2 sits in room 1; moving it to room 0 forbids going back
    let accepted = Move::reposition(&schedule, 2, Placement::new(0, 0, 1, 4)).unwrap();
    tabu.record_move(&accepted);
    assert!(tabu.contains(&sig(2, Dimension::Room, 1)));

    let mut moved = schedule.clone();
    let mut applied = accepted.clone();
    applied.apply(&mut moved).unwrap();

    let back = Move::reposition(&moved, 2, Placement::new(0, 1, 1, 4)).unwrap();
    assert!(tabu.is_tabu(&back));

    let elsewhere = Move::reposition(&moved, 2, Placement::new(0, 0, 1, 5)).unwrap();
    assert!(!tabu.is_tabu(&elsewhere));
}

#[test]
fn test_insert_and_delete_are_never_tabu() {
    let schedule = two_judge_week();
    let mut tabu = TabuMemory::new(10);
    let delete = Move::delete(&schedule, 0).unwrap();
    tabu.record_move(&delete);
    assert!(tabu.is_empty());
    assert!(!tabu.is_tabu(&delete));
}

#[test]
fn test_aspiration_requires_new_best() {
    assert!(TabuMemory::aspires(100, -11, 90));
    assert!(!TabuMemory::aspires(100, -10, 90));
    assert!(!TabuMemory::aspires(100, 5, 90));
}

#[test]
fn test_clear() {
    let mut tabu = TabuMemory::new(3);
    tabu.record([sig(1, Dimension::Timeslot, 4), sig(1, Dimension::Day, 2)]);
    assert_eq!(tabu.len(), 2);
    tabu.clear();
    assert!(tabu.is_empty());
}
