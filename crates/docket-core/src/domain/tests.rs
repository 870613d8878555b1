use super::*;

fn problem() -> Problem {
    Problem::new(
        vec![
            Judge::new(0, "Plain"),
            Judge::new(1, "Cleared")
                .with_characteristics([Attribute::Security, Attribute::Skill(2)])
                .with_room_requirements([Attribute::Security]),
        ],
        vec![
            Room::new(0, "Hall"),
            Room::new(1, "Vault").with_characteristics([Attribute::Security]),
        ],
        vec![
            Case::new(0),
            Case::new(1)
                .with_judge_requirements([Attribute::Skill(2)])
                .with_room_requirements([Attribute::Security]),
        ],
        vec![Meeting::new(0, 0, 30), Meeting::new(1, 1, 60), Meeting::new(2, 1, 90)],
    )
    .unwrap()
}

#[test]
fn test_problem_derives_case_meetings() {
    let p = problem();
    assert_eq!(p.case(0).unwrap().meetings, vec![0]);
    assert_eq!(p.case(1).unwrap().meetings, vec![1, 2]);
    assert_eq!(p.case_of(2).unwrap(), 1);
    assert_eq!(p.meeting_count(), 3);
}

#[test]
fn test_problem_rejects_mismatched_ids() {
    let err = Problem::new(vec![Judge::new(3, "X")], vec![], vec![], vec![]).unwrap_err();
    assert!(matches!(err, ScheduleError::InvalidProblem(_)));

    let err = Problem::new(vec![], vec![], vec![Case::new(0)], vec![Meeting::new(0, 4, 30)])
        .unwrap_err();
    assert_eq!(err, ScheduleError::UnknownCase(4));
}

#[test]
fn test_unknown_meeting() {
    let p = problem();
    assert_eq!(p.meeting(9).unwrap_err(), ScheduleError::UnknownMeeting(9));
}

#[test]
fn test_attribute_set_sorted_and_deduplicated() {
    let set = AttributeSet::from_iter([
        Attribute::Skill(4),
        Attribute::Virtual,
        Attribute::Skill(4),
        Attribute::Security,
    ]);
    assert_eq!(set.len(), 3);
    let items: Vec<_> = set.iter().copied().collect();
    assert_eq!(
        items,
        vec![Attribute::Virtual, Attribute::Security, Attribute::Skill(4)]
    );
    assert!(AttributeSet::new().is_superset_of(&AttributeSet::new()));
}

#[test]
fn test_bidirectional_compatibility() {
    let p = problem();
    let oracle = CompatibilityOracle::from_problem(&p);

    // case 1 needs skill 2 from the judge and security from the room
    assert!(oracle.case_judge(0, 0));
    assert!(!oracle.case_judge(1, 0));
    assert!(oracle.case_judge(1, 1));
    assert!(!oracle.case_room(1, 0));
    assert!(oracle.case_room(1, 1));

    // judge 1 requires a secured room
    assert!(!oracle.judge_room(1, 0));
    assert!(oracle.judge_room(1, 1));
    assert!(oracle.judge_room(0, 1));
}

#[test]
fn test_oracle_miss_is_incompatible() {
    let oracle = CompatibilityOracle::permissive(2, 2, 2);
    assert!(oracle.case_judge(1, 1));
    assert!(!oracle.case_judge(2, 0));
    assert!(!oracle.case_room(0, 5));
    assert!(!oracle.judge_room(5, 0));
}

#[test]
fn test_from_matrices() {
    let oracle = CompatibilityOracle::from_matrices(
        vec![vec![true, false]],
        vec![vec![false, true, true]],
        vec![vec![true, true, true], vec![false, false, true]],
    )
    .unwrap();
    assert_eq!(oracle.judges_for_case(0).collect::<Vec<_>>(), vec![0]);
    assert_eq!(oracle.rooms_for_case(0).collect::<Vec<_>>(), vec![1, 2]);
    assert!(!oracle.judge_room(1, 0));

    let ragged = CompatibilityOracle::from_matrices(
        vec![vec![true, false]],
        vec![vec![true]],
        vec![vec![true, true], vec![true]],
    );
    assert!(ragged.is_err());
}
