use std::fs;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use docket_test::two_judge_week;
use tokio::sync::mpsc;

use crate::run::load_or_default;
use crate::*;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("docket-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_missing_config_file_means_defaults() {
    let dir = scratch_dir("missing");
    let config = load_or_default(dir.join(CONFIG_FILE)).unwrap();
    assert_eq!(config, SolverConfig::default());
}

#[test]
fn test_run_solver_reads_config_file() {
    let dir = scratch_dir("run");
    fs::write(
        dir.join(CONFIG_FILE),
        "random_seed = 3\nmove_thread_count = \"none\"\n\n[termination]\nouter_iteration_limit = 2\n",
    )
    .unwrap();

    let schedule = two_judge_week();
    let oracle = CompatibilityOracle::from_problem(schedule.problem());
    let result = run_solver(schedule, &oracle, &dir).unwrap();
    assert_eq!(result.summary.reason, TerminationReason::IterationLimit);
    assert_eq!(result.summary.stats.outer_iterations, 2);
    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_broken_config_file_is_an_error() {
    let dir = scratch_dir("broken");
    fs::write(dir.join(CONFIG_FILE), "random_seed = \"three\"\n").unwrap();

    let schedule = two_judge_week();
    let oracle = CompatibilityOracle::from_problem(schedule.problem());
    let err = run_solver(schedule, &oracle, &dir).unwrap_err();
    assert!(matches!(err, SolverError::Config(ConfigError::Toml(_))));
    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_solve_with_channel_honors_stop_flag() {
    let schedule = two_judge_week();
    let oracle = CompatibilityOracle::from_problem(schedule.problem());
    let (sender, mut receiver) = mpsc::unbounded_channel();
    let config = SolverConfig::default().with_random_seed(1);

    let result = solve_with_channel(
        schedule,
        &oracle,
        config,
        sender,
        Some(Arc::new(AtomicBool::new(true))),
    )
    .unwrap();
    assert_eq!(result.summary.reason, TerminationReason::Stopped);
    assert!(receiver.try_recv().is_err());
}

#[test]
fn test_solve_plans_the_waiting_meeting() {
    let schedule = two_judge_week();
    let oracle = CompatibilityOracle::from_problem(schedule.problem());
    let config = SolverConfig::default()
        .with_random_seed(8)
        .with_outer_iteration_limit(10)
        .with_move_thread_count(MoveThreadCount::None);

    let result = solve(schedule, &oracle, config).unwrap();
    assert!(result.score.is_feasible());
    assert!(result.schedule.is_planned(6));
    assert!(result.score.total < result.summary.initial_score.total);
}
