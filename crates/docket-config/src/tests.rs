//! Tests for solver configuration.

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        environment_mode = "full_assert"
        random_seed = 42
        move_thread_count = { count = 4 }
        progress_interval = 25

        [termination]
        seconds_spent_limit = 2
        millis_spent_limit = 500
        outer_iteration_limit = 300

        [annealing]
        iterations_per_temperature = 50
        start_temperature = 100.0
        end_temperature = 1.0

        [annealing.bands]
        high_compound_probability = 0.8

        [plateau]
        min_limit = 3
        max_limit = 9

        [scoring]
        days_per_week = 7
    "#;

    let config = SolverConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.environment_mode, EnvironmentMode::FullAssert);
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.move_thread_count, MoveThreadCount::Count(4));
    assert_eq!(config.progress_interval, 25);
    assert_eq!(config.time_limit(), Some(Duration::from_millis(2500)));
    assert_eq!(config.termination.outer_iteration_limit, Some(300));
    assert_eq!(config.annealing.iterations_per_temperature, 50);
    assert_eq!(config.annealing.cooling_steps, 1000);
    assert_eq!(config.annealing.bands.high_compound_probability, 0.8);
    assert_eq!(config.annealing.bands.low_boundary, 0.33);
    assert_eq!(config.plateau.max_limit, 9);
    assert_eq!(config.scoring.days_per_week, 7);
    assert_eq!(config.scoring.coverage_ceiling_pct, 80);
    assert!(config.validate().is_ok());
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        environment_mode: reproducible
        random_seed: 42
        move_thread_count: none
        tabu:
          capacity: 12
        ruin:
          min_percentage: 0.2
          max_percentage: 0.4
    "#;

    let config = SolverConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.environment_mode, EnvironmentMode::Reproducible);
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.move_thread_count, MoveThreadCount::None);
    assert_eq!(config.tabu.capacity, 12);
    assert_eq!(config.ruin.max_percentage, 0.4);
}

#[test]
fn test_empty_document_is_default() {
    let config = SolverConfig::from_toml_str("").unwrap();
    assert_eq!(config, SolverConfig::default());
    assert!(config.termination.is_unbounded());
    assert_eq!(config.progress_interval, 10);
}

#[test]
fn test_unknown_variant_is_rejected() {
    let err = SolverConfig::from_toml_str(r#"environment_mode = "turbo""#).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn test_load_picks_format_by_extension() {
    let dir = std::env::temp_dir().join(format!("docket-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let yaml = dir.join("solver.yaml");
    let yml = dir.join("solver.yml");
    let toml = dir.join("solver.toml");
    std::fs::write(&yaml, "random_seed: 7\ntabu:\n  capacity: 12\n").unwrap();
    std::fs::write(&yml, "random_seed: 8\n").unwrap();
    std::fs::write(&toml, "random_seed = 9\n").unwrap();

    let from_yaml = SolverConfig::load(&yaml).unwrap();
    assert_eq!(from_yaml.random_seed, Some(7));
    assert_eq!(from_yaml.tabu.capacity, 12);
    assert_eq!(SolverConfig::load(&yml).unwrap().random_seed, Some(8));
    assert_eq!(SolverConfig::load(&toml).unwrap().random_seed, Some(9));

    // TOML syntax in a YAML file is a YAML error
    std::fs::write(&yaml, "random_seed = 7\n").unwrap();
    assert!(matches!(SolverConfig::load(&yaml), Err(ConfigError::Yaml(_))));

    std::fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_missing_file_is_io_error() {
    let err = SolverConfig::load("/definitely/not/here/docket.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_builder() {
    let config = SolverConfig::new()
        .with_random_seed(123)
        .with_termination_millis(750)
        .with_outer_iteration_limit(40)
        .with_environment_mode(EnvironmentMode::FastAssert)
        .with_move_thread_count(MoveThreadCount::None);

    assert_eq!(config.random_seed, Some(123));
    assert_eq!(config.time_limit(), Some(Duration::from_millis(750)));
    assert_eq!(config.termination.outer_iteration_limit, Some(40));
    assert!(config.environment_mode.is_asserted());
    assert!(!config.termination.is_unbounded());
}

#[test]
fn test_validate_rejects_inconsistent_values() {
    let mut config = SolverConfig::default();
    config.plateau.min_limit = 10;
    config.plateau.max_limit = 2;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let mut config = SolverConfig::default();
    config.ruin.max_percentage = 1.5;
    assert!(config.validate().is_err());

    let mut config = SolverConfig::default();
    config.annealing.bands.low_boundary = 0.9;
    assert!(config.validate().is_err());

    let mut config = SolverConfig::default();
    config.tabu.capacity = 0;
    assert!(config.validate().is_err());

    let config = SolverConfig::default().with_move_thread_count(MoveThreadCount::Count(0));
    assert!(config.validate().is_err());
}

#[test]
fn test_cooling_rate_spans_range_in_k_steps() {
    let annealing = AnnealingConfig {
        start_temperature: 500.0,
        end_temperature: 0.5,
        cooling_steps: 1000,
        ..AnnealingConfig::default()
    };
    let rate = annealing.cooling_rate();
    let last = annealing.start_temperature * rate.powi(999);
    assert!((last - annealing.end_temperature).abs() < 1e-9);
}
