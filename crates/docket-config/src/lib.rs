//! Configuration system for docket.
//!
//! Load solver configuration from TOML or YAML files to control termination,
//! the annealing schedule, tabu memory and ruin-and-recreate without code
//! changes.
//!
//! # Examples
//!
//! Load configuration from a TOML string:
//!
//! ```
//! use docket_config::SolverConfig;
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     random_seed = 7
//!
//!     [termination]
//!     seconds_spent_limit = 30
//!
//!     [annealing]
//!     start_temperature = 250.0
//!     cooling_steps = 500
//!
//!     [tabu]
//!     capacity = 20
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
//! assert_eq!(config.annealing.cooling_steps, 500);
//! assert_eq!(config.tabu.capacity, 20);
//! ```
//!
//! Use the default config when the file is missing:
//!
//! ```
//! use docket_config::SolverConfig;
//!
//! let config = SolverConfig::load("docket.toml").unwrap_or_default();
//! assert!(config.validate().is_ok());
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main solver configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SolverConfig {
    /// Environment mode affecting reproducibility and assertions.
    pub environment_mode: EnvironmentMode,

    /// Random seed for reproducible results.
    pub random_seed: Option<u64>,

    /// Number of threads for parallel candidate scoring.
    pub move_thread_count: MoveThreadCount,

    pub termination: TerminationConfig,

    pub annealing: AnnealingConfig,

    pub tabu: TabuConfig,

    pub plateau: PlateauConfig,

    pub ruin: RuinConfig,

    pub scoring: ScoringSection,

    /// Outer iterations between progress events. Zero disables them.
    pub progress_interval: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            environment_mode: EnvironmentMode::default(),
            random_seed: None,
            move_thread_count: MoveThreadCount::default(),
            termination: TerminationConfig::default(),
            annealing: AnnealingConfig::default(),
            tabu: TabuConfig::default(),
            plateau: PlateauConfig::default(),
            ruin: RuinConfig::default(),
            scoring: ScoringSection::default(),
            progress_interval: 10,
        }
    }
}

impl SolverConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates configuration from a file. `.yaml` and `.yml`
    /// files are read as YAML, anything else as TOML.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, does not parse or fails
    /// validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_file(path)?,
            _ => Self::from_toml_file(path)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Sets the wall-clock budget in milliseconds.
    pub fn with_termination_millis(mut self, millis: u64) -> Self {
        self.termination.millis_spent_limit = Some(millis);
        self
    }

    /// Caps the number of outer iterations.
    pub fn with_outer_iteration_limit(mut self, limit: u64) -> Self {
        self.termination.outer_iteration_limit = Some(limit);
        self
    }

    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    pub fn with_move_thread_count(mut self, count: MoveThreadCount) -> Self {
        self.move_thread_count = count;
        self
    }

    /// Returns the wall-clock budget, if configured.
    ///
    /// Convenience method that delegates to `termination.time_limit()`.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.time_limit()
    }

    /// Checks that the values are mutually consistent.
    ///
    /// # Examples
    ///
    /// ```
    /// use docket_config::SolverConfig;
    ///
    /// let mut config = SolverConfig::default();
    /// config.annealing.end_temperature = 2.0 * config.annealing.start_temperature;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.annealing.validate()?;
        self.plateau.validate()?;
        self.ruin.validate()?;
        self.scoring.validate()?;
        if self.tabu.capacity == 0 {
            return Err(invalid("tabu.capacity must be positive"));
        }
        if self.move_thread_count == MoveThreadCount::Count(0) {
            return Err(invalid("move_thread_count must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

fn check_probability(name: &str, p: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(invalid(format!("{} must be within [0, 1], got {}", name, p)))
    }
}

/// Environment mode affecting solver behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// Non-reproducible mode with minimal overhead.
    #[default]
    NonReproducible,

    /// Reproducible mode with deterministic behavior.
    Reproducible,

    /// Checks schedule invariants once per outer iteration.
    FastAssert,

    /// Verifies every accepted delta against full evaluation.
    FullAssert,
}

impl EnvironmentMode {
    pub fn is_asserted(&self) -> bool {
        matches!(self, Self::FastAssert | Self::FullAssert)
    }
}

/// Move thread count configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveThreadCount {
    /// Score candidates on the global rayon pool.
    #[default]
    Auto,

    /// Score candidates sequentially on the driver thread.
    None,

    /// Score candidates on a dedicated pool of this many threads.
    Count(usize),
}

/// Termination configuration.
///
/// The budget is wall clock and checked once per outer iteration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend solving.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum milliseconds to spend solving, added to the seconds.
    pub millis_spent_limit: Option<u64>,

    /// Maximum number of outer iterations.
    pub outer_iteration_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let millis =
            self.seconds_spent_limit.unwrap_or(0) * 1000 + self.millis_spent_limit.unwrap_or(0);
        if millis > 0 {
            Some(Duration::from_millis(millis))
        } else {
            None
        }
    }

    /// True when neither a time nor an iteration limit is set.
    pub fn is_unbounded(&self) -> bool {
        self.time_limit().is_none() && self.outer_iteration_limit.is_none()
    }
}

/// Temperature schedule and move mix.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AnnealingConfig {
    /// Inner move/evaluate steps per outer iteration.
    pub iterations_per_temperature: usize,

    pub start_temperature: f64,

    pub end_temperature: f64,

    /// Geometric steps spanning start to end temperature.
    pub cooling_steps: u32,

    /// Chance per inner step of reinserting an unplanned meeting instead.
    pub reinsert_probability: f64,

    pub bands: BandConfig,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            iterations_per_temperature: 200,
            start_temperature: 500.0,
            end_temperature: 0.5,
            cooling_steps: 1000,
            reinsert_probability: 0.1,
            bands: BandConfig::default(),
        }
    }
}

impl AnnealingConfig {
    /// Per-step multiplicative cooling rate `(end/start)^(1/(K-1))`.
    ///
    /// # Examples
    ///
    /// ```
    /// use docket_config::AnnealingConfig;
    ///
    /// let config = AnnealingConfig {
    ///     start_temperature: 100.0,
    ///     end_temperature: 1.0,
    ///     cooling_steps: 3,
    ///     ..AnnealingConfig::default()
    /// };
    /// assert!((config.cooling_rate() - 0.1).abs() < 1e-12);
    /// ```
    pub fn cooling_rate(&self) -> f64 {
        if self.cooling_steps <= 1 {
            return self.end_temperature / self.start_temperature;
        }
        (self.end_temperature / self.start_temperature).powf(1.0 / f64::from(self.cooling_steps - 1))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations_per_temperature == 0 {
            return Err(invalid("annealing.iterations_per_temperature must be positive"));
        }
        if !(self.end_temperature > 0.0 && self.start_temperature > self.end_temperature) {
            return Err(invalid(format!(
                "annealing temperatures need start > end > 0, got {} and {}",
                self.start_temperature, self.end_temperature
            )));
        }
        if self.cooling_steps == 0 {
            return Err(invalid("annealing.cooling_steps must be positive"));
        }
        check_probability("annealing.reinsert_probability", self.reinsert_probability)?;
        self.bands.validate()
    }
}

/// Temperature bands and their compound-move probabilities.
///
/// Boundaries are fractions of the start-end temperature span measured from
/// the end temperature.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct BandConfig {
    pub high_boundary: f64,

    pub low_boundary: f64,

    pub high_compound_probability: f64,

    pub medium_compound_probability: f64,

    pub low_compound_probability: f64,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            high_boundary: 0.66,
            low_boundary: 0.33,
            high_compound_probability: 0.5,
            medium_compound_probability: 0.3,
            low_compound_probability: 0.1,
        }
    }
}

impl BandConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check_probability("bands.high_boundary", self.high_boundary)?;
        check_probability("bands.low_boundary", self.low_boundary)?;
        if self.low_boundary > self.high_boundary {
            return Err(invalid("bands.low_boundary must not exceed bands.high_boundary"));
        }
        check_probability("bands.high_compound_probability", self.high_compound_probability)?;
        check_probability("bands.medium_compound_probability", self.medium_compound_probability)?;
        check_probability("bands.low_compound_probability", self.low_compound_probability)
    }
}

/// Tabu memory configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct TabuConfig {
    /// Maximum remembered reverse signatures.
    pub capacity: usize,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self { capacity: 50 }
    }
}

/// Plateau limit range in outer iterations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PlateauConfig {
    /// Limit at the start temperature.
    pub min_limit: u32,

    /// Limit at or below the end temperature.
    pub max_limit: u32,
}

impl Default for PlateauConfig {
    fn default() -> Self {
        Self {
            min_limit: 5,
            max_limit: 30,
        }
    }
}

impl PlateauConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_limit == 0 || self.min_limit > self.max_limit {
            return Err(invalid(format!(
                "plateau limits need 0 < min <= max, got {} and {}",
                self.min_limit, self.max_limit
            )));
        }
        Ok(())
    }
}

/// Share of planned meetings removed by a ruin pass.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RuinConfig {
    pub min_percentage: f64,

    pub max_percentage: f64,
}

impl Default for RuinConfig {
    fn default() -> Self {
        Self {
            min_percentage: 0.1,
            max_percentage: 0.3,
        }
    }
}

impl RuinConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check_probability("ruin.min_percentage", self.min_percentage)?;
        check_probability("ruin.max_percentage", self.max_percentage)?;
        if self.min_percentage > self.max_percentage {
            return Err(invalid("ruin.min_percentage must not exceed ruin.max_percentage"));
        }
        Ok(())
    }
}

/// Tunables of the soft rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ScoringSection {
    /// Weekly judge occupancy above this percentage is penalized.
    pub coverage_ceiling_pct: u32,

    pub days_per_week: u32,

    /// Soft penalty per idle work day after a judge's last active day.
    pub idle_day_penalty: i64,
}

impl Default for ScoringSection {
    fn default() -> Self {
        Self {
            coverage_ceiling_pct: 80,
            days_per_week: 5,
            idle_day_penalty: 1,
        }
    }
}

impl ScoringSection {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.coverage_ceiling_pct > 100 {
            return Err(invalid("scoring.coverage_ceiling_pct must not exceed 100"));
        }
        if self.days_per_week == 0 {
            return Err(invalid("scoring.days_per_week must be positive"));
        }
        if self.idle_day_penalty < 0 {
            return Err(invalid("scoring.idle_day_penalty must not be negative"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
