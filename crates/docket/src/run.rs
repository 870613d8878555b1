//! Solver entry points that hide the driver wiring.

use std::io;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use docket_config::{ConfigError, SolverConfig};
use docket_core::{CompatibilityOracle, Schedule};
use docket_solver::{BestSolution, SimulatedAnnealing, SolveResult, SolverError};
use tokio::sync::mpsc;

/// Configuration file read by [`run_solver`].
pub const CONFIG_FILE: &str = "solver.toml";

/// Solves `schedule` with `config`.
///
/// With the `console` feature the colored console is installed first.
pub fn solve(
    schedule: Schedule,
    oracle: &CompatibilityOracle,
    config: SolverConfig,
) -> Result<SolveResult, SolverError> {
    init_console();
    SimulatedAnnealing::new(config)?.solve(schedule, oracle)
}

/// Solves `schedule`, streaming every new best through `sender`.
///
/// Raising `stop` ends the search at the next outer iteration.
pub fn solve_with_channel(
    schedule: Schedule,
    oracle: &CompatibilityOracle,
    config: SolverConfig,
    sender: mpsc::UnboundedSender<BestSolution>,
    stop: Option<Arc<AtomicBool>>,
) -> Result<SolveResult, SolverError> {
    init_console();
    let mut driver = SimulatedAnnealing::new(config)?.with_best_solution_sender(sender);
    if let Some(stop) = stop {
        driver = driver.with_stop_flag(stop);
    }
    driver.solve(schedule, oracle)
}

/// Solves with the configuration in `dir`/[`CONFIG_FILE`], or the defaults
/// when there is no such file.
pub fn run_solver(
    schedule: Schedule,
    oracle: &CompatibilityOracle,
    dir: impl AsRef<Path>,
) -> Result<SolveResult, SolverError> {
    let config = load_or_default(dir.as_ref().join(CONFIG_FILE))?;
    solve(schedule, oracle, config)
}

pub(crate) fn load_or_default(path: impl AsRef<Path>) -> Result<SolverConfig, ConfigError> {
    match SolverConfig::load(path) {
        Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(SolverConfig::default()),
        other => other,
    }
}

#[cfg(feature = "console")]
fn init_console() {
    docket_console::init();
}

#[cfg(not(feature = "console"))]
fn init_console() {}
