//! The simulated annealing driver.
//!
//! Logging levels:
//! - **INFO**: solve start/end, ruin-and-recreate passes
//! - **DEBUG**: progress every `progress_interval` outer iterations, reheats,
//!   plateaus, recalibrations, new best scores
//! - **TRACE**: individual move evaluations

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use docket_config::{AnnealingConfig, EnvironmentMode, PlateauConfig, SolverConfig};
use docket_core::{CompatibilityOracle, Move, Schedule, ScoreBreakdown};
use docket_scoring::{FullScore, RulesEngine, ScoringConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::sync::mpsc;
use tracing::{debug, info, trace};

use crate::candidates::CandidatePool;
use crate::error::{Result, SolverError};
use crate::generator::{GenerateError, MoveGenerator, SearchContext};
use crate::ruin::{recreate, ruin, RuinStrategy};
use crate::snapshot::ScheduleSnapshot;
use crate::stats::{SolveSummary, SolverStats, TerminationReason};
use crate::tabu::TabuMemory;

/// Default time limit in seconds when no termination is configured.
const DEFAULT_TIME_LIMIT_SECS: u64 = 30;

/// Seed used by the reproducible modes when none is configured.
const DEFAULT_SEED: u64 = 0;

/// A new best schedule, as streamed to the caller.
#[derive(Debug, Clone)]
pub struct BestSolution {
    pub snapshot: ScheduleSnapshot,
    pub score: FullScore,
}

/// Outcome of [`SimulatedAnnealing::solve`].
#[derive(Debug)]
pub struct SolveResult {
    /// The best schedule found, rebuilt from its snapshot.
    pub schedule: Schedule,
    pub score: FullScore,
    pub summary: SolveSummary,
}

/// Where the outer loop stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Running,
    Plateaued,
    RuinAndRecreate,
    Terminated(TerminationReason),
}

/// Probability of proposing a compound move at `temperature`.
///
/// The temperature's position in the start-end span picks one of three
/// bands.
pub fn band_probability(config: &AnnealingConfig, temperature: f64) -> f64 {
    let bands = &config.bands;
    let fraction = temperature_fraction(config, temperature);
    if fraction >= bands.high_boundary {
        bands.high_compound_probability
    } else if fraction >= bands.low_boundary {
        bands.medium_compound_probability
    } else {
        bands.low_compound_probability
    }
}

/// How many non-improving outer iterations are tolerated at `temperature`.
///
/// Grows linearly from `min_limit` at the start temperature to `max_limit`
/// at the end temperature.
pub fn plateau_limit(config: &AnnealingConfig, plateau: &PlateauConfig, temperature: f64) -> u32 {
    let cooled = (1.0 - temperature_fraction(config, temperature)).clamp(0.0, 1.0);
    let span = f64::from(plateau.max_limit.saturating_sub(plateau.min_limit));
    plateau.min_limit + (span * cooled).round() as u32
}

/// `(T - end) / (start - end)`.
fn temperature_fraction(config: &AnnealingConfig, temperature: f64) -> f64 {
    let span = config.start_temperature - config.end_temperature;
    if span <= 0.0 {
        return 0.0;
    }
    (temperature - config.end_temperature) / span
}

/// Metropolis acceptance: improvements always, a worsening `delta` with
/// probability `exp(-delta / temperature)`.
pub fn metropolis<R: Rng + ?Sized>(delta: i64, temperature: f64, rng: &mut R) -> bool {
    if delta < 0 {
        return true;
    }
    if temperature <= 0.0 {
        return delta == 0;
    }
    rng.random::<f64>() < (-(delta as f64) / temperature).exp()
}

/// Simulated annealing over a [`Schedule`], with tabu memory, contracting
/// passes and ruin-and-recreate on plateaus.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use docket_config::SolverConfig;
/// use docket_core::{Case, CompatibilityOracle, Judge, Meeting, Problem, Room, Schedule};
/// use docket_solver::SimulatedAnnealing;
///
/// let problem = Arc::new(
///     Problem::new(
///         vec![Judge::new(0, "A")],
///         vec![Room::new(0, "R")],
///         vec![Case::new(0)],
///         vec![Meeting::new(0, 0, 60)],
///     )
///     .unwrap(),
/// );
/// let oracle = CompatibilityOracle::from_problem(&problem);
/// let schedule = Schedule::new(problem, 1, 240, 30).unwrap();
///
/// let config = SolverConfig::default()
///     .with_random_seed(7)
///     .with_outer_iteration_limit(3);
/// let result = SimulatedAnnealing::new(config)
///     .unwrap()
///     .solve(schedule, &oracle)
///     .unwrap();
/// assert_eq!(result.schedule.unplanned_count(), 0);
/// ```
#[derive(Debug)]
pub struct SimulatedAnnealing {
    config: SolverConfig,
    engine: RulesEngine,
    generator: MoveGenerator,
    stop: Option<Arc<AtomicBool>>,
    best_sender: Option<mpsc::UnboundedSender<BestSolution>>,
}

impl SimulatedAnnealing {
    /// Creates a driver; the configuration is validated first.
    pub fn new(config: SolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            engine: RulesEngine::new(),
            generator: MoveGenerator::new(),
            stop: None,
            best_sender: None,
        })
    }

    /// Replaces the default rule battery.
    pub fn with_engine(mut self, engine: RulesEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Stops the search at the next outer iteration once the flag is set.
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop = Some(flag);
        self
    }

    /// Streams every new best schedule through `sender`.
    pub fn with_best_solution_sender(mut self, sender: mpsc::UnboundedSender<BestSolution>) -> Self {
        self.best_sender = Some(sender);
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn engine(&self) -> &RulesEngine {
        &self.engine
    }

    /// Searches from `schedule` until a termination condition holds and
    /// returns the best schedule found.
    pub fn solve(&self, schedule: Schedule, oracle: &CompatibilityOracle) -> Result<SolveResult> {
        let config = &self.config;
        let time_limit = if config.termination.is_unbounded() {
            Some(Duration::from_secs(DEFAULT_TIME_LIMIT_SECS))
        } else {
            config.time_limit()
        };
        let seed = match (config.random_seed, config.environment_mode) {
            (Some(seed), _) => seed,
            (None, EnvironmentMode::NonReproducible) => rand::rng().random(),
            (None, _) => DEFAULT_SEED,
        };

        info!(
            event = "solve_start",
            meetings = schedule.problem().meeting_count(),
            judges = schedule.problem().judge_count(),
            rooms = schedule.problem().room_count(),
            work_days = schedule.work_days(),
            time_limit_secs = time_limit.map(|d| d.as_secs_f64()),
            seed,
        );

        let pool = CandidatePool::from_config(config.move_thread_count)?;
        let section = &config.scoring;
        let scoring = ScoringConfig::new(
            section.coverage_ceiling_pct,
            section.days_per_week,
            section.idle_day_penalty,
        )
        .calibrated(&schedule);

        let mut stats = SolverStats::default();
        stats.start();
        let initial = self.engine.calculate_full_score(&schedule, oracle, &scoring);
        stats.record_score_calculation();

        let mut search = Search {
            config,
            engine: &self.engine,
            generator: self.generator,
            oracle,
            pool,
            sender: self.best_sender.as_ref(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            best_snapshot: ScheduleSnapshot::capture(&schedule),
            schedule,
            scoring,
            tabu: TabuMemory::new(config.tabu.capacity),
            current: initial.breakdown,
            best: initial.breakdown,
            temperature: config.annealing.start_temperature,
            cooling_rate: config.annealing.cooling_rate(),
            plateau: 0,
            stats,
        };

        let mut state = SearchState::Running;
        let reason = loop {
            if let Some(reason) = self.termination(&search.stats, time_limit) {
                state = SearchState::Terminated(reason);
            }
            state = match state {
                SearchState::Running => search.outer_iteration()?,
                SearchState::Plateaued => {
                    debug!(
                        event = "plateau",
                        iterations = search.plateau,
                        temperature = search.temperature,
                    );
                    SearchState::RuinAndRecreate
                }
                SearchState::RuinAndRecreate => {
                    search.ruin_and_recreate()?;
                    SearchState::Running
                }
                SearchState::Terminated(reason) => break reason,
            };
        };

        search.finish(initial, reason)
    }

    fn termination(&self, stats: &SolverStats, time_limit: Option<Duration>) -> Option<TerminationReason> {
        if self
            .stop
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
        {
            return Some(TerminationReason::Stopped);
        }
        if self
            .config
            .termination
            .outer_iteration_limit
            .is_some_and(|limit| stats.outer_iterations >= limit)
        {
            return Some(TerminationReason::IterationLimit);
        }
        if time_limit.is_some_and(|limit| stats.elapsed() >= limit) {
            return Some(TerminationReason::TimeLimit);
        }
        None
    }
}

/// State owned by one run of the driver.
struct Search<'a> {
    config: &'a SolverConfig,
    engine: &'a RulesEngine,
    generator: MoveGenerator,
    oracle: &'a CompatibilityOracle,
    pool: CandidatePool,
    sender: Option<&'a mpsc::UnboundedSender<BestSolution>>,
    rng: ChaCha8Rng,
    schedule: Schedule,
    scoring: ScoringConfig,
    tabu: TabuMemory,
    current: ScoreBreakdown,
    best: ScoreBreakdown,
    best_snapshot: ScheduleSnapshot,
    temperature: f64,
    cooling_rate: f64,
    plateau: u32,
    stats: SolverStats,
}

impl<'a> Search<'a> {
    fn current_total(&self) -> i64 {
        self.scoring.weights().total(&self.current)
    }

    fn best_total(&self) -> i64 {
        self.scoring.weights().total(&self.best)
    }

    fn full_assert(&self) -> bool {
        self.config.environment_mode == EnvironmentMode::FullAssert
    }

    /// Contracting pass, inner loop, cooling and plateau bookkeeping.
    fn outer_iteration(&mut self) -> Result<SearchState> {
        let config: &'a SolverConfig = self.config;
        let annealing = &config.annealing;
        self.stats.outer_iterations += 1;
        self.recalibrate_if_needed();
        let best_before = self.best_total();

        if self.stats.outer_iterations > 1 {
            self.contract()?;
        }
        for _ in 0..annealing.iterations_per_temperature {
            self.step()?;
        }

        self.temperature *= self.cooling_rate;
        if self.temperature < annealing.end_temperature {
            self.temperature = annealing.start_temperature;
            self.stats.reheats += 1;
            debug!(event = "reheat", temperature = self.temperature);
        }

        if config.environment_mode.is_asserted() {
            self.schedule.check_invariants()?;
        }

        if self.best_total() < best_before {
            self.plateau = 0;
        } else {
            self.plateau += 1;
        }

        let interval = config.progress_interval;
        if interval > 0 && self.stats.outer_iterations % interval == 0 {
            debug!(
                event = "progress",
                outer = self.stats.outer_iterations,
                temperature = self.temperature,
                score = self.current_total(),
                best = self.best_total(),
                hard = self.best.hard(),
                medium = self.best.medium(),
                soft = self.best.soft(),
                acceptance_rate = self.stats.acceptance_rate(),
                speed = self.stats.moves_per_second() as u64,
            );
        }

        let limit = plateau_limit(annealing, &config.plateau, self.temperature);
        Ok(if self.plateau >= limit {
            SearchState::Plateaued
        } else {
            SearchState::Running
        })
    }

    /// One propose, evaluate, accept-or-reject step.
    fn step(&mut self) -> Result<()> {
        self.stats.record_step();
        let mut mv = match self.propose() {
            Ok(mv) => mv,
            Err(e) if e.is_recoverable() => {
                trace!(event = "skip", reason = %e);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let delta = self.engine.calculate_delta_breakdown(
            &mut self.schedule,
            self.oracle,
            &self.scoring,
            &mut mv,
        )?;
        self.stats.record_score_calculation();
        let weighted = self.scoring.weights().total(&delta);
        let accepted = metropolis(weighted, self.temperature, &mut self.rng);
        self.stats.record_move(accepted);
        trace!(event = "move", kind = mv.kind(), delta = weighted, accepted);
        if !accepted {
            return Ok(());
        }

        if self.full_assert() {
            self.apply_verified(&mut mv, weighted)?;
        } else {
            mv.apply(&mut self.schedule)?;
        }
        self.current += delta;
        self.tabu.record_move(&mv);
        self.observe_best();
        Ok(())
    }

    /// A reinsert with `reinsert_probability` when anything is unplanned,
    /// otherwise a compound or single reposition per the temperature band.
    fn propose(&mut self) -> Result<Move, GenerateError> {
        let config: &'a SolverConfig = self.config;
        let annealing = &config.annealing;
        let ctx = SearchContext {
            oracle: self.oracle,
            engine: self.engine,
            scoring: &self.scoring,
            tabu: &self.tabu,
            current_total: self.scoring.weights().total(&self.current),
            best_total: self.scoring.weights().total(&self.best),
        };

        if self.schedule.unplanned_count() > 0 && self.rng.random_bool(annealing.reinsert_probability) {
            return self.generator.insert(&ctx, &self.schedule, &mut self.rng);
        }
        if self
            .rng
            .random_bool(band_probability(annealing, self.temperature))
        {
            self.generator.compound(&ctx, &mut self.schedule, &mut self.rng)
        } else {
            self.generator.single(&ctx, &mut self.schedule, &mut self.rng)
        }
    }

    /// Applies `mv` and checks `delta` against two full evaluations.
    fn apply_verified(&mut self, mv: &mut Move, delta: i64) -> Result<()> {
        let before = self.engine.calculate_full_score(&self.schedule, self.oracle, &self.scoring);
        mv.apply(&mut self.schedule)?;
        let after = self.engine.calculate_full_score(&self.schedule, self.oracle, &self.scoring);
        self.stats.record_score_calculation();
        let full = after.total - before.total;
        if full != delta {
            return Err(SolverError::ScoreCorruption {
                kind: mv.kind(),
                delta,
                full,
            });
        }
        Ok(())
    }

    /// Unconditional contracting pass; its delta is measured by undoing it
    /// and scoring it as an ordinary move.
    fn contract(&mut self) -> Result<()> {
        let mut mv = self.generator.contracting(&mut self.schedule)?;
        if matches!(&mv, Move::Contracting(c) if c.is_empty()) {
            return Ok(());
        }
        mv.revert(&mut self.schedule)?;
        let delta = self.engine.calculate_delta_breakdown(
            &mut self.schedule,
            self.oracle,
            &self.scoring,
            &mut mv,
        )?;
        let weighted = self.scoring.weights().total(&delta);
        if self.full_assert() {
            self.apply_verified(&mut mv, weighted)?;
        } else {
            mv.apply(&mut self.schedule)?;
        }
        self.current += delta;
        self.stats.contracting_passes += 1;
        trace!(event = "contracting", delta = weighted);
        self.observe_best();
        Ok(())
    }

    /// Ruins a random share of the schedule, rebuilds it greedily and
    /// re-scores it from scratch.
    fn ruin_and_recreate(&mut self) -> Result<()> {
        let config: &'a SolverConfig = self.config;
        let settings = &config.ruin;
        let strategy = RuinStrategy::random(&mut self.rng);
        let percentage = self
            .rng
            .random_range(settings.min_percentage..=settings.max_percentage);

        let removed = ruin(&mut self.schedule, strategy, percentage, &mut self.rng)?;
        let outcome = recreate(
            &mut self.schedule,
            self.engine,
            self.oracle,
            &self.scoring,
            &self.pool,
        )?;
        if outcome.success {
            self.tabu.clear();
        }

        self.recalibrate_if_needed();
        let score = self.engine.calculate_full_score(&self.schedule, self.oracle, &self.scoring);
        self.stats.record_score_calculation();
        self.current = score.breakdown;
        self.stats.ruin_recreates += 1;
        self.plateau = 0;

        info!(
            event = "ruin_recreate",
            strategy = %strategy,
            removed = removed.len(),
            inserted = outcome.inserted,
            success = outcome.success,
            score = %score,
        );
        self.observe_best();
        Ok(())
    }

    /// Recalibrates weights when the horizon moved since the last
    /// calibration. Totals follow since they derive from breakdowns.
    fn recalibrate_if_needed(&mut self) {
        if !self.scoring.needs_recalibration(&self.schedule) {
            return;
        }
        let from = self.scoring.calibrated_horizon();
        self.scoring.calibrate(&self.schedule);
        debug!(
            event = "recalibrate",
            from = from,
            to = self.schedule.work_days(),
            medium = self.scoring.weights().medium(),
        );
    }

    /// Records the current schedule when it beats the best one.
    fn observe_best(&mut self) {
        let total = self.current_total();
        if total >= self.best_total() {
            return;
        }
        self.best = self.current;
        self.best_snapshot = ScheduleSnapshot::capture(&self.schedule);
        self.stats.improvements += 1;
        debug!(event = "new_best", score = total, hard = self.best.hard());

        if let Some(sender) = self.sender {
            let _ = sender.send(BestSolution {
                snapshot: self.best_snapshot.clone(),
                score: FullScore {
                    total,
                    breakdown: self.best,
                },
            });
        }
    }

    /// Rebuilds the best schedule and scores it against its own horizon.
    fn finish(mut self, initial: FullScore, reason: TerminationReason) -> Result<SolveResult> {
        let problem = self.schedule.problem_arc().clone();
        let schedule = self.best_snapshot.restore(problem)?;
        self.scoring.calibrate(&schedule);
        let score = self.engine.calculate_full_score(&schedule, self.oracle, &self.scoring);

        if self.config.environment_mode.is_asserted() && score.breakdown != self.best {
            return Err(SolverError::ScoreCorruption {
                kind: "snapshot",
                delta: self.scoring.weights().total(&self.best),
                full: score.total,
            });
        }

        let summary = SolveSummary {
            reason,
            duration: self.stats.elapsed(),
            initial_score: initial,
            best_score: score,
            final_temperature: self.temperature,
            planned: schedule.planned_count(),
            unplanned: schedule.unplanned_count(),
            stats: self.stats,
        };
        info!(
            event = "solve_end",
            duration_ms = summary.duration.as_millis() as u64,
            score = %score,
            feasible = score.is_feasible(),
            outer_iterations = summary.stats.outer_iterations,
            acceptance_rate = summary.stats.acceptance_rate(),
            reason = %reason,
        );

        Ok(SolveResult {
            schedule,
            score,
            summary,
        })
    }
}
