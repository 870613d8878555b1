//! Run statistics and the end-of-run summary.

use std::fmt;
use std::io;
use std::time::{Duration, Instant};

use docket_scoring::FullScore;

/// Counters for one solve.
///
/// # Example
///
/// ```
/// use docket_solver::stats::SolverStats;
///
/// let mut stats = SolverStats::default();
/// stats.start();
/// stats.record_step();
/// stats.record_move(true);
/// stats.record_move(false);
///
/// assert_eq!(stats.step_count, 1);
/// assert_eq!(stats.moves_evaluated, 2);
/// assert_eq!(stats.acceptance_rate(), 0.5);
/// ```
#[derive(Debug, Default, Clone)]
pub struct SolverStats {
    start_time: Option<Instant>,
    /// Inner steps taken, including skipped ones.
    pub step_count: u64,
    /// Moves that were delta-scored and put to the acceptance test.
    pub moves_evaluated: u64,
    pub moves_accepted: u64,
    pub score_calculations: u64,
    pub outer_iterations: u64,
    pub reheats: u64,
    pub ruin_recreates: u64,
    pub contracting_passes: u64,
    /// New best scores found.
    pub improvements: u64,
}

impl SolverStats {
    /// Marks the start of solving.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Elapsed time since [`start`](Self::start), zero before it.
    pub fn elapsed(&self) -> Duration {
        self.start_time.map(|t| t.elapsed()).unwrap_or_default()
    }

    pub fn record_move(&mut self, accepted: bool) {
        self.moves_evaluated += 1;
        if accepted {
            self.moves_accepted += 1;
        }
    }

    pub fn record_step(&mut self) {
        self.step_count += 1;
    }

    pub fn record_score_calculation(&mut self) {
        self.score_calculations += 1;
    }

    pub fn moves_per_second(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.moves_evaluated as f64 / secs
        } else {
            0.0
        }
    }

    /// Accepted over evaluated, zero when nothing was evaluated.
    pub fn acceptance_rate(&self) -> f64 {
        if self.moves_evaluated == 0 {
            0.0
        } else {
            self.moves_accepted as f64 / self.moves_evaluated as f64
        }
    }
}

/// Why the driver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    TimeLimit,
    IterationLimit,
    /// The external stop flag was raised.
    Stopped,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TimeLimit => "time limit",
            Self::IterationLimit => "iteration limit",
            Self::Stopped => "stopped",
        })
    }
}

/// What a finished run reports.
#[derive(Debug, Clone)]
pub struct SolveSummary {
    pub reason: TerminationReason,
    pub duration: Duration,
    pub initial_score: FullScore,
    pub best_score: FullScore,
    pub final_temperature: f64,
    pub planned: usize,
    pub unplanned: usize,
    pub stats: SolverStats,
}

impl SolveSummary {
    /// Writes the Display rendering followed by a newline.
    pub fn write_to<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self)
    }
}

impl fmt::Display for SolveSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.stats;
        writeln!(f, "terminated:       {}", self.reason)?;
        writeln!(f, "duration:         {:.3}s", self.duration.as_secs_f64())?;
        writeln!(f, "initial score:    {}", self.initial_score)?;
        writeln!(f, "best score:       {}", self.best_score)?;
        writeln!(f, "feasible:         {}", self.best_score.is_feasible())?;
        writeln!(
            f,
            "meetings:         {} planned, {} unplanned",
            self.planned, self.unplanned
        )?;
        writeln!(f, "outer iterations: {}", s.outer_iterations)?;
        writeln!(
            f,
            "moves:            {} evaluated, {} accepted ({:.1}%)",
            s.moves_evaluated,
            s.moves_accepted,
            s.acceptance_rate() * 100.0
        )?;
        writeln!(f, "improvements:     {}", s.improvements)?;
        writeln!(
            f,
            "ruin/recreate:    {} passes, {} reheats, {} contracting passes",
            s.ruin_recreates, s.reheats, s.contracting_passes
        )?;
        write!(f, "final temp:       {:.3}", self.final_temperature)
    }
}
