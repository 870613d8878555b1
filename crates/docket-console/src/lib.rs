//! Colored console output for solver events.
//!
//! Provides a `tracing` layer that renders the driver's structured events.
//!
//! ## Log Levels
//!
//! - **INFO**: solve start/end, ruin-and-recreate passes
//! - **DEBUG**: progress lines, reheats
//! - **TRACE**: individual move evaluations

#[cfg(test)]
mod tests;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static SOLVE_START_NANOS: AtomicU64 = AtomicU64::new(0);

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_DIRECTIVE: &str = "docket_solver=info";

/// Installs the console layer as the global subscriber and prints the
/// banner.
///
/// Safe to call multiple times; only the first call has effect. A global
/// subscriber installed elsewhere wins silently.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();
        let _ = tracing_subscriber::registry()
            .with(env_filter())
            .with(DocketConsoleLayer)
            .try_init();
    });
}

/// `RUST_LOG` when set, [`DEFAULT_DIRECTIVE`] otherwise.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

fn mark_solve_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    SOLVE_START_NANOS.store(nanos, Ordering::Relaxed);
}

fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = SOLVE_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let banner = r#"
     _            _        _
  __| | ___   ___| | _____| |_
 / _` |/ _ \ / __| |/ / _ \ __|
| (_| | (_) | (__|   <  __/ |_
 \__,_|\___/ \___|_|\_\___|\__|
"#;

    let version_line = format!("   v{} - Court Scheduling Search\n", VERSION);

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats solver events with colors.
pub struct DocketConsoleLayer;

impl<S: Subscriber> Layer<S> for DocketConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !is_solver_target(metadata.target()) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

fn is_solver_target(target: &str) -> bool {
    target.starts_with("docket_solver") || target.starts_with("docket::")
}

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    score: Option<String>,
    strategy: Option<String>,
    reason: Option<String>,
    meetings: Option<u64>,
    judges: Option<u64>,
    rooms: Option<u64>,
    work_days: Option<u64>,
    outer: Option<u64>,
    outer_iterations: Option<u64>,
    removed: Option<u64>,
    inserted: Option<u64>,
    duration_ms: Option<u64>,
    speed: Option<u64>,
    kind: Option<String>,
    delta: Option<i64>,
    total: Option<i64>,
    best: Option<i64>,
    hard: Option<i64>,
    medium: Option<i64>,
    soft: Option<i64>,
    temperature: Option<f64>,
    time_limit_secs: Option<f64>,
    acceptance_rate: Option<f64>,
    accepted: Option<bool>,
    feasible: Option<bool>,
    success: Option<bool>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value).trim_matches('"').to_string();
        match field.name() {
            "event" => self.event = Some(s),
            "score" => self.score = Some(s),
            "strategy" => self.strategy = Some(s),
            "reason" => self.reason = Some(s),
            "kind" => self.kind = Some(s),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "meetings" => self.meetings = Some(value),
            "judges" => self.judges = Some(value),
            "rooms" => self.rooms = Some(value),
            "work_days" => self.work_days = Some(value),
            "outer" => self.outer = Some(value),
            "outer_iterations" => self.outer_iterations = Some(value),
            "removed" => self.removed = Some(value),
            "inserted" => self.inserted = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            "speed" => self.speed = Some(value),
            _ => self.record_i64(field, value as i64),
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        match field.name() {
            "delta" => self.delta = Some(value),
            "score" => self.total = Some(value),
            "best" => self.best = Some(value),
            "hard" => self.hard = Some(value),
            "medium" => self.medium = Some(value),
            "soft" => self.soft = Some(value),
            _ => {}
        }
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        match field.name() {
            "temperature" => self.temperature = Some(value),
            "time_limit_secs" => self.time_limit_secs = Some(value),
            "acceptance_rate" => self.acceptance_rate = Some(value),
            _ => {}
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        match field.name() {
            "accepted" => self.accepted = Some(value),
            "feasible" => self.feasible = Some(value),
            "success" => self.success = Some(value),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "score" => self.score = Some(value.to_string()),
            "strategy" => self.strategy = Some(value.to_string()),
            "reason" => self.reason = Some(value.to_string()),
            "kind" => self.kind = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    match v.event.as_deref().unwrap_or("") {
        "solve_start" => format_solve_start(v),
        "solve_end" => format_solve_end(v),
        "progress" => format_progress(v),
        "ruin_recreate" => format_ruin_recreate(v),
        "reheat" => format_reheat(v),
        "move" => format_move(v, level),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs()).bright_black().to_string()
}

fn format_solve_start(v: &EventVisitor) -> String {
    mark_solve_start();
    let count = |n: Option<u64>| n.unwrap_or(0).to_formatted_string(&Locale::en);

    let mut output = format!(
        "{} {} Solving │ {} meetings │ {} judges │ {} rooms │ {} days",
        format_elapsed(),
        "▶".bright_green().bold(),
        count(v.meetings).bright_yellow(),
        count(v.judges).bright_yellow(),
        count(v.rooms).bright_yellow(),
        count(v.work_days).bright_yellow(),
    );
    if let Some(limit) = v.time_limit_secs {
        output.push_str(&format!(" │ {}s limit", format!("{}", limit).bright_yellow()));
    }
    output
}

fn format_solve_end(v: &EventVisitor) -> String {
    let score = v.score.as_deref().unwrap_or("N/A");
    let is_feasible = v.feasible.unwrap_or(false);
    let status_text = if is_feasible {
        "FEASIBLE SCHEDULE FOUND"
    } else {
        "INFEASIBLE (hard rules violated)"
    };
    let status = if is_feasible {
        "FEASIBLE".bright_green().bold().to_string()
    } else {
        "INFEASIBLE".bright_red().bold().to_string()
    };

    let mut output = format!(
        "{} {} Solving complete │ {} │ {} │ {} outer iterations │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        v.outer_iterations
            .unwrap_or(0)
            .to_formatted_string(&Locale::en)
            .white(),
        format_rate(v.acceptance_rate),
        status
    );
    if let Some(reason) = &v.reason {
        output.push_str(&format!(" │ {}", reason.bright_black()));
    }

    let inner_width: usize = 58;
    let rule = "═".repeat(inner_width);
    output.push_str("\n\n");
    output.push_str(&format!("╔{}╗", rule).bright_cyan().to_string());
    output.push('\n');

    let total_pad = inner_width.saturating_sub(status_text.len());
    let left_pad = total_pad / 2;
    let right_pad = total_pad - left_pad;
    let status_colored = if is_feasible {
        status_text.bright_green().bold().to_string()
    } else {
        status_text.bright_red().bold().to_string()
    };
    output.push_str(&format!(
        "{}{}{}{}{}",
        "║".bright_cyan(),
        " ".repeat(left_pad),
        status_colored,
        " ".repeat(right_pad),
        "║".bright_cyan()
    ));
    output.push('\n');
    output.push_str(&format!("╠{}╣", rule).bright_cyan().to_string());
    output.push('\n');
    output.push_str(&format!(
        "{}  {:<14}{:>40}  {}",
        "║".bright_cyan(),
        "Final Score:",
        score,
        "║".bright_cyan()
    ));
    output.push('\n');
    output.push_str(&format!("╚{}╝", rule).bright_cyan().to_string());
    output.push('\n');

    output
}

fn format_progress(v: &EventVisitor) -> String {
    format!(
        "{} {} {:>8} │ T {:>9.3} │ {:>12}/s │ {} │ best {}",
        format_elapsed(),
        "⚡".bright_cyan(),
        v.outer.unwrap_or(0).to_formatted_string(&Locale::en).white(),
        v.temperature.unwrap_or(0.0),
        v.speed
            .unwrap_or(0)
            .to_formatted_string(&Locale::en)
            .bright_magenta()
            .bold(),
        format_rate(v.acceptance_rate),
        format_tiers(v.best, v.hard, v.medium, v.soft),
    )
}

fn format_ruin_recreate(v: &EventVisitor) -> String {
    let icon = if v.success.unwrap_or(false) {
        "↻".bright_green().to_string()
    } else {
        "↻".yellow().to_string()
    };
    format!(
        "{} {} Ruin {} │ {} removed │ {} reinserted │ {}",
        format_elapsed(),
        icon,
        v.strategy.as_deref().unwrap_or("?").white().bold(),
        v.removed.unwrap_or(0).to_formatted_string(&Locale::en).yellow(),
        v.inserted.unwrap_or(0).to_formatted_string(&Locale::en).yellow(),
        format_score(v.score.as_deref().unwrap_or("N/A")),
    )
}

fn format_reheat(v: &EventVisitor) -> String {
    format!(
        "{} {} Reheat to {:.3}",
        format_elapsed(),
        "♨".bright_red(),
        v.temperature.unwrap_or(0.0)
    )
}

fn format_move(v: &EventVisitor, level: Level) -> String {
    if level != Level::TRACE {
        return String::new();
    }
    let icon = if v.accepted.unwrap_or(false) {
        "✓".bright_green().to_string()
    } else {
        "✗".bright_red().to_string()
    };
    format!(
        "{} {} {:<11} │ delta {:>12}",
        format_elapsed(),
        icon,
        v.kind.as_deref().unwrap_or("?").bright_black(),
        v.delta.unwrap_or(0).to_formatted_string(&Locale::en).bright_black()
    )
}

fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{:.1}% accepted", rate * 100.0)
            .bright_yellow()
            .to_string(),
        None => "N/A".white().to_string(),
    }
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

/// Total plus per-tier counts, colored by severity.
fn format_tiers(total: Option<i64>, hard: Option<i64>, medium: Option<i64>, soft: Option<i64>) -> String {
    let Some(total) = total else {
        return "N/A".white().to_string();
    };
    let mut output = total.to_formatted_string(&Locale::en).white().bold().to_string();
    if let (Some(hard), Some(medium), Some(soft)) = (hard, medium, soft) {
        output.push_str(&format!(
            " ({}/{}/{})",
            color_tier(hard, "hard", true),
            color_tier(medium, "medium", false),
            color_tier(soft, "soft", false),
        ));
    }
    output
}

fn color_tier(count: i64, label: &str, hard: bool) -> String {
    let text = format!("{}{}", count, label);
    match (count, hard) {
        (0, _) => text.bright_green().to_string(),
        (_, true) => text.bright_red().to_string(),
        _ => text.yellow().to_string(),
    }
}

/// Colors a rendered score such as `1009 (0hard/1medium/9soft)`.
fn format_score(score: &str) -> String {
    let Some((total, tiers)) = score.split_once(" (") else {
        return score.white().to_string();
    };
    let tiers = tiers.trim_end_matches(')');
    let parts: Vec<&str> = tiers.split('/').collect();
    if parts.len() != 3 {
        return score.white().to_string();
    }

    let parse = |part: &str, label: &str| part.trim_end_matches(label).parse::<i64>().ok();
    match (
        parse(parts[0], "hard"),
        parse(parts[1], "medium"),
        parse(parts[2], "soft"),
    ) {
        (Some(hard), Some(medium), Some(soft)) => format!(
            "{} ({}/{}/{})",
            total.white().bold(),
            color_tier(hard, "hard", true),
            color_tier(medium, "medium", false),
            color_tier(soft, "soft", false),
        ),
        _ => score.white().to_string(),
    }
}
