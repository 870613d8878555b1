use std::sync::{Arc, Mutex};

use tracing::{debug, info, trace};
use tracing_subscriber::layer::SubscriberExt;

use super::*;

/// Renders events with the console formatter into a buffer.
struct Capture(Arc<Mutex<Vec<String>>>);

impl<S: Subscriber> Layer<S> for Capture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        let line = strip_ansi(&format_event(&visitor, *event.metadata().level()));
        self.0.lock().unwrap().push(line);
    }
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn capture(f: impl FnOnce()) -> Vec<String> {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(Capture(lines.clone()));
    tracing::subscriber::with_default(subscriber, f);
    let lines = lines.lock().unwrap().clone();
    lines
}

#[test]
fn test_solve_start_line() {
    let lines = capture(|| {
        info!(
            event = "solve_start",
            meetings = 1234usize,
            judges = 12usize,
            rooms = 8usize,
            work_days = 5u32,
            time_limit_secs = Some(30.0),
            seed = 7u64,
        );
    });
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("Solving │ 1,234 meetings │ 12 judges │ 8 rooms │ 5 days"));
    assert!(lines[0].contains("30s limit"));
}

#[test]
fn test_solve_end_box() {
    let lines = capture(|| {
        info!(
            event = "solve_end",
            duration_ms = 1500u64,
            score = %"1009 (0hard/1medium/9soft)",
            feasible = true,
            outer_iterations = 42u64,
            acceptance_rate = 0.25,
            reason = %"iteration limit",
        );
    });
    let text = &lines[0];
    assert!(text.contains("Solving complete │ 1.50s │ 42 outer iterations │ 25.0% accepted"));
    assert!(text.contains("FEASIBLE SCHEDULE FOUND"));
    assert!(text.contains("1009 (0hard/1medium/9soft)"));
    assert!(text.contains("iteration limit"));
}

#[test]
fn test_progress_and_ruin_lines() {
    let lines = capture(|| {
        debug!(
            event = "progress",
            outer = 10u64,
            temperature = 123.4567,
            score = 40i64,
            best = 30i64,
            hard = 0i64,
            medium = 3i64,
            soft = 0i64,
            acceptance_rate = 0.5,
            speed = 25000u64,
        );
        info!(
            event = "ruin_recreate",
            strategy = %"by_judge(2)",
            removed = 4usize,
            inserted = 4usize,
            success = true,
            score = %"30 (0hard/3medium/0soft)",
        );
        debug!(event = "reheat", temperature = 500.0);
    });
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("T   123.457"));
    assert!(lines[0].contains("25,000/s"));
    assert!(lines[0].contains("best 30 (0hard/3medium/0soft)"));
    assert!(lines[1].contains("Ruin by_judge(2) │ 4 removed │ 4 reinserted"));
    assert!(lines[2].contains("Reheat to 500.000"));
}

#[test]
fn test_moves_only_render_at_trace() {
    let lines = capture(|| {
        trace!(event = "move", kind = "compound", delta = -1200i64, accepted = true);
        debug!(event = "move", kind = "single", delta = 5i64, accepted = false);
        info!(event = "unknown");
    });
    assert!(lines[0].contains("compound"));
    assert!(lines[0].contains("-1,200"));
    assert!(lines[1].is_empty());
    assert!(lines[2].is_empty());
}

#[test]
fn test_solver_targets() {
    assert!(is_solver_target("docket_solver::annealing"));
    assert!(is_solver_target("docket::solve"));
    assert!(!is_solver_target("docket_scoring::engine"));
    assert!(!is_solver_target("hyper"));
}

#[test]
fn test_format_score_keeps_plain_text() {
    assert_eq!(
        strip_ansi(&format_score("1000009 (1hard/0medium/9soft)")),
        "1000009 (1hard/0medium/9soft)"
    );
    assert_eq!(strip_ansi(&format_score("N/A")), "N/A");
    assert_eq!(strip_ansi(&format_score("12 (broken)")), "12 (broken)");
}

#[test]
fn test_format_duration() {
    assert_eq!(format_duration_ms(250), "250ms");
    assert_eq!(format_duration_ms(2500), "2.50s");
    assert_eq!(format_duration_ms(125_000), "2m 5s");
}
