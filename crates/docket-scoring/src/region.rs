//! The part of a schedule a move can affect.

use std::collections::BTreeSet;

use docket_core::{CaseId, JudgeId, MeetingId, Move, Problem, Span, Touch};

use crate::config::ScoringConfig;

/// Every unit whose rule count can change when a move is applied.
///
/// Built from a move's footprint: the cells, judge-days, judges and weeks
/// covered by each touched meeting before and after the move, plus the
/// touched meetings and their cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    pub slots: BTreeSet<(u32, u32)>,
    pub judge_days: BTreeSet<(JudgeId, u32)>,
    pub judges: BTreeSet<JudgeId>,
    pub judge_weeks: BTreeSet<(JudgeId, u32)>,
    pub meetings: BTreeSet<MeetingId>,
    pub cases: BTreeSet<CaseId>,
}

impl Region {
    /// Region of a move that has not been applied yet.
    pub fn of_move(problem: &Problem, mv: &Move, config: &ScoringConfig) -> Self {
        Self::from_touches(&mv.footprint(), problem, config)
    }

    pub fn from_touches(touches: &[Touch], problem: &Problem, config: &ScoringConfig) -> Self {
        let mut region = Region::default();
        for touch in touches {
            region.meetings.insert(touch.meeting);
            if let Ok(case) = problem.case_of(touch.meeting) {
                region.cases.insert(case);
            }
            for span in touch.before.iter().chain(touch.after.iter()) {
                region.add_span(span, config);
            }
        }
        region
    }

    fn add_span(&mut self, span: &Span, config: &ScoringConfig) {
        for slot in span.slots() {
            self.slots.insert((span.day, slot));
        }
        self.judge_days.insert((span.judge, span.day));
        self.judges.insert(span.judge);
        self.judge_weeks
            .insert((span.judge, config.week_of(span.day)));
    }

    pub fn is_empty(&self) -> bool {
        self.meetings.is_empty()
    }
}
