//! Score explanation.

use std::fmt;

use docket_core::{ScoreBreakdown, Tier, TierWeights};

use crate::engine::FullScore;

/// One rule's share of a schedule's score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleAnalysis {
    pub name: &'static str,
    pub tier: Tier,
    /// Raw violation count.
    pub count: i64,
    /// `count` times the tier weight.
    pub weighted: i64,
}

/// Per-rule breakdown of a full score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreAnalysis {
    pub rules: Vec<RuleAnalysis>,
    pub score: FullScore,
}

impl ScoreAnalysis {
    pub(crate) fn new(rules: Vec<RuleAnalysis>, weights: &TierWeights) -> Self {
        let breakdown = rules
            .iter()
            .map(|r| ScoreBreakdown::of_tier(r.tier, r.count))
            .fold(ScoreBreakdown::ZERO, |acc, b| acc + b);
        Self {
            rules,
            score: FullScore {
                total: weights.total(&breakdown),
                breakdown,
            },
        }
    }

    /// Rules with a non-zero count, worst weighted contribution first.
    pub fn violated(&self) -> Vec<&RuleAnalysis> {
        let mut violated: Vec<_> = self.rules.iter().filter(|r| r.count != 0).collect();
        violated.sort_by(|a, b| b.weighted.cmp(&a.weighted).then(a.name.cmp(b.name)));
        violated
    }

    pub fn get(&self, name: &str) -> Option<&RuleAnalysis> {
        self.rules.iter().find(|r| r.name == name)
    }
}

impl fmt::Display for ScoreAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Score: {}", self.score)?;
        for rule in &self.rules {
            writeln!(
                f,
                "  {:<26} {:<6} {:>6} {:>14}",
                rule.name,
                rule.tier.to_string(),
                rule.count,
                rule.weighted
            )?;
        }
        Ok(())
    }
}
