//! Tiered rules engine for docket.
//!
//! Each rule is implemented twice: a full evaluator over the whole schedule
//! and a region evaluator over the cells, judge-days and meetings a move can
//! touch. [`RulesEngine`] aggregates them into a weighted [`FullScore`] and
//! computes move deltas by measuring a region before and after a transient
//! apply/revert.

pub mod analysis;
pub mod config;
pub mod engine;
pub mod error;
pub mod region;
pub mod rule;
pub mod rules;


pub use analysis::{RuleAnalysis, ScoreAnalysis};
pub use config::ScoringConfig;
pub use engine::{FullScore, RuleDelta, RulesEngine};
pub use error::{Result, ScoreError};
pub use region::Region;
pub use rule::{Rule, RuleContext};
