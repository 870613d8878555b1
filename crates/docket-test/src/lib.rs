//! Shared test fixtures for docket crates.
//!
//! This crate provides data builders and seeded generators for testing.
//! It depends only on `docket-core` so every other crate can use it.
//!
//! - [`builder`] - fluent [`ProblemBuilder`] for hand-made arenas
//! - [`canned`] - small fixed schedules used by scenario tests
//! - [`random`] - seeded random problems, schedules and moves
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! docket-test = { workspace = true }
//! ```

pub mod builder;
pub mod canned;
pub mod random;

pub use builder::ProblemBuilder;
pub use canned::{single_judge_day, two_judge_week};
pub use random::{random_move, random_schedule, RandomShape};
