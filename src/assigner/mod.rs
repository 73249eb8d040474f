//! Decision engine turning a run's context and stored counters into a build number

pub mod build_number;

pub use build_number::{assign, classify, Assignment, Decision, KeySource, ShortCircuitReason};
