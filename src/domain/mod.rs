//! Domain logic - build number rules independent of environment and storage

pub mod branch;
pub mod context;
pub mod counters;

pub use branch::{parse_branch, BranchKey};
pub use context::DecisionContext;
pub use counters::BuildCounters;
