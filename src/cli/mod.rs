//! Entry point workflow shared by the binary and integration tests

pub mod orchestration;

pub use orchestration::{execute, run, stored_counters, Reporter, RunArgs, RunOutcome};
