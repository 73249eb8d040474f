pub mod assigner;
pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod environment;
pub mod error;
pub mod git;
pub mod store;
pub mod ui;

pub use error::{BuildNumberError, Result};
