//! User interface module - result output and formatting.
//!
//! Separates concerns:
//! - `formatter` - Formatting of diagnostics and listings
//! - This module - The result line, the only thing a normal run writes to stdout

use std::io::{self, Write};

use crate::boundary::BoundaryWarning;
use crate::cli::Reporter;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_counters, display_error, display_status, format_counters,
};

/// Print the single result line of a run on stdout.
///
/// Flushes immediately so the line is out before the counters are saved.
pub fn print_build_number(output: &str) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", output)?;
    handle.flush()
}

/// Reports to the terminal: the result on stdout, warnings on stderr.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn output(&mut self, line: &str) -> io::Result<()> {
        print_build_number(line)
    }

    fn warning(&mut self, warning: &BoundaryWarning) {
        display_boundary_warning(warning);
    }
}
