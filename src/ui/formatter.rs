//! Formatting functions for diagnostics and listings.
//!
//! Diagnostics go to stderr: CI pipelines capture stdout as the build number.

use crate::boundary::BoundaryWarning;
use crate::domain::BuildCounters;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("\x1b[33m→\x1b[0m {}", message);
}

/// Display a boundary warning to the user.
///
/// Shows a yellow warning icon followed by the warning message.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("\x1b[33m⚠ WARNING:\x1b[0m {}", warning);
}

/// Render stored counters as one `key: counter (next: <build number>)` line each.
pub fn format_counters(counters: &BuildCounters) -> Vec<String> {
    counters
        .iter()
        .map(|(key, counter)| match counter.checked_add(1) {
            Some(next) => format!("{}: {} (next: {}{})", key, counter, key, next),
            None => format!("{}: {}", key, counter),
        })
        .collect()
}

/// Display stored counters for `--list`.
pub fn display_counters(store: &str, counters: &BuildCounters) {
    println!("\x1b[1mBuild numbers in {}:\x1b[0m", store);
    if counters.is_empty() {
        println!("  (none)");
        return;
    }
    for line in format_counters(counters) {
        println!("  {}", line);
    }
}
