//! Output helpers for the collector CLI.
//!
//! Standard output carries only the run's result identifier; progress and
//! diagnostics go to standard error.

use camino::Utf8Path;
use std::io::Write;

/// Format the summary printed after the chain has been written.
///
/// # Example
///
/// ```
/// use camino::Utf8Path;
/// use csv_collector::output::summary_message;
///
/// assert_eq!(summary_message(1, Utf8Path::new("target")), "Wrote 1 CSV to target");
/// assert_eq!(summary_message(3, Utf8Path::new("out")), "Wrote 3 CSVs to out");
/// ```
#[must_use]
pub fn summary_message(count: usize, outdir: &Utf8Path) -> String {
    let plural = if count == 1 { "CSV" } else { "CSVs" };
    format!("Wrote {count} {plural} to {outdir}")
}

/// Write one line of progress to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort; a closed stderr must not fail the run.
    }
}
