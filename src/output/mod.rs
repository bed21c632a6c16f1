//! Output module for rendering audit results
//!
//! This module handles:
//! - Building the status report (counts plus a trailing `Total` row)
//! - Printing it as plain lines or a markdown table
//! - Exporting it as a CSV file

mod csv;
mod markdown;
mod report;

pub use self::csv::{results_path, write_csv, write_results_file, DATETIME_FORMAT};
pub use markdown::{format_markdown, write_markdown};
pub use report::{write_plain, OutputError, OutputResult, StatusReport, HEADERS, TOTAL_LABEL};

use std::path::{Path, PathBuf};

/// How a finished report is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// `status count` lines on stdout
    #[default]
    Plain,

    /// Markdown table on stdout
    Pretty,

    /// CSV file in the results directory
    File,
}

/// Emits a report in the requested mode
///
/// # Returns
///
/// * `Ok(Some(PathBuf))` - File mode: the file that was written
/// * `Ok(None)` - The report went to stdout
/// * `Err(OutputError)` - Writing failed
pub fn emit_report(
    report: &StatusReport,
    mode: OutputMode,
    results_dir: &Path,
) -> OutputResult<Option<PathBuf>> {
    let stdout = std::io::stdout();

    match mode {
        OutputMode::Plain => {
            write_plain(report, stdout.lock())?;
            Ok(None)
        }
        OutputMode::Pretty => {
            write_markdown(report, stdout.lock())?;
            Ok(None)
        }
        OutputMode::File => {
            let path = write_results_file(report, results_dir, "status")?;
            tracing::info!("Results saved to {}", path.display());
            Ok(Some(path))
        }
    }
}
