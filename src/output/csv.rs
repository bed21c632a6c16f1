//! CSV export of status counts
//!
//! Result files are named after the run mode and the local time of the run,
//! e.g. `results/status_2024-05-01_12-30-00.csv`.

use crate::output::report::{OutputResult, StatusReport, HEADERS};
use chrono::{DateTime, Local};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Timestamp layout used in result file names
pub const DATETIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Writes a single CSV row
fn write_row<W: Write>(out: &mut W, row: &[&str]) -> std::io::Result<()> {
    let cells: Vec<String> = row
        .iter()
        .map(|cell| {
            if needs_quotes(cell) {
                format!("\"{}\"", cell.replace('"', "\"\""))
            } else {
                cell.to_string()
            }
        })
        .collect();
    writeln!(out, "{}", cells.join(","))
}

/// Writes the header row and every count row, `Total` last
pub fn write_csv<W: Write>(report: &StatusReport, mut out: W) -> OutputResult<()> {
    write_row(&mut out, &HEADERS)?;
    for (status, count) in report.rows() {
        write_row(&mut out, &[status.as_str(), count.to_string().as_str()])?;
    }
    Ok(())
}

/// Path of the result file for `mode` created at `at`
pub fn results_path(results_dir: &Path, mode: &str, at: DateTime<Local>) -> PathBuf {
    results_dir.join(format!("{}_{}.csv", mode, at.format(DATETIME_FORMAT)))
}

/// Writes the report into a new file under `results_dir`
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written file
/// * `Err(OutputError)` - Failed to create the directory or write the file
pub fn write_results_file(
    report: &StatusReport,
    results_dir: &Path,
    mode: &str,
) -> OutputResult<PathBuf> {
    std::fs::create_dir_all(results_dir)?;

    let path = results_path(results_dir, mode, Local::now());
    let mut buffer = Vec::new();
    write_csv(report, &mut buffer)?;
    std::fs::write(&path, buffer)?;

    Ok(path)
}
