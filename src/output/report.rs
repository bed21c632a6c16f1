//! Report types and plain-text rendering
//!
//! This module defines the report handed to the output sinks and the error
//! type shared by all of them.

use crate::model::{Mismatch, ReconcileOutcome};
use std::io::Write;
use thiserror::Error;

/// Label of the trailing row that carries the number of classified records
pub const TOTAL_LABEL: &str = "Total";

/// Column headers of the count table
pub const HEADERS: [&str; 2] = ["Status", "Count"];

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Final result of a run, ready for rendering
#[derive(Debug, Clone, Default)]
pub struct StatusReport {
    /// `(status, count)` pairs sorted by status name
    pub counts: Vec<(String, u64)>,

    /// Number of records that were fetched and classified
    pub total: u64,

    pub mismatches: Vec<Mismatch>,

    /// Number of records dropped because of fetch or classification failures
    pub skipped: usize,
}

impl StatusReport {
    pub fn from_outcome(outcome: &ReconcileOutcome) -> Self {
        Self {
            counts: outcome
                .counts
                .iter()
                .map(|(status, count)| (status.to_string(), count))
                .collect(),
            total: outcome.total(),
            mismatches: outcome.mismatches.clone(),
            skipped: outcome.skipped.len(),
        }
    }

    /// Count rows followed by the `Total` row
    pub fn rows(&self) -> Vec<(String, u64)> {
        let mut rows = self.counts.clone();
        rows.push((TOTAL_LABEL.to_string(), self.total));
        rows
    }
}

/// Writes the report as plain `status count` lines
pub fn write_plain<W: Write>(report: &StatusReport, mut out: W) -> OutputResult<()> {
    writeln!(out, "{} {}", HEADERS[0], HEADERS[1])?;
    for (status, count) in report.rows() {
        writeln!(out, "{} {}", status, count)?;
    }

    if !report.mismatches.is_empty() {
        writeln!(out)?;
        writeln!(out, "Mismatched statuses ({}):", report.mismatches.len())?;
        for mismatch in &report.mismatches {
            writeln!(out, "{}", mismatch)?;
        }
    }

    Ok(())
}
