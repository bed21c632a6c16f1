//! Markdown table rendering
//!
//! This module renders a status report as a markdown table, followed by the
//! mismatch list when there is one.

use crate::output::report::{OutputResult, StatusReport, HEADERS};
use std::io::Write;

/// Writes the formatted markdown to `out`
pub fn write_markdown<W: Write>(report: &StatusReport, mut out: W) -> OutputResult<()> {
    out.write_all(format_markdown(report).as_bytes())?;
    Ok(())
}

/// Formats a status report as markdown
pub fn format_markdown(report: &StatusReport) -> String {
    let rows = report.rows();

    let status_width = rows
        .iter()
        .map(|(status, _)| status.chars().count())
        .chain(std::iter::once(HEADERS[0].len()))
        .max()
        .unwrap_or(0);
    let count_width = rows
        .iter()
        .map(|(_, count)| count.to_string().len())
        .chain(std::iter::once(HEADERS[1].len()))
        .max()
        .unwrap_or(0);

    let mut md = String::new();

    md.push_str(&format!(
        "| {:<sw$} | {:>cw$} |\n",
        HEADERS[0],
        HEADERS[1],
        sw = status_width,
        cw = count_width
    ));
    md.push_str(&format!(
        "|{}|{}:|\n",
        "-".repeat(status_width + 2),
        "-".repeat(count_width + 1)
    ));

    for (status, count) in &rows {
        md.push_str(&format!(
            "| {:<sw$} | {:>cw$} |\n",
            status,
            count,
            sw = status_width,
            cw = count_width
        ));
    }

    if report.skipped > 0 {
        md.push_str(&format!("\n{} records skipped\n", report.skipped));
    }

    if !report.mismatches.is_empty() {
        md.push_str("\n## Mismatched Statuses\n\n");
        md.push_str("| Page | Status on page | Expected |\n");
        md.push_str("|------|----------------|----------|\n");

        for mismatch in &report.mismatches {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                mismatch.detail_url,
                mismatch.declared_status,
                mismatch.expected_list()
            ));
        }
    }

    md
}
