use crate::crawler::{FetchError, FieldNotFound};
use crate::model::StatusCount;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// A proposal entry found on the index page, prior to visiting its detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRecord {
    /// Category key derived from the status-letter cell, used as-is for lookups
    pub category_key: String,

    /// Absolute URL of the proposal's detail page
    pub detail_url: String,

    /// Proposal number from the numeric cell
    pub sequence_number: u64,
}

/// Status declared on a successfully classified detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailResult {
    pub detail_url: String,
    pub declared_status: String,
}

/// Why a record was dropped from a run
///
/// Both variants are per-record: the run continues without the record.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("{0}")]
    Classify(#[from] FieldNotFound),
}

/// A record that contributed to neither counts nor mismatches
#[derive(Debug)]
pub struct SkippedRecord {
    pub record: IndexRecord,
    pub reason: SkipReason,
}

/// A record whose declared status is not accepted for its category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub detail_url: String,
    pub category_key: String,
    pub declared_status: String,
    pub expected_statuses: BTreeSet<String>,
}

impl Mismatch {
    /// Expected statuses joined for display, e.g. `Accepted, Active`
    pub fn expected_list(&self) -> String {
        self.expected_statuses
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\nStatus on page: {}\nExpected statuses: {}",
            self.detail_url,
            self.declared_status,
            self.expected_list()
        )
    }
}

/// Everything one reconciliation run produces
#[derive(Debug, Default)]
pub struct ReconcileOutcome {
    pub counts: StatusCount,
    pub mismatches: Vec<Mismatch>,
    pub skipped: Vec<SkippedRecord>,
}

impl ReconcileOutcome {
    /// Number of records that were fetched and classified
    pub fn total(&self) -> u64 {
        self.counts.total()
    }
}
