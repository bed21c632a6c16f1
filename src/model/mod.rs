//! Data model for one reconciliation run
//!
//! This module provides the values that flow through the pipeline:
//!
//! - `IndexRecord`: one proposal entry discovered on the index page
//! - `DetailResult`: the status declared on a proposal's detail page
//! - `SkipReason`: why a record contributed nothing to the run
//! - `StatusCount`: occurrences of each declared status
//! - `Mismatch`: a record whose status is outside its category's expected set
//!
//! All of these live for a single run; nothing here is persisted.

mod counts;
mod records;

pub use counts::StatusCount;
pub use records::{DetailResult, IndexRecord, Mismatch, ReconcileOutcome, SkipReason, SkippedRecord};
