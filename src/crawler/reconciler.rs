//! Reconciler - per-record fetch, classification and cross-check
//!
//! Records are visited one at a time in index order. Each record carries its
//! own category key through the visit, so a record that fails to fetch or
//! classify drops out without shifting any other record's pairing.

use crate::config::ExpectedStatusTable;
use crate::crawler::{DetailClassifier, PageFetcher};
use crate::model::{
    DetailResult, IndexRecord, Mismatch, ReconcileOutcome, SkipReason, SkippedRecord,
};
use crate::AuditError;
use std::collections::BTreeSet;
use std::time::Duration;

const PROGRESS_EVERY: usize = 25;

/// Drives detail fetches for a list of index records and aggregates the result
pub struct Reconciler<'a, F> {
    fetcher: &'a F,
    classifier: &'a DetailClassifier,
    expected: &'a ExpectedStatusTable,
    request_delay: Duration,
}

impl<'a, F: PageFetcher> Reconciler<'a, F> {
    pub fn new(
        fetcher: &'a F,
        classifier: &'a DetailClassifier,
        expected: &'a ExpectedStatusTable,
    ) -> Self {
        Self {
            fetcher,
            classifier,
            expected,
            request_delay: Duration::ZERO,
        }
    }

    /// Pause between two consecutive detail fetches
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Reconciles every record
    ///
    /// 1. Checks that every category key is in the expected-status table
    /// 2. Fetches and classifies each record in order; failures are skipped
    /// 3. Counts each declared status
    /// 4. Cross-checks each classified record against its own category
    ///
    /// # Returns
    ///
    /// * `Ok(ReconcileOutcome)` - Counts, mismatches and skipped records
    /// * `Err(AuditError::UnknownCategoryKey)` - A record's key has no table entry
    pub async fn reconcile(&self, records: &[IndexRecord]) -> Result<ReconcileOutcome, AuditError> {
        for record in records {
            self.expected_for(record)?;
        }

        let mut outcome = ReconcileOutcome::default();
        let mut classified: Vec<(&IndexRecord, DetailResult)> = Vec::with_capacity(records.len());

        for (position, record) in records.iter().enumerate() {
            if position > 0 && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }

            match self.visit(record).await {
                Ok(result) => {
                    outcome.counts.record(&result.declared_status);
                    classified.push((record, result));
                }
                Err(reason) => {
                    tracing::info!("Skipping {}: {}", record.detail_url, reason);
                    outcome.skipped.push(SkippedRecord {
                        record: record.clone(),
                        reason,
                    });
                }
            }

            if (position + 1) % PROGRESS_EVERY == 0 {
                tracing::info!("Progress: {}/{} records", position + 1, records.len());
            }
        }

        for (record, result) in &classified {
            if let Some(mismatch) = self.cross_check(record, result)? {
                tracing::info!(
                    url = %mismatch.detail_url,
                    declared = %mismatch.declared_status,
                    expected = %mismatch.expected_list(),
                    "Mismatched status:\n{}",
                    mismatch
                );
                outcome.mismatches.push(mismatch);
            }
        }

        tracing::info!(
            "Reconciled {} of {} records ({} skipped, {} mismatched)",
            outcome.total(),
            records.len(),
            outcome.skipped.len(),
            outcome.mismatches.len()
        );

        Ok(outcome)
    }

    /// Fetches and classifies one record
    async fn visit(&self, record: &IndexRecord) -> Result<DetailResult, SkipReason> {
        let page = self.fetcher.fetch(&record.detail_url).await?;
        let declared_status = self.classifier.classify(&page)?;

        tracing::debug!(
            "Proposal {} declares '{}'",
            record.sequence_number,
            declared_status
        );

        Ok(DetailResult {
            detail_url: record.detail_url.clone(),
            declared_status,
        })
    }

    /// Compares a classified record with its category's expected statuses
    fn cross_check(
        &self,
        record: &IndexRecord,
        result: &DetailResult,
    ) -> Result<Option<Mismatch>, AuditError> {
        let expected = self.expected_for(record)?;

        if self
            .expected
            .allows(&record.category_key, &result.declared_status)
        {
            return Ok(None);
        }

        Ok(Some(Mismatch {
            detail_url: result.detail_url.clone(),
            category_key: record.category_key.clone(),
            declared_status: result.declared_status.clone(),
            expected_statuses: expected.clone(),
        }))
    }

    fn expected_for(&self, record: &IndexRecord) -> Result<&'a BTreeSet<String>, AuditError> {
        self.expected
            .get(&record.category_key)
            .ok_or_else(|| AuditError::UnknownCategoryKey {
                key: record.category_key.clone(),
                url: record.detail_url.clone(),
            })
    }
}
