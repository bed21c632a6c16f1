//! Crawler module for the status-reconciliation pipeline
//!
//! This module contains the core logic, including:
//! - HTTP fetching with retry logic
//! - Index page extraction
//! - Detail page status classification
//! - Per-record reconciliation against the expected-status table

mod detail;
mod fetcher;
mod index;
mod reconciler;

pub use detail::{fields, DetailClassifier, Field, FieldNotFound};
pub use fetcher::{build_http_client, FetchError, HttpFetcher, PageFetcher};
pub use index::IndexExtractor;
pub use reconciler::Reconciler;

use crate::config::Config;
use crate::model::{IndexRecord, ReconcileOutcome};
use crate::AuditError;
use std::time::Duration;

/// Fetches the index page and extracts its records
///
/// A failed index fetch or a page without the index container ends the run:
/// there is nothing to reconcile.
pub async fn load_index<F: PageFetcher>(
    config: &Config,
    fetcher: &F,
) -> Result<Vec<IndexRecord>, AuditError> {
    let extractor = IndexExtractor::from_config(&config.site)?;
    let index_url = extractor.base_url().as_str();

    tracing::info!("Fetching index page {}", index_url);
    let page = fetcher
        .fetch(index_url)
        .await
        .map_err(|source| AuditError::IndexFetch {
            url: index_url.to_string(),
            source,
        })?;

    let records = extractor.extract(&page)?;
    tracing::info!("Found {} proposals on the index page", records.len());

    Ok(records)
}

/// Runs a complete audit
///
/// This is the main entry point. It will:
/// 1. Fetch and parse the index page
/// 2. Fetch every proposal's detail page and read its status
/// 3. Count statuses and collect mismatches
///
/// # Arguments
///
/// * `config` - The audit configuration
/// * `fetcher` - Source of index and detail pages
///
/// # Returns
///
/// * `Ok(ReconcileOutcome)` - Audit completed, possibly with skipped records
/// * `Err(AuditError)` - The index was unusable or a category key is unknown
pub async fn audit<F: PageFetcher>(
    config: &Config,
    fetcher: &F,
) -> Result<ReconcileOutcome, AuditError> {
    let records = load_index(config, fetcher).await?;
    let classifier = DetailClassifier::from_config(&config.detail)?;

    Reconciler::new(fetcher, &classifier, &config.expected_status)
        .with_request_delay(Duration::from_millis(config.fetcher.request_delay_ms))
        .reconcile(&records)
        .await
}
