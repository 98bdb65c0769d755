//! Failure requeue
//!
//! Jobs whose detail fetch used up every retry in the main pass get exactly
//! one more extraction attempt. Whatever still fails afterwards is reported
//! and left alone.

use crate::crawler::extractor::{DetailExtractor, PassReport};
use crate::record::JobId;

/// Runs the single requeue pass over `failed`
pub async fn requeue_failed(
    extractor: &DetailExtractor,
    failed: &[JobId],
    workers: usize,
) -> PassReport {
    if failed.is_empty() {
        return PassReport::default();
    }

    tracing::info!("Requeueing {} failed job IDs", failed.len());
    let report = extractor.run_pass(failed, workers).await;

    if !report.failed.is_empty() {
        tracing::error!(
            "{} job IDs failed again after requeue: {}",
            report.failed.len(),
            report
                .failed
                .iter()
                .map(JobId::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    report
}
