//! Detail extractor
//!
//! Turns job identifiers into [`JobRecord`]s by fetching each detail page
//! through the bounded retry policy and parsing the result. Many jobs can be
//! processed at once through a bounded worker pool; results are slotted by
//! identifier so completion order never leaks into the output.

use crate::config::RetryConfig;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::parse_job_detail;
use crate::crawler::retry::{fetch_detail_page, DetailFetch, PolitenessDelay};
use crate::crawler::site::SiteUrls;
use crate::record::{JobId, JobRecord};
use futures::stream::{self, StreamExt};

/// Final classification of one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// Detail page fetched and parsed
    Record(JobRecord),

    /// The site answered 404; never retried
    Missing,

    /// All retries were used up; eligible for the requeue pass
    Failed,

    /// The request could not be issued or the page could not be parsed
    Degraded(String),
}

/// Fetches and parses job detail pages
#[derive(Debug, Clone)]
pub struct DetailExtractor {
    fetcher: Fetcher,
    delay: PolitenessDelay,
    retry: RetryConfig,
    urls: SiteUrls,
}

impl DetailExtractor {
    pub fn new(
        fetcher: Fetcher,
        delay: PolitenessDelay,
        retry: RetryConfig,
        urls: SiteUrls,
    ) -> Self {
        Self {
            fetcher,
            delay,
            retry,
            urls,
        }
    }

    /// Extracts one job
    pub async fn extract(&self, id: &JobId) -> ExtractOutcome {
        let url = self.urls.detail(id);

        let fetched =
            fetch_detail_page(&self.fetcher, &self.delay, &self.retry, &url, id.as_str()).await;

        match fetched {
            DetailFetch::Page(body) => {
                let today = chrono::Local::now().date_naive();
                match parse_job_detail(&String::from_utf8_lossy(&body), id, today) {
                    Ok(record) => ExtractOutcome::Record(record),
                    Err(e) => {
                        tracing::error!("Error occurred while parsing Job ID {}: {}", id, e);
                        ExtractOutcome::Degraded(e)
                    }
                }
            }
            DetailFetch::Missing => {
                tracing::error!("Job ID not found: {}", id);
                ExtractOutcome::Missing
            }
            DetailFetch::Exhausted => {
                tracing::error!("Failed to retrieve data for Job ID {}: retries exhausted", id);
                ExtractOutcome::Failed
            }
            DetailFetch::Fatal(reason) => {
                tracing::error!("Error occurred while fetching Job ID {}: {}", id, reason);
                ExtractOutcome::Degraded(reason)
            }
        }
    }

    /// Extracts every job in `ids` using up to `workers` concurrent fetches
    pub async fn run_pass(&self, ids: &[JobId], workers: usize) -> PassReport {
        let total = ids.len();
        let mut slots: Vec<Option<ExtractOutcome>> = (0..total).map(|_| None).collect();

        let mut results = stream::iter(ids.iter().enumerate())
            .map(|(idx, id)| async move { (idx, self.extract(id).await) })
            .buffer_unordered(workers.max(1));

        let mut processed = 0;
        while let Some((idx, outcome)) = results.next().await {
            slots[idx] = Some(outcome);
            processed += 1;
            tracing::info!("Processed {} of {} job IDs", processed, total);
        }

        let mut report = PassReport::default();
        for (id, outcome) in ids.iter().zip(slots) {
            if let Some(outcome) = outcome {
                report.absorb(id, outcome);
            }
        }
        report
    }
}

/// Outcomes of one pass over a set of identifiers, in identifier order
#[derive(Debug, Clone, Default)]
pub struct PassReport {
    pub records: Vec<JobRecord>,
    pub failed: Vec<JobId>,
    pub missing: Vec<JobId>,
    pub degraded: Vec<JobId>,
}

impl PassReport {
    /// Files one outcome under its category
    pub fn absorb(&mut self, id: &JobId, outcome: ExtractOutcome) {
        match outcome {
            ExtractOutcome::Record(record) => self.records.push(record),
            ExtractOutcome::Missing => self.missing.push(id.clone()),
            ExtractOutcome::Failed => self.failed.push(id.clone()),
            ExtractOutcome::Degraded(_) => self.degraded.push(id.clone()),
        }
    }
}
