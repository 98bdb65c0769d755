//! Crawler coordinator - main crawl orchestration logic
//!
//! Drives the three stages of a harvest in order:
//! 1. Discover all job identifiers through the listing paginator
//! 2. Extract every job in a main pass
//! 3. Give jobs that exhausted their retries one requeue pass

use crate::config::Config;
use crate::crawler::extractor::DetailExtractor;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::paginator::discover_all_ids;
use crate::crawler::requeue::requeue_failed;
use crate::crawler::retry::PolitenessDelay;
use crate::crawler::site::SiteUrls;
use crate::record::{JobId, JobRecord};
use crate::HarvestError;
use std::time::Instant;

/// Everything a harvest produced
#[derive(Debug, Clone, Default)]
pub struct CrawlResult {
    /// Number of distinct identifiers found on the listing index
    pub discovered: usize,

    /// Main pass successes followed by requeue successes
    pub records: Vec<JobRecord>,

    /// Jobs that failed both the main pass and the requeue pass
    pub failed: Vec<JobId>,

    /// Jobs the site reported as gone (404)
    pub missing: Vec<JobId>,

    /// Jobs dropped because of an unexpected error
    pub degraded: Vec<JobId>,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    fetcher: Fetcher,
    delay: PolitenessDelay,
    urls: SiteUrls,
    extractor: DetailExtractor,
    workers: usize,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - The HTTP client or site URLs could not be built
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        let fetcher = Fetcher::new(&config.http, &config.retry)?;
        let delay = PolitenessDelay::from_config(&config.retry);
        let urls = SiteUrls::new(&config.site)?;
        let extractor = DetailExtractor::new(
            fetcher.clone(),
            delay.clone(),
            config.retry.clone(),
            urls.clone(),
        );

        Ok(Self {
            fetcher,
            delay,
            urls,
            extractor,
            workers: config.crawler.detail_workers,
        })
    }

    /// Walks the listing index and returns every job identifier
    pub async fn discover_ids(&self) -> Vec<JobId> {
        discover_all_ids(&self.fetcher, &self.delay, &self.urls).await
    }

    pub fn extractor(&self) -> &DetailExtractor {
        &self.extractor
    }

    /// Runs discovery, the main pass and the requeue pass
    pub async fn run(&self) -> CrawlResult {
        let start_time = Instant::now();

        let ids = self.discover_ids().await;
        if ids.is_empty() {
            tracing::warn!("No job IDs discovered; nothing to extract");
            return CrawlResult::default();
        }

        tracing::info!(
            "Extracting {} jobs with {} worker(s)",
            ids.len(),
            self.workers
        );
        let main = self.extractor.run_pass(&ids, self.workers).await;
        let requeue = requeue_failed(&self.extractor, &main.failed, self.workers).await;

        let mut result = CrawlResult {
            discovered: ids.len(),
            records: main.records,
            failed: requeue.failed,
            missing: main.missing,
            degraded: main.degraded,
        };
        result.records.extend(requeue.records);
        result.missing.extend(requeue.missing);
        result.degraded.extend(requeue.degraded);

        tracing::info!(
            "Crawl completed in {:?}: {} records, {} missing, {} failed, {} degraded",
            start_time.elapsed(),
            result.records.len(),
            result.missing.len(),
            result.failed.len(),
            result.degraded.len()
        );

        result
    }
}

/// Runs a complete crawl with the given configuration
///
/// # Example
///
/// ```no_run
/// use job_harvest::config::Config;
/// use job_harvest::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let result = run_crawl(&Config::default()).await?;
/// println!("{} records", result.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlResult, HarvestError> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run().await)
}
