//! Retry policies for the two page shapes
//!
//! The listing index and the detail pages are retried differently and the
//! two loops are deliberately kept apart:
//!
//! - Listing pages retry without limit. The walk only ends when the site
//!   signals the end (404 or a repeated page).
//! - Detail pages have a small retry budget. Running out of it yields
//!   [`DetailFetch::Exhausted`] instead of an error.

use crate::config::{DelayMode, RetryConfig};
use crate::crawler::fetcher::{Attempt, FetchOutcome, Fetcher};
use rand::Rng;
use std::time::Duration;

/// Jittered delay used between polite requests and after transient errors
#[derive(Debug, Clone)]
pub struct PolitenessDelay {
    min: Duration,
    max: Duration,
    fixed: Option<Duration>,
}

impl PolitenessDelay {
    /// Creates a delay drawn from `[delay-min-ms, delay-max-ms)`
    ///
    /// In `per-run` mode the value is drawn once here and reused.
    pub fn from_config(config: &RetryConfig) -> Self {
        let mut delay = Self {
            min: Duration::from_millis(config.delay_min_ms),
            max: Duration::from_millis(config.delay_max_ms),
            fixed: None,
        };
        if config.delay_mode == DelayMode::PerRun {
            delay.fixed = Some(delay.draw());
        }
        delay
    }

    /// Returns the duration of the next sleep
    pub fn next(&self) -> Duration {
        self.fixed.unwrap_or_else(|| self.draw())
    }

    fn draw(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        rand::thread_rng().gen_range(self.min..self.max)
    }

    pub async fn sleep(&self) {
        tokio::time::sleep(self.next()).await;
    }
}

/// Final state of one listing page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingFetch {
    /// New content for this page
    Page(Vec<u8>),
    /// The site has no further pages
    End,
    /// The request cannot be issued; pagination must stop
    Aborted(String),
}

/// Fetches one listing page, retrying transient failures forever
///
/// A body byte-identical to `previous` means the site is repeating its last
/// page and is reported as [`ListingFetch::End`].
pub async fn fetch_listing_page(
    fetcher: &Fetcher,
    delay: &PolitenessDelay,
    url: &str,
    page: u32,
    previous: Option<&[u8]>,
) -> ListingFetch {
    loop {
        match fetcher.fetch(url, Attempt::Listing { page }).await {
            FetchOutcome::Success(body) => {
                if previous == Some(body.as_slice()) {
                    tracing::info!(
                        "Page {} repeats page {}; reached the last page",
                        page,
                        page.saturating_sub(1)
                    );
                    return ListingFetch::End;
                }
                return ListingFetch::Page(body);
            }
            FetchOutcome::NotFound => {
                tracing::info!("Page {} not found; reached the last page", page);
                return ListingFetch::End;
            }
            FetchOutcome::RateLimited(wait) => {
                tokio::time::sleep(wait).await;
            }
            FetchOutcome::RetryableError(reason) => {
                tracing::debug!("Retrying page {} after: {}", page, reason);
                delay.sleep().await;
            }
            FetchOutcome::Fatal(reason) => {
                return ListingFetch::Aborted(reason);
            }
        }
    }
}

/// Final state of one detail page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailFetch {
    Page(Vec<u8>),
    /// HTTP 404; the job no longer exists
    Missing,
    /// Every retry was used up
    Exhausted,
    /// The request cannot be issued
    Fatal(String),
}

/// Fetches one detail page within the configured retry budget
///
/// `NotFound` and `Fatal` end immediately and never consume the budget.
/// Each rate limit or transient error consumes one retry; rate limits wait
/// for the server-declared time, other errors for the jittered delay.
pub async fn fetch_detail_page(
    fetcher: &Fetcher,
    delay: &PolitenessDelay,
    config: &RetryConfig,
    url: &str,
    job_id: &str,
) -> DetailFetch {
    let mut retries_left = config.detail_retries;
    let mut backoff_factor = config.backoff_factor;

    loop {
        let attempt = Attempt::Detail {
            job_id,
            retries_left,
        };

        let wait = match fetcher.fetch(url, attempt).await {
            FetchOutcome::Success(body) => return DetailFetch::Page(body),
            FetchOutcome::NotFound => return DetailFetch::Missing,
            FetchOutcome::Fatal(reason) => return DetailFetch::Fatal(reason),
            FetchOutcome::RateLimited(wait) => wait,
            FetchOutcome::RetryableError(_) => delay.next(),
        };

        if retries_left == 0 {
            return DetailFetch::Exhausted;
        }

        tracing::debug!(
            "Retrying job {} in {:?} (backoff factor {})",
            job_id,
            wait,
            backoff_factor
        );
        tokio::time::sleep(wait).await;
        retries_left -= 1;
        backoff_factor = backoff_factor.saturating_mul(2);
    }
}
