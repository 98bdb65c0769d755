//! HTTP fetcher implementation
//!
//! This module performs single GET requests against the source site and
//! classifies every response into a [`FetchOutcome`]. Callers never look at
//! raw transport errors; retry decisions are made by the policies in
//! `retry.rs` based on the outcome alone.

use crate::config::{HttpConfig, RetryConfig};
use reqwest::{header::RETRY_AFTER, Client, StatusCode};
use std::time::Duration;

/// Result of a single fetch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// HTTP 200 with the raw response body
    Success(Vec<u8>),

    /// HTTP 429; wait this long before trying again
    RateLimited(Duration),

    /// Timeout, connection failure, 5xx or an unexpected status
    RetryableError(String),

    /// HTTP 404
    NotFound,

    /// The request could not be issued at all
    Fatal(String),
}

impl FetchOutcome {
    /// Returns true if the caller may try the same request again
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited(_) | Self::RetryableError(_))
    }
}

/// Describes which attempt a fetch belongs to, for log context
#[derive(Debug, Clone, Copy)]
pub enum Attempt<'a> {
    /// Listing index page number
    Listing { page: u32 },
    /// Detail page of one job with the retries still available
    Detail { job_id: &'a str, retries_left: u32 },
}

impl std::fmt::Display for Attempt<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Attempt::Listing { page } => write!(f, "page {}", page),
            Attempt::Detail {
                job_id,
                retries_left,
            } => write!(f, "job {} ({} retries left)", job_id, retries_left),
        }
    }
}

/// Builds an HTTP client carrying the fixed identity header and timeout
///
/// # Example
///
/// ```no_run
/// use job_harvest::config::HttpConfig;
/// use job_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Shared, immutable HTTP access to the source site
///
/// Cloning is cheap; all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    default_retry_after: Duration,
}

impl Fetcher {
    /// Creates a fetcher from the HTTP and retry settings
    pub fn new(http: &HttpConfig, retry: &RetryConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(http)?,
            default_retry_after: Duration::from_secs(retry.default_retry_after_secs),
        })
    }

    /// Performs one GET request and classifies the response
    ///
    /// # Classification
    ///
    /// | Condition | Outcome |
    /// |-----------|---------|
    /// | Timeout / connection failure | RetryableError |
    /// | HTTP 200 | Success(body) |
    /// | HTTP 429 | RateLimited(Retry-After or default) |
    /// | HTTP 404 | NotFound |
    /// | HTTP 5xx | RetryableError |
    /// | Any other status | RetryableError (logged as unexpected) |
    /// | Request could not be built | Fatal |
    pub async fn fetch(&self, url: &str, attempt: Attempt<'_>) -> FetchOutcome {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return classify_transport_error(&e, url, attempt),
        };

        let status = response.status();

        if status == StatusCode::OK {
            return match response.bytes().await {
                Ok(body) => FetchOutcome::Success(body.to_vec()),
                Err(e) => classify_transport_error(&e, url, attempt),
            };
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let wait = parse_retry_after(
                response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok()),
                self.default_retry_after,
            );
            tracing::error!(
                "Rate limited at {} ({}). Retrying after {} seconds",
                url,
                attempt,
                wait.as_secs()
            );
            return FetchOutcome::RateLimited(wait);
        }

        if status == StatusCode::NOT_FOUND {
            return FetchOutcome::NotFound;
        }

        if status.is_server_error() {
            tracing::error!("Server error {} from {} ({})", status.as_u16(), url, attempt);
        } else {
            tracing::error!(
                "Unexpected status {} from {} ({})",
                status.as_u16(),
                url,
                attempt
            );
        }
        FetchOutcome::RetryableError(format!("HTTP {}", status.as_u16()))
    }
}

fn classify_transport_error(
    error: &reqwest::Error,
    url: &str,
    attempt: Attempt<'_>,
) -> FetchOutcome {
    if error.is_builder() {
        tracing::error!("Cannot build request for {} ({}): {}", url, attempt, error);
        return FetchOutcome::Fatal(error.to_string());
    }

    let reason = if error.is_timeout() {
        "Request timed out".to_string()
    } else if error.is_connect() {
        "Connection error".to_string()
    } else {
        format!("Transport error: {}", error)
    };

    tracing::error!("{} while fetching {} ({}). Retrying", reason, url, attempt);
    FetchOutcome::RetryableError(reason)
}

/// Reads a `Retry-After` header value as whole seconds
///
/// Missing or unparseable values fall back to `default`.
pub fn parse_retry_after(value: Option<&str>, default: Duration) -> Duration {
    value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}
