//! Crawler module for job discovery and extraction
//!
//! This module contains the crawl-and-extract engine, including:
//! - HTTP fetching with response classification
//! - Listing (unbounded) and detail (bounded) retry policies
//! - Listing pagination and detail page extraction
//! - The one-shot requeue of failed jobs
//! - Overall crawl coordination

mod coordinator;
mod dates;
mod extractor;
mod fetcher;
mod paginator;
mod parser;
mod requeue;
mod retry;
mod site;

pub use coordinator::{run_crawl, Coordinator, CrawlResult};
pub use dates::{normalize_relative_date, DATE_FORMAT};
pub use extractor::{DetailExtractor, ExtractOutcome, PassReport};
pub use fetcher::{build_http_client, parse_retry_after, Attempt, FetchOutcome, Fetcher};
pub use paginator::discover_all_ids;
pub use parser::{parse_job_detail, parse_listing, ListingEntries};
pub use requeue::requeue_failed;
pub use retry::{
    fetch_detail_page, fetch_listing_page, DetailFetch, ListingFetch, PolitenessDelay,
};
pub use site::SiteUrls;
