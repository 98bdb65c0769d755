//! Listing paginator
//!
//! Walks listing pages 1, 2, 3, ... and collects every job identifier.
//! The walk stops when:
//! - a page answers 404,
//! - a page is byte-identical to the one before it,
//! - a page has no listing entries at all,
//! - a request cannot be issued.
//!
//! Transient failures and rate limits never stop the walk.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::parse_listing;
use crate::crawler::retry::{fetch_listing_page, ListingFetch, PolitenessDelay};
use crate::crawler::site::SiteUrls;
use crate::record::JobId;
use std::collections::BTreeSet;

/// Collects the identifiers of all listings on the site
///
/// Identifiers repeated across pages collapse into one. The returned order
/// carries no meaning.
pub async fn discover_all_ids(
    fetcher: &Fetcher,
    delay: &PolitenessDelay,
    urls: &SiteUrls,
) -> Vec<JobId> {
    let mut ids = BTreeSet::new();
    let mut previous: Option<Vec<u8>> = None;
    let mut page: u32 = 1;

    loop {
        let url = urls.listing_page(page);
        let body = match fetch_listing_page(fetcher, delay, &url, page, previous.as_deref()).await
        {
            ListingFetch::Page(body) => body,
            ListingFetch::End => break,
            ListingFetch::Aborted(reason) => {
                tracing::error!(
                    "Failed to fetch listing page {}: {}. Stopping pagination",
                    page,
                    reason
                );
                break;
            }
        };

        let listing = match parse_listing(&String::from_utf8_lossy(&body)) {
            Ok(listing) => listing,
            Err(e) => {
                tracing::error!("Failed to parse listing page {}: {}", page, e);
                break;
            }
        };

        if listing.entries == 0 {
            tracing::warn!("No job IDs found on page {}. Stopping pagination", page);
            break;
        }

        let before = ids.len();
        ids.extend(listing.ids);
        tracing::info!(
            "Page {}: {} entries, {} new IDs ({} total)",
            page,
            listing.entries,
            ids.len() - before,
            ids.len()
        );

        previous = Some(body);
        page += 1;
        delay.sleep().await;
    }

    tracing::info!("Discovered {} job IDs", ids.len());
    ids.into_iter().collect()
}
