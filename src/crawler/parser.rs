//! HTML parsers for the listing index and the job detail page
//!
//! Both page shapes are read with fixed selectors:
//! - Listing entries: `li.has-pointer-d`, identifier in `data-job-id`
//! - Job title: `h1.h3`
//! - Company and posting date: `ul.list.is-basic.t-small`
//! - Attribute pairs: `dt`/`dd` inside `dl.dlist.is-spaced.is-fitted.t-small`

use crate::crawler::dates::normalize_relative_date;
use crate::record::{JobId, JobRecord, COMPANY_NAME, DATE};
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};

/// Identifiers found on one listing page
#[derive(Debug, Clone, Default)]
pub struct ListingEntries {
    /// Number of listing entry elements on the page
    pub entries: usize,

    /// Identifiers of the entries that carried one, in page order
    pub ids: Vec<JobId>,
}

/// Extracts the job identifiers from a listing index page
///
/// # Example
///
/// ```
/// use job_harvest::crawler::parse_listing;
///
/// let html = r#"<ul><li class="has-pointer-d" data-job-id="101">A</li></ul>"#;
/// let listing = parse_listing(html).unwrap();
/// assert_eq!(listing.ids[0].as_str(), "101");
/// ```
pub fn parse_listing(html: &str) -> Result<ListingEntries, String> {
    let document = Html::parse_document(html);
    let entry_selector = selector("li.has-pointer-d")?;

    let mut listing = ListingEntries::default();
    for element in document.select(&entry_selector) {
        listing.entries += 1;
        match element.value().attr("data-job-id").map(str::trim) {
            Some(id) if !id.is_empty() => listing.ids.push(JobId::new(id)),
            _ => tracing::debug!("Listing entry without data-job-id skipped"),
        }
    }

    Ok(listing)
}

/// Maps a job detail page into a flat record
///
/// `Company Name` is set whenever the metadata list exists. `Date` is set to
/// the normalized posting date, to an empty value when the date element has
/// no text, and left out for listings older than a month.
pub fn parse_job_detail(html: &str, id: &JobId, today: NaiveDate) -> Result<JobRecord, String> {
    let document = Html::parse_document(html);

    let title_selector = selector("h1.h3")?;
    let meta_selector = selector("ul.list.is-basic.t-small")?;
    let company_selector = selector("a.is-black")?;
    let date_item_selector = selector("li.t-mute")?;
    let span_selector = selector("span")?;
    let dlist_selector = selector("dl.dlist.is-spaced.is-fitted.t-small")?;
    let term_selector = selector("dt")?;
    let definition_selector = selector("dd")?;

    let job_name = document
        .select(&title_selector)
        .next()
        .map(text_of)
        .unwrap_or_default();
    let mut record = JobRecord::new(id, job_name);

    if let Some(meta) = document.select(&meta_selector).next() {
        let company = meta
            .select(&company_selector)
            .next()
            .map(text_of)
            .unwrap_or_default();
        record.insert(COMPANY_NAME, company);

        if let Some(date_item) = meta.select(&date_item_selector).next() {
            match date_item.select(&span_selector).next() {
                Some(span) => {
                    if let Some(date) = normalize_relative_date(&text_of(span), today) {
                        record.insert(DATE, date);
                    }
                }
                None => record.insert(DATE, ""),
            }
        }
    }

    for dlist in document.select(&dlist_selector) {
        let terms = dlist.select(&term_selector);
        let definitions = dlist.select(&definition_selector);
        for (term, definition) in terms.zip(definitions) {
            record.insert(text_of(term), text_of(definition));
        }
    }

    Ok(record)
}

fn selector(css: &str) -> Result<Selector, String> {
    Selector::parse(css).map_err(|e| format!("Invalid selector '{}': {:?}", css, e))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
