//! URL construction for the listing index and detail pages

use crate::config::SiteConfig;
use crate::record::JobId;
use url::Url;

/// Resolved URLs of the single source site
#[derive(Debug, Clone)]
pub struct SiteUrls {
    site: Url,
    listing: Url,
}

impl SiteUrls {
    pub fn new(config: &SiteConfig) -> Result<Self, url::ParseError> {
        let site = Url::parse(&config.site_url)?;
        let listing = site.join(&config.listing_path)?;
        Ok(Self { site, listing })
    }

    /// URL of listing page `page` (1-based)
    pub fn listing_page(&self, page: u32) -> String {
        let mut url = self.listing.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("page", &page.to_string());
        url.to_string()
    }

    /// Canonical detail URL: `<site>/en/job/<id>/`
    pub fn detail(&self, id: &JobId) -> String {
        let mut url = self.site.clone();
        url.set_query(None);
        url.set_path(&format!("/en/job/{}/", id));
        url.to_string()
    }
}
