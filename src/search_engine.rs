use scraper::{Html, Selector};
use url::Url;
use log::{info, warn, error};
use crate::error::ScrapeError;
use crate::fetcher::PageFetcher;

/// First product tile on the retailer's search results page.
const RESULT_LINK_SELECTOR: &str = "a.f-inherit.fw-inherit.link.theme-primary.db.center.mw5[href]";

/// Turns a model number into the URL of its product detail page.
pub struct SearchResolver<'a, F: PageFetcher> {
    fetcher: &'a F,
    base_url: Url,
}

impl<'a, F: PageFetcher> SearchResolver<'a, F> {
    pub fn new(fetcher: &'a F, base_url: &str) -> Result<Self, ScrapeError> {
        Ok(SearchResolver {
            fetcher,
            base_url: Url::parse(base_url)?,
        })
    }

    pub fn search_url(&self, model: &str) -> String {
        let encoded = urlencoding::encode(model.trim());
        format!("{}/search?term={}", self.base_url.as_str().trim_end_matches('/'), encoded)
    }

    /// Returns the detail page URL, or `None` after logging why not.
    pub fn resolve(&self, model: &str) -> Option<String> {
        let search_url = self.search_url(model);
        info!("Searching for model '{}': {}", model, search_url);

        let html = match self.fetcher.fetch(&search_url) {
            Ok(html) => html,
            Err(e) => {
                error!("Search failed for model {}: {}", model, e);
                return None;
            }
        };

        match self.first_result(&html) {
            Ok(Some(url)) => {
                info!("Found detail page for model {}: {}", model, url);
                Some(url)
            }
            Ok(None) => {
                warn!("No product link found for model {}.", model);
                None
            }
            Err(e) => {
                error!("Could not read search results for model {}: {}", model, e);
                None
            }
        }
    }

    fn first_result(&self, html: &str) -> Result<Option<String>, ScrapeError> {
        let document = Html::parse_document(html);
        let selector = Selector::parse(RESULT_LINK_SELECTOR)
            .map_err(|_| ScrapeError::Selector(RESULT_LINK_SELECTOR.to_string()))?;

        let href = match document
            .select(&selector)
            .filter_map(|a| a.value().attr("href"))
            .map(str::trim)
            .find(|href| !href.is_empty())
        {
            Some(href) => href,
            None => return Ok(None),
        };

        Ok(Some(self.base_url.join(href)?.to_string()))
    }
}
