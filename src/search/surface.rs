//! Rendering-surface capability trait
//!
//! The pipeline never binds to the automation tool's object model directly.
//! It drives a `SearchSurface`: the narrow set of capabilities one search needs
//! from a live rendering context. `PageSurface` is the chromiumoxide
//! implementation; tests script a mock instead.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::page::Page;
use tracing::{debug, info, warn};
use url::Url;

use super::error::SearchError;
use super::types::{
    LINK_SELECTOR, LISTING_SELECTOR, NAME_SELECTOR, OVERLAY_DISMISS_SELECTOR, PRICE_SELECTOR,
    QUERY_INPUT_SELECTOR,
};
use crate::utils::wait_for_element;

/// Outcome of a best-effort interstitial dismissal
///
/// `NotPresent` is the expected common case, not a failure; callers must treat
/// both variants as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissal {
    /// An overlay was found and its dismiss control clicked
    Dismissed,
    /// No overlay appeared within the wait window
    NotPresent,
}

/// Raw field reads from one product card, before validation
///
/// Fields are `None` when the expected sub-element is structurally absent.
/// The extractor decides what to do with partial cards; the surface just
/// reports what it saw.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub name: Option<String>,
    pub price: Option<String>,
    pub link: Option<String>,
}

/// Capabilities one search needs from a live rendering context
#[async_trait]
pub trait SearchSurface: Send {
    /// Navigate to the storefront landing page
    async fn open_storefront(&mut self) -> Result<(), SearchError>;

    /// Best-effort dismissal of a blocking interstitial
    async fn dismiss_overlay(&mut self, timeout: Duration) -> Result<Dismissal, SearchError>;

    /// Locate the search input within `timeout`, type the query, submit
    async fn submit_query(&mut self, query: &str, timeout: Duration) -> Result<(), SearchError>;

    /// Wait until the results grid is present in the DOM
    async fn await_results(&mut self, timeout: Duration) -> Result<(), SearchError>;

    /// Current content-extent metric (total rendered document height)
    async fn content_extent(&mut self) -> Result<i64, SearchError>;

    /// Trigger the site's load-more mechanism by scrolling to the extent
    async fn grow_content(&mut self) -> Result<(), SearchError>;

    /// Enumerate product cards currently rendered, in document order
    async fn listings(&mut self) -> Result<Vec<Listing>, SearchError>;

    /// Release the session. Idempotent: releasing an already-closed session
    /// is a no-op, never an error.
    async fn release(&mut self);
}

/// chromiumoxide-backed search surface
///
/// Owns the page for exactly one search. The page lives in an `Option` so
/// release consumes it; any capability used afterwards fails with
/// `SessionClosed` instead of touching a dead page.
pub struct PageSurface {
    page: Option<Page>,
    storefront: Url,
}

impl PageSurface {
    /// Wrap a freshly created blank page for a search against `storefront_url`
    pub fn new(page: Page, storefront_url: &str) -> Result<Self, SearchError> {
        let storefront = Url::parse(storefront_url)
            .map_err(|e| SearchError::Acquisition(format!("invalid storefront URL: {e}")))?;
        Ok(Self {
            page: Some(page),
            storefront,
        })
    }

    fn page(&self) -> Result<&Page, SearchError> {
        self.page.as_ref().ok_or(SearchError::SessionClosed)
    }

    /// Resolve a card href against the storefront origin
    ///
    /// Product anchors on the results grid are usually root-relative.
    fn resolve_link(&self, href: &str) -> Option<String> {
        match self.storefront.join(href) {
            Ok(url) => Some(url.into()),
            Err(e) => {
                debug!("Skipping unparseable listing href '{}': {}", href, e);
                None
            }
        }
    }
}

#[async_trait]
impl SearchSurface for PageSurface {
    async fn open_storefront(&mut self) -> Result<(), SearchError> {
        let page = self.page()?;
        info!("Navigating to storefront: {}", self.storefront);
        page.goto(self.storefront.as_str())
            .await
            .map_err(SearchError::surface)?;
        page.wait_for_navigation()
            .await
            .map_err(SearchError::surface)?;
        Ok(())
    }

    async fn dismiss_overlay(&mut self, timeout: Duration) -> Result<Dismissal, SearchError> {
        let page = self.page()?;

        match wait_for_element(page, OVERLAY_DISMISS_SELECTOR, timeout).await {
            Ok(close_button) => match close_button.click().await {
                Ok(_) => {
                    info!("Dismissed interstitial overlay");
                    Ok(Dismissal::Dismissed)
                }
                Err(e) => {
                    // Best effort: a vanished or unclickable overlay must not
                    // sink the search
                    warn!("Found overlay but failed to dismiss it: {}", e);
                    Ok(Dismissal::NotPresent)
                }
            },
            Err(_) => {
                debug!("No interstitial overlay within {:?}", timeout);
                Ok(Dismissal::NotPresent)
            }
        }
    }

    async fn submit_query(&mut self, query: &str, timeout: Duration) -> Result<(), SearchError> {
        let page = self.page()?;

        let input = wait_for_element(page, QUERY_INPUT_SELECTOR, timeout)
            .await
            .map_err(|_| SearchError::QueryInputTimeout { timeout })?;

        input.click().await.map_err(SearchError::surface)?;
        input.type_str(query).await.map_err(SearchError::surface)?;
        input
            .press_key("Enter")
            .await
            .map_err(SearchError::surface)?;

        info!("Submitted query: {}", query);
        Ok(())
    }

    async fn await_results(&mut self, timeout: Duration) -> Result<(), SearchError> {
        let page = self.page()?;

        wait_for_element(page, LISTING_SELECTOR, timeout)
            .await
            .map_err(|_| SearchError::ResultsTimeout { timeout })?;

        debug!("Results grid present in DOM");
        Ok(())
    }

    async fn content_extent(&mut self) -> Result<i64, SearchError> {
        let page = self.page()?;

        page.evaluate("document.body.scrollHeight")
            .await
            .map_err(SearchError::surface)?
            .into_value::<i64>()
            .map_err(SearchError::surface)
    }

    async fn grow_content(&mut self) -> Result<(), SearchError> {
        let page = self.page()?;

        page.evaluate("window.scrollTo(0, document.body.scrollHeight)")
            .await
            .map_err(SearchError::surface)?;
        Ok(())
    }

    async fn listings(&mut self) -> Result<Vec<Listing>, SearchError> {
        let page = self.page()?;

        let cards = page
            .find_elements(LISTING_SELECTOR)
            .await
            .map_err(SearchError::surface)?;

        debug!("Found {} product cards", cards.len());

        let mut listings = Vec::with_capacity(cards.len());
        for card in cards {
            let name = match card.find_element(NAME_SELECTOR).await {
                Ok(el) => el.inner_text().await.ok().flatten(),
                Err(_) => None,
            };

            let price = match card.find_element(PRICE_SELECTOR).await {
                Ok(el) => el.inner_text().await.ok().flatten(),
                Err(_) => None,
            };

            let link = match card.find_element(LINK_SELECTOR).await {
                Ok(el) => el
                    .attribute("href")
                    .await
                    .ok()
                    .flatten()
                    .and_then(|href| self.resolve_link(&href)),
                Err(_) => None,
            };

            listings.push(Listing { name, price, link });
        }

        Ok(listings)
    }

    async fn release(&mut self) {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                warn!("Failed to close search page: {}", e);
            } else {
                debug!("Search page closed");
            }
        }
    }
}
