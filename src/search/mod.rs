//! Product search over a live storefront using browser automation
//!
//! Orchestrates one search end to end: open a session, clear interstitials,
//! submit the query, wait for the results grid, expand the infinite-scroll
//! page to convergence, and extract a capped, de-duplicated record set. The
//! session is released on every exit path.
//!
//! # Architecture
//! - `types` - records, result set, selectors, defaults
//! - `surface` - the rendering-surface capability trait + chromiumoxide impl
//! - `pagination` - infinite-scroll convergence loop
//! - `extract` - listing validation, de-duplication, capping
//! - `error` - failure taxonomy
//!
//! # Usage
//! ```no_run
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let results = shopscrape::search("mechanical keyboard").await?;
//!     println!("Found {} products", results.products.len());
//!
//!     // Clean up the browser before exit
//!     shopscrape::shutdown().await?;
//!     Ok(())
//! }
//! ```

pub mod error;
mod extract;
mod pagination;
pub mod surface;
mod types;

pub use error::SearchError;
pub use extract::collect_records;
pub use pagination::{Convergence, expand_all};
pub use surface::{Dismissal, Listing, PageSurface, SearchSurface};
pub use types::{
    DEFAULT_MAX_RESULTS, DEFAULT_MAX_SCROLL_ROUNDS, DEFAULT_OVERLAY_WAIT_MS,
    DEFAULT_QUERY_INPUT_WAIT_MS, DEFAULT_RESULTS_WAIT_MS, DEFAULT_SCROLL_POLL_MS, ProductRecord,
    ResultSet, STOREFRONT_URL, SearchResults,
};

use tracing::{debug, info, warn};

use crate::SearchConfig;
use crate::manager::BrowserManager;

/// Perform a product search using the provided `BrowserManager`
///
/// A fresh page is created for every search; the shared browser process is
/// reused across searches.
///
/// # Errors
/// Fails only when no controllable browser session can be acquired. Every
/// post-acquisition fault is converted into an empty `SearchResults` carrying
/// a diagnostic.
pub async fn search_with_manager(
    manager: &BrowserManager,
    query: impl Into<String>,
    config: &SearchConfig,
) -> Result<SearchResults, SearchError> {
    let query = query.into();
    info!("Starting product search for query: {}", query);

    let browser_arc = manager
        .get_or_launch()
        .await
        .map_err(|e| SearchError::Acquisition(e.to_string()))?;
    let browser_lock = browser_arc.lock().await;

    let browser_wrapper = browser_lock
        .as_ref()
        .ok_or_else(|| SearchError::Acquisition("browser not available".to_string()))?;

    let page = crate::browser::create_blank_page(browser_wrapper)
        .await
        .map_err(|e| SearchError::Acquisition(e.to_string()))?;

    // Release the browser lock before driving the page; the session owns it now
    drop(browser_lock);

    let mut surface = PageSurface::new(page, &config.storefront_url)?;
    Ok(search_on_surface(&mut surface, &query, config).await)
}

/// Run one search against an already-acquired surface
///
/// Never fails: pipeline faults become an empty result set with a diagnostic.
/// The surface is released exactly once, on every path - success, fault, or
/// rejected query.
pub async fn search_on_surface<S: SearchSurface>(
    surface: &mut S,
    query: &str,
    config: &SearchConfig,
) -> SearchResults {
    let outcome = run_pipeline(surface, query, config).await;

    surface.release().await;

    match outcome {
        Ok(set) => {
            info!(
                "Search for '{}' completed with {} unique product(s)",
                query,
                set.len()
            );
            SearchResults::new(query, set.into_records())
        }
        Err(e) => {
            warn!("Search for '{}' failed: {}", query, e);
            SearchResults::failed(query, e.to_string())
        }
    }
}

async fn run_pipeline<S: SearchSurface + ?Sized>(
    surface: &mut S,
    query: &str,
    config: &SearchConfig,
) -> Result<ResultSet, SearchError> {
    if query.trim().is_empty() {
        return Err(SearchError::EmptyQuery);
    }

    surface.open_storefront().await?;

    // Best effort; both outcomes are success
    if surface.dismiss_overlay(config.overlay_wait()).await? == Dismissal::Dismissed {
        debug!("Cleared a blocking interstitial before searching");
    }

    surface.submit_query(query, config.query_input_wait()).await?;
    surface.await_results(config.results_wait()).await?;

    match expand_all(surface, config.scroll_poll(), config.max_scroll_rounds).await? {
        Convergence::Settled { rounds } => {
            debug!("Results page fully expanded after {} round(s)", rounds);
        }
        // expand_all already warned; extract whatever loaded
        Convergence::CapReached { .. } => {}
    }

    extract::extract(surface, config.max_results).await
}
