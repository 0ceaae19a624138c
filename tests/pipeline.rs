//! Orchestrator tests over a scripted rendering surface
//!
//! Drives `search_on_surface` against a mock `SearchSurface` to pin the
//! pipeline guarantees: capped unique output, empty-set-plus-diagnostic on
//! bounded-wait expiry, and exactly one session release on every path.

use std::time::Duration;

use async_trait::async_trait;
use shopscrape::SearchConfig;
use shopscrape::search::{
    Dismissal, Listing, SearchError, SearchSurface, search_on_surface,
};

fn listing(name: &str, price: &str, link: &str) -> Listing {
    Listing {
        name: Some(name.into()),
        price: Some(price.into()),
        link: Some(link.into()),
    }
}

fn fast_config() -> SearchConfig {
    SearchConfig {
        scroll_poll_ms: 0,
        overlay_wait_ms: 0,
        ..SearchConfig::default()
    }
}

/// Scripted surface recording every interaction
#[derive(Default)]
struct MockSurface {
    listings: Vec<Listing>,
    results_never_appear: bool,
    submitted: Vec<String>,
    release_count: u32,
    extent_growth_rounds: i64,
    measures: i64,
}

#[async_trait]
impl SearchSurface for MockSurface {
    async fn open_storefront(&mut self) -> Result<(), SearchError> {
        Ok(())
    }

    async fn dismiss_overlay(&mut self, _timeout: Duration) -> Result<Dismissal, SearchError> {
        Ok(Dismissal::NotPresent)
    }

    async fn submit_query(&mut self, query: &str, _timeout: Duration) -> Result<(), SearchError> {
        self.submitted.push(query.to_string());
        Ok(())
    }

    async fn await_results(&mut self, timeout: Duration) -> Result<(), SearchError> {
        if self.results_never_appear {
            Err(SearchError::ResultsTimeout { timeout })
        } else {
            Ok(())
        }
    }

    async fn content_extent(&mut self) -> Result<i64, SearchError> {
        // Grows for a few measurements, then stabilizes
        let extent = 1000 + 100 * self.measures.min(self.extent_growth_rounds);
        self.measures += 1;
        Ok(extent)
    }

    async fn grow_content(&mut self) -> Result<(), SearchError> {
        Ok(())
    }

    async fn listings(&mut self) -> Result<Vec<Listing>, SearchError> {
        Ok(self.listings.clone())
    }

    async fn release(&mut self) {
        self.release_count += 1;
    }
}

#[tokio::test]
async fn happy_path_dedupes_skips_partials_and_releases_once() {
    let mut surface = MockSurface {
        listings: vec![
            listing("usb hub", "12,900", "https://shop.example/items/1"),
            // Same link seen again on a later scroll pass
            listing("usb hub (dup)", "12,900", "https://shop.example/items/1"),
            // Price element missing: skipped whole, not emitted blank
            Listing {
                name: Some("mystery deal".into()),
                price: None,
                link: Some("https://shop.example/items/2".into()),
            },
            listing("usb cable", "4,500", "https://shop.example/items/3"),
        ],
        extent_growth_rounds: 2,
        ..MockSurface::default()
    };

    let results = search_on_surface(&mut surface, "usb", &fast_config()).await;

    assert!(results.diagnostic.is_none());
    let links: Vec<_> = results.products.iter().map(|p| p.link.as_str()).collect();
    assert_eq!(
        links,
        vec!["https://shop.example/items/1", "https://shop.example/items/3"]
    );
    assert_eq!(results.products[0].name, "usb hub");
    assert_eq!(surface.submitted, vec!["usb"]);
    assert_eq!(surface.release_count, 1);
}

#[tokio::test]
async fn results_timeout_yields_empty_set_with_diagnostic_and_releases_once() {
    let mut surface = MockSurface {
        results_never_appear: true,
        ..MockSurface::default()
    };

    let results = search_on_surface(&mut surface, "usb", &fast_config()).await;

    assert!(results.products.is_empty());
    let diagnostic = results.diagnostic.expect("diagnostic must name the stage");
    assert!(diagnostic.contains("results surface"));
    assert_eq!(surface.release_count, 1);
}

#[tokio::test]
async fn blank_query_is_rejected_before_touching_the_page() {
    let mut surface = MockSurface::default();

    let results = search_on_surface(&mut surface, "   ", &fast_config()).await;

    assert!(results.products.is_empty());
    assert!(results.diagnostic.is_some());
    assert!(surface.submitted.is_empty());
    assert_eq!(surface.release_count, 1);
}

#[tokio::test]
async fn output_never_exceeds_configured_cap() {
    let listings: Vec<_> = (0..30)
        .map(|n| {
            listing(
                &format!("item {n}"),
                "9,900",
                &format!("https://shop.example/items/{n}"),
            )
        })
        .collect();

    let mut surface = MockSurface {
        listings,
        ..MockSurface::default()
    };

    let results = search_on_surface(&mut surface, "bulk", &fast_config()).await;

    assert_eq!(results.products.len(), 10);
    // First cap unique records in document order
    assert_eq!(results.products[0].name, "item 0");
    assert_eq!(results.products[9].name, "item 9");
}

#[tokio::test]
async fn smaller_cap_is_honored() {
    let listings: Vec<_> = (0..5)
        .map(|n| {
            listing(
                &format!("item {n}"),
                "9,900",
                &format!("https://shop.example/items/{n}"),
            )
        })
        .collect();

    let mut surface = MockSurface {
        listings,
        ..MockSurface::default()
    };

    let config = SearchConfig {
        max_results: 3,
        ..fast_config()
    };
    let results = search_on_surface(&mut surface, "bulk", &config).await;

    assert_eq!(results.products.len(), 3);
}
