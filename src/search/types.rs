//! Data structures and constants for product search

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

// =============================================================================
// Constants
// =============================================================================

/// Storefront landing page the search session starts from
pub const STOREFRONT_URL: &str = "https://www.coupang.com";

/// CSS selector for the search input on the landing page
pub const QUERY_INPUT_SELECTOR: &str = "input[name='q']";

/// CSS selector for the dismiss control of promo/cookie interstitials
pub const OVERLAY_DISMISS_SELECTOR: &str = ".close";

/// CSS selector for individual product cards in the results grid
pub const LISTING_SELECTOR: &str = ".search-product";

/// CSS selector for the product name inside a card
pub const NAME_SELECTOR: &str = ".name";

/// CSS selector for the displayed price inside a card
pub const PRICE_SELECTOR: &str = ".price-value";

/// CSS selector for the product link inside a card
pub const LINK_SELECTOR: &str = "a";

/// Maximum number of unique records returned by default
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Default wait for an interstitial overlay to show up (ms)
pub const DEFAULT_OVERLAY_WAIT_MS: u64 = 5_000;

/// Default bounded wait for the search input to appear (ms)
pub const DEFAULT_QUERY_INPUT_WAIT_MS: u64 = 10_000;

/// Default bounded wait for the results grid to appear (ms)
pub const DEFAULT_RESULTS_WAIT_MS: u64 = 10_000;

/// Default pause between scroll and re-measure during pagination (ms)
pub const DEFAULT_SCROLL_POLL_MS: u64 = 2_000;

/// Default ceiling on scroll rounds against pages that never stabilize
pub const DEFAULT_MAX_SCROLL_ROUNDS: u32 = 40;

// =============================================================================
// Data Structures
// =============================================================================

/// A single extracted product listing
///
/// `link` doubles as the record's identity key: two cards pointing at the same
/// product URL are the same record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product display name
    pub name: String,

    /// Displayed price, kept as the site renders it (currency text included)
    pub price: String,

    /// Absolute product URL; identity key for de-duplication
    pub link: String,
}

/// Insertion-ordered collection of unique product records, capped in size
///
/// Uniqueness is enforced over the link at insertion time; the first
/// occurrence wins and later duplicates are rejected. Order always matches
/// first-seen order on the page.
#[derive(Debug)]
pub struct ResultSet {
    records: Vec<ProductRecord>,
    seen_links: HashSet<String>,
    cap: usize,
}

impl ResultSet {
    /// Create an empty set holding at most `cap` records
    #[must_use]
    pub fn with_cap(cap: usize) -> Self {
        Self {
            records: Vec::with_capacity(cap),
            seen_links: HashSet::with_capacity(cap),
            cap,
        }
    }

    /// Insert a record, returning whether it was kept
    ///
    /// Rejected when the set is full or the link was already seen.
    pub fn insert(&mut self, record: ProductRecord) -> bool {
        if self.is_full() || self.seen_links.contains(&record.link) {
            return false;
        }
        self.seen_links.insert(record.link.clone());
        self.records.push(record);
        true
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.records.len() >= self.cap
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the set, yielding records in first-seen order
    #[must_use]
    pub fn into_records(self) -> Vec<ProductRecord> {
        self.records
    }
}

/// Outcome of one search: the records plus an optional failure diagnostic
///
/// A failed pipeline produces an empty `products` list and a human-readable
/// `diagnostic` naming the stage that failed; it never crashes the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    /// Query that produced these results
    pub query: String,

    /// Extracted records, first-seen order, at most the configured cap
    pub products: Vec<ProductRecord>,

    /// Present iff the pipeline failed before completing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl SearchResults {
    #[must_use]
    pub fn new(query: impl Into<String>, products: Vec<ProductRecord>) -> Self {
        Self {
            query: query.into(),
            products,
            diagnostic: None,
        }
    }

    /// Empty result set carrying the reason the search failed
    #[must_use]
    pub fn failed(query: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            products: Vec::new(),
            diagnostic: Some(diagnostic.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: u32) -> ProductRecord {
        ProductRecord {
            name: format!("product {n}"),
            price: format!("{n},000"),
            link: format!("https://shop.example/items/{n}"),
        }
    }

    #[test]
    fn insert_preserves_first_seen_order() {
        let mut set = ResultSet::with_cap(10);
        for n in [3, 1, 2] {
            assert!(set.insert(record(n)));
        }
        let links: Vec<_> = set.into_records().into_iter().map(|r| r.link).collect();
        assert_eq!(
            links,
            vec![
                "https://shop.example/items/3",
                "https://shop.example/items/1",
                "https://shop.example/items/2",
            ]
        );
    }

    #[test]
    fn duplicate_links_are_rejected_first_wins() {
        let mut set = ResultSet::with_cap(10);
        assert!(set.insert(record(1)));

        let mut dup = record(1);
        dup.name = "same link, later pass".into();
        assert!(!set.insert(dup));

        assert_eq!(set.len(), 1);
        assert_eq!(set.into_records()[0].name, "product 1");
    }

    #[test]
    fn cap_is_enforced_at_insertion() {
        let mut set = ResultSet::with_cap(2);
        assert!(set.insert(record(1)));
        assert!(set.insert(record(2)));
        assert!(set.is_full());
        assert!(!set.insert(record(3)));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn failed_results_are_empty_with_diagnostic() {
        let results = SearchResults::failed("keyboard", "results grid not found within 10s");
        assert!(results.products.is_empty());
        assert!(results.diagnostic.is_some());
    }

    #[test]
    fn diagnostic_is_omitted_from_success_json() {
        let results = SearchResults::new("keyboard", vec![record(1)]);
        let json = serde_json::to_string(&results).unwrap();
        assert!(!json.contains("diagnostic"));
    }
}
