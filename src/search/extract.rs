//! Result extraction
//!
//! Turns the raw per-card field reads into validated records. A card missing
//! any of its three fields is skipped whole; a partially blank record is worse
//! than no record. De-duplication and the size cap are enforced by the
//! `ResultSet` at insertion time, first occurrence winning.

use tracing::debug;

use super::error::SearchError;
use super::surface::{Listing, SearchSurface};
use super::types::{ProductRecord, ResultSet};

/// Extract up to `cap` unique records from the rendered results page
pub async fn extract<S: SearchSurface + ?Sized>(
    surface: &mut S,
    cap: usize,
) -> Result<ResultSet, SearchError> {
    let listings = surface.listings().await?;
    debug!("Extracting from {} rendered listings", listings.len());
    Ok(collect_records(listings, cap))
}

/// Validate, de-duplicate, and cap listings in document order
///
/// Scanning stops as soon as `cap` unique records are collected; with
/// first-occurrence-wins de-duplication that is equivalent to scanning
/// everything and truncating.
pub fn collect_records(listings: impl IntoIterator<Item = Listing>, cap: usize) -> ResultSet {
    let mut set = ResultSet::with_cap(cap);

    for listing in listings {
        if set.is_full() {
            break;
        }

        let (Some(name), Some(price), Some(link)) = (listing.name, listing.price, listing.link)
        else {
            // Structurally incomplete card (sponsored tile, placeholder,
            // mid-render skeleton): skip it entirely
            continue;
        };

        set.insert(ProductRecord { name, price, link });
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(name: &str, price: &str, link: &str) -> Listing {
        Listing {
            name: Some(name.into()),
            price: Some(price.into()),
            link: Some(link.into()),
        }
    }

    #[test]
    fn partial_listings_are_skipped_not_blanked() {
        let listings = vec![
            listing("a", "1,000", "https://shop.example/a"),
            Listing {
                name: Some("no price".into()),
                price: None,
                link: Some("https://shop.example/b".into()),
            },
            Listing {
                name: None,
                price: Some("3,000".into()),
                link: Some("https://shop.example/c".into()),
            },
            Listing {
                name: Some("no link".into()),
                price: Some("4,000".into()),
                link: None,
            },
            listing("e", "5,000", "https://shop.example/e"),
        ];

        let records = collect_records(listings, 10).into_records();

        let links: Vec<_> = records.iter().map(|r| r.link.as_str()).collect();
        assert_eq!(links, vec!["https://shop.example/a", "https://shop.example/e"]);
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let listings = vec![
            listing("first pass", "1,000", "https://shop.example/a"),
            listing("b", "2,000", "https://shop.example/b"),
            listing("second pass", "1,000", "https://shop.example/a"),
        ];

        let records = collect_records(listings, 10).into_records();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "first pass");
    }

    #[test]
    fn caps_to_first_n_unique_in_document_order() {
        let listings: Vec<_> = (0..25)
            .map(|n| {
                listing(
                    &format!("item {n}"),
                    "1,000",
                    &format!("https://shop.example/{n}"),
                )
            })
            .collect();

        let records = collect_records(listings, 10).into_records();

        assert_eq!(records.len(), 10);
        assert_eq!(records[0].name, "item 0");
        assert_eq!(records[9].name, "item 9");
    }

    #[test]
    fn fewer_than_cap_yields_exactly_what_was_seen() {
        let listings = vec![
            listing("a", "1,000", "https://shop.example/a"),
            listing("b", "2,000", "https://shop.example/b"),
        ];

        let records = collect_records(listings, 10).into_records();
        assert_eq!(records.len(), 2);
    }
}
