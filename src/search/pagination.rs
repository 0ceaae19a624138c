//! Infinite-scroll pagination driver
//!
//! The storefront loads more cards as the viewport approaches the bottom of
//! the document. `expand_all` repeatedly scrolls to the current extent, pauses
//! for asynchronous loading, and re-measures; two equal consecutive
//! measurements mean the page has converged and no further content will load.
//!
//! The pause is a fixed delay, not a true completion signal, so the loop also
//! carries a round cap: a page that never stabilizes (live-updating prices,
//! ads reflowing the layout) would otherwise scroll forever.

use std::time::Duration;

use tracing::{debug, warn};

use super::error::SearchError;
use super::surface::SearchSurface;

/// How the expansion loop terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convergence {
    /// Content extent stopped growing; `rounds` scrolls produced new content
    Settled { rounds: u32 },
    /// Round cap hit before the extent stabilized
    CapReached { rounds: u32 },
}

/// Expand the results page until its content extent stops growing
///
/// Each cycle: scroll to the current extent, sleep `poll_delay`, re-measure.
/// A page that stabilizes after k growing scrolls takes exactly k+1 cycles
/// (k expansions plus one confirming no-change).
///
/// Hitting `max_rounds` is not an error; the caller proceeds with whatever
/// content is loaded.
pub async fn expand_all<S: SearchSurface + ?Sized>(
    surface: &mut S,
    poll_delay: Duration,
    max_rounds: u32,
) -> Result<Convergence, SearchError> {
    let mut last_extent = surface.content_extent().await?;

    for round in 0..max_rounds {
        surface.grow_content().await?;
        tokio::time::sleep(poll_delay).await;

        let extent = surface.content_extent().await?;
        if extent == last_extent {
            debug!(
                "Pagination converged after {} expansion round(s) at extent {}",
                round, extent
            );
            return Ok(Convergence::Settled { rounds: round });
        }

        debug!("Content extent grew: {} -> {}", last_extent, extent);
        last_extent = extent;
    }

    warn!(
        "Pagination round cap ({}) reached without convergence; extracting partial content",
        max_rounds
    );
    Ok(Convergence::CapReached { rounds: max_rounds })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::surface::{Dismissal, Listing};
    use async_trait::async_trait;

    /// Surface scripted with a fixed sequence of extent measurements
    struct ScriptedSurface {
        extents: Vec<i64>,
        next_measure: usize,
        scrolls: u32,
    }

    impl ScriptedSurface {
        fn new(extents: Vec<i64>) -> Self {
            Self {
                extents,
                next_measure: 0,
                scrolls: 0,
            }
        }
    }

    #[async_trait]
    impl SearchSurface for ScriptedSurface {
        async fn open_storefront(&mut self) -> Result<(), SearchError> {
            Ok(())
        }

        async fn dismiss_overlay(&mut self, _: Duration) -> Result<Dismissal, SearchError> {
            Ok(Dismissal::NotPresent)
        }

        async fn submit_query(&mut self, _: &str, _: Duration) -> Result<(), SearchError> {
            Ok(())
        }

        async fn await_results(&mut self, _: Duration) -> Result<(), SearchError> {
            Ok(())
        }

        async fn content_extent(&mut self) -> Result<i64, SearchError> {
            let extent = self.extents[self.next_measure.min(self.extents.len() - 1)];
            self.next_measure += 1;
            Ok(extent)
        }

        async fn grow_content(&mut self) -> Result<(), SearchError> {
            self.scrolls += 1;
            Ok(())
        }

        async fn listings(&mut self) -> Result<Vec<Listing>, SearchError> {
            Ok(Vec::new())
        }

        async fn release(&mut self) {}
    }

    #[tokio::test]
    async fn converges_after_k_plus_one_cycles() {
        // Extent grows on 2 scrolls, then stabilizes: k = 2
        let mut surface = ScriptedSurface::new(vec![1000, 2000, 3000, 3000]);

        let outcome = expand_all(&mut surface, Duration::ZERO, 40).await.unwrap();

        assert_eq!(outcome, Convergence::Settled { rounds: 2 });
        // k expansions + 1 confirming no-change
        assert_eq!(surface.scrolls, 3);
    }

    #[tokio::test]
    async fn already_stable_page_takes_one_cycle() {
        let mut surface = ScriptedSurface::new(vec![500, 500]);

        let outcome = expand_all(&mut surface, Duration::ZERO, 40).await.unwrap();

        assert_eq!(outcome, Convergence::Settled { rounds: 0 });
        assert_eq!(surface.scrolls, 1);
    }

    #[tokio::test]
    async fn round_cap_bounds_a_page_that_never_stabilizes() {
        // Strictly increasing extent forever
        let extents: Vec<i64> = (0..100).map(|n| 1000 + n * 100).collect();
        let mut surface = ScriptedSurface::new(extents);

        let outcome = expand_all(&mut surface, Duration::ZERO, 5).await.unwrap();

        assert_eq!(outcome, Convergence::CapReached { rounds: 5 });
        assert_eq!(surface.scrolls, 5);
    }
}
