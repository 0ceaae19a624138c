//! Element polling utility
//!
//! Storefronts render listing grids and popups via JavaScript well after the
//! initial page load event fires, so a plain `find_element` immediately after
//! navigation is a race. `wait_for_element` polls with exponential backoff
//! until the element appears or the deadline passes.

use std::time::Duration;

use anyhow::{Result, anyhow};
use chromiumoxide::Page;
use chromiumoxide::element::Element;

/// Wait for an element to appear in the DOM using exponential backoff polling
///
/// Polling starts at 100ms, doubles each retry, and caps at 1 second. Total
/// duration is limited by `timeout`.
///
/// # Arguments
/// * `page` - The page to search in
/// * `selector` - CSS selector for the element
/// * `timeout` - Maximum time to wait for the element
pub async fn wait_for_element(
    page: &Page,
    selector: &str,
    timeout: Duration,
) -> Result<Element> {
    let start = std::time::Instant::now();
    let mut poll_interval = Duration::from_millis(100);
    let max_interval = Duration::from_secs(1);

    loop {
        if let Ok(element) = page.find_element(selector).await {
            return Ok(element);
        }

        if start.elapsed() >= timeout {
            return Err(anyhow!(
                "element not found (timeout after {}ms): '{}'",
                timeout.as_millis(),
                selector
            ));
        }

        tokio::time::sleep(poll_interval).await;

        poll_interval = (poll_interval * 2).min(max_interval);
    }
}
