//! Automated product search for infinite-scroll storefronts
//!
//! Drives a headless Chromium session through a storefront search: dismisses
//! interstitials, submits the query, expands the infinite-scroll results page
//! until it stops growing, and extracts a capped, de-duplicated list of
//! product records.

pub mod browser_setup;
mod browser;
mod manager;
pub mod search;
mod utils;

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub search: SearchConfig,
}

/// Browser launch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Render without a visible window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Relax OS sandboxing; forced on automatically inside containers
    #[serde(default = "default_disable_sandbox")]
    pub disable_sandbox: bool,

    /// Override the identifying client string. Defaults to the stealth
    /// Chrome user agent when unset.
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Window dimensions
    #[serde(default)]
    pub window: WindowConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_width")]
    pub width: u32,

    #[serde(default = "default_window_height")]
    pub height: u32,
}

/// Search pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Storefront landing page searches start from
    #[serde(default = "default_storefront_url")]
    pub storefront_url: String,

    /// Maximum number of unique records per search
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// How long to wait for an interstitial overlay before assuming none (ms)
    #[serde(default = "default_overlay_wait_ms")]
    pub overlay_wait_ms: u64,

    /// Bounded wait for the search input to appear (ms)
    #[serde(default = "default_query_input_wait_ms")]
    pub query_input_wait_ms: u64,

    /// Bounded wait for the results grid to appear (ms)
    #[serde(default = "default_results_wait_ms")]
    pub results_wait_ms: u64,

    /// Pause between scroll and re-measure during pagination (ms)
    #[serde(default = "default_scroll_poll_ms")]
    pub scroll_poll_ms: u64,

    /// Ceiling on scroll rounds against pages that never stabilize
    #[serde(default = "default_max_scroll_rounds")]
    pub max_scroll_rounds: u32,
}

impl SearchConfig {
    #[must_use]
    pub fn overlay_wait(&self) -> Duration {
        Duration::from_millis(self.overlay_wait_ms)
    }

    #[must_use]
    pub fn query_input_wait(&self) -> Duration {
        Duration::from_millis(self.query_input_wait_ms)
    }

    #[must_use]
    pub fn results_wait(&self) -> Duration {
        Duration::from_millis(self.results_wait_ms)
    }

    #[must_use]
    pub fn scroll_poll(&self) -> Duration {
        Duration::from_millis(self.scroll_poll_ms)
    }
}

fn default_headless() -> bool {
    true
}

fn default_disable_sandbox() -> bool {
    false // secure by default
}

fn default_window_width() -> u32 {
    1280
}

fn default_window_height() -> u32 {
    720
}

fn default_storefront_url() -> String {
    search::STOREFRONT_URL.to_string()
}

fn default_max_results() -> usize {
    search::DEFAULT_MAX_RESULTS
}

fn default_overlay_wait_ms() -> u64 {
    search::DEFAULT_OVERLAY_WAIT_MS
}

fn default_query_input_wait_ms() -> u64 {
    search::DEFAULT_QUERY_INPUT_WAIT_MS
}

fn default_results_wait_ms() -> u64 {
    search::DEFAULT_RESULTS_WAIT_MS
}

fn default_scroll_poll_ms() -> u64 {
    search::DEFAULT_SCROLL_POLL_MS
}

fn default_max_scroll_rounds() -> u32 {
    search::DEFAULT_MAX_SCROLL_ROUNDS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser: BrowserConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            disable_sandbox: default_disable_sandbox(),
            user_agent: None,
            window: WindowConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            storefront_url: default_storefront_url(),
            max_results: default_max_results(),
            overlay_wait_ms: default_overlay_wait_ms(),
            query_input_wait_ms: default_query_input_wait_ms(),
            results_wait_ms: default_results_wait_ms(),
            scroll_poll_ms: default_scroll_poll_ms(),
            max_scroll_rounds: default_max_scroll_rounds(),
        }
    }
}

/// Load config from config.yaml in the package root, falling back to defaults
pub fn load_yaml_config() -> anyhow::Result<Config> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config.yaml");

    if config_path.exists() {
        let contents = fs::read_to_string(&config_path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    } else {
        Ok(Config::default())
    }
}

pub use browser::{
    BrowserError, BrowserResult, BrowserWrapper, download_managed_browser,
    find_browser_executable, launch_browser,
};
pub use manager::BrowserManager;
pub use search::{ProductRecord, SearchError, SearchResults};

/// Perform a product search with the global browser manager and file config
///
/// Convenience entry point for standalone use. Call [`shutdown`] before the
/// process exits to close the browser cleanly.
///
/// # Errors
/// Fails only when a browser session cannot be acquired; pipeline faults
/// return an empty result set with a diagnostic instead.
pub async fn search(query: impl Into<String>) -> anyhow::Result<SearchResults> {
    let config = load_yaml_config().unwrap_or_default();
    let manager = BrowserManager::global();
    let results = search::search_with_manager(&manager, query, &config.search).await?;
    Ok(results)
}

/// Shut down the global browser instance, if one is running
pub async fn shutdown() -> anyhow::Result<()> {
    BrowserManager::global().shutdown().await
}
