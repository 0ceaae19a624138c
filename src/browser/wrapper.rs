//! Browser lifecycle wrapper
//!
//! Pairs a launched browser with its CDP event handler task and the temporary
//! profile directory it runs from, so that all three are torn down together.

use chromiumoxide::browser::Browser;
use chromiumoxide::page::Page;
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tracing::info;

use super::{BrowserError, BrowserResult};
use crate::utils::constants::CHROME_USER_AGENT;

/// Wrapper for a Browser and its event handler task
///
/// The handler task MUST be aborted once the browser is gone, otherwise it
/// runs indefinitely against a dead websocket. Drop handles that.
pub struct BrowserWrapper {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
}

impl BrowserWrapper {
    pub(crate) fn new(browser: Browser, handler: JoinHandle<()>, user_data_dir: PathBuf) -> Self {
        Self {
            browser,
            handler,
            user_data_dir: Some(user_data_dir),
        }
    }

    pub(crate) fn browser(&self) -> &Browser {
        &self.browser
    }

    pub(crate) fn browser_mut(&mut self) -> &mut Browser {
        &mut self.browser
    }

    /// Clean up the profile directory (blocking)
    ///
    /// Call AFTER `browser.wait()` completes: Chrome must have released its
    /// file handles first or removal fails on Windows. Blocking `std::fs` is
    /// deliberate so this stays callable from Drop contexts.
    pub fn cleanup_profile_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            info!("Cleaning up profile directory: {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                tracing::warn!(
                    "Failed to clean up profile directory {}: {}. Manual cleanup may be required.",
                    path.display(),
                    e
                );
            }
        }
    }
}

impl Drop for BrowserWrapper {
    fn drop(&mut self) {
        info!("Dropping BrowserWrapper - aborting handler task");
        self.handler.abort();
        // Browser::drop() kills the Chrome process itself

        if let Some(dir) = self.user_data_dir.as_ref() {
            tracing::warn!(
                "BrowserWrapper dropped without explicit cleanup. \
                Profile directory will be orphaned: {}. \
                Call BrowserManager::shutdown() before dropping.",
                dir.display()
            );
        }
    }
}

/// Launch a browser instance using the crate configuration
///
/// Returns (Browser, JoinHandle, PathBuf) where the PathBuf is the profile
/// directory that must be cleaned up after the browser exits. Each instance
/// gets a unique profile directory to avoid Chrome profile lock contention.
pub async fn launch_browser() -> BrowserResult<(Browser, JoinHandle<()>, PathBuf)> {
    info!("Launching browser instance");

    let config = crate::load_yaml_config().unwrap_or_default();

    let user_data_dir =
        std::env::temp_dir().join(format!("shopscrape_browser_{}", std::process::id()));

    let user_agent = config
        .browser
        .user_agent
        .clone()
        .unwrap_or_else(|| CHROME_USER_AGENT.to_string());

    let (browser, handler) = crate::browser_setup::launch_browser(
        config.browser.headless,
        Some(user_data_dir.clone()),
        config.browser.disable_sandbox,
        &user_agent,
        (config.browser.window.width, config.browser.window.height),
    )
    .await
    .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

    Ok((browser, handler, user_data_dir))
}

/// Create a blank page for a fresh search session
///
/// Sessions start on about:blank and only then navigate to the storefront, so
/// per-page setup happens before any site script runs.
pub async fn create_blank_page(wrapper: &BrowserWrapper) -> BrowserResult<Page> {
    let page = wrapper
        .browser()
        .new_page("about:blank")
        .await
        .map_err(|e| BrowserError::PageCreationFailed(e.to_string()))?;

    info!("Created blank page for search session");
    Ok(page)
}
