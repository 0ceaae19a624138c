//! Browser instance manager
//!
//! Ensures only one browser process runs at a time, shared across searches.
//! Each search still opens its own page; the manager only pools the underlying
//! Chrome process.
//!
//! Must use `tokio::sync::Mutex`, not a sync lock: browser operations await
//! everywhere and sync guards cannot be held across `.await` points.

use anyhow::Result;
use std::sync::{Arc, OnceLock};
use tokio::sync::Mutex;
use tracing::info;

use crate::browser::{BrowserWrapper, launch_browser};

static GLOBAL_MANAGER: OnceLock<Arc<BrowserManager>> = OnceLock::new();

/// Lazy-launching browser manager with health checking and crash recovery
///
/// - First `get_or_launch()` call launches Chrome (~2-3s), later calls reuse it
/// - Every access health-checks the process via the `version()` CDP command and
///   relaunches transparently if it has crashed
/// - `shutdown()` closes the process and removes its profile directory
pub struct BrowserManager {
    browser: Arc<Mutex<Option<BrowserWrapper>>>,
}

impl BrowserManager {
    /// Get the process-wide singleton manager
    ///
    /// All entry points share this instance so at most one Chrome process is
    /// alive per host process.
    #[must_use]
    pub fn global() -> Arc<BrowserManager> {
        GLOBAL_MANAGER
            .get_or_init(|| Arc::new(BrowserManager::new()))
            .clone()
    }

    fn new() -> Self {
        Self {
            browser: Arc::new(Mutex::new(None)),
        }
    }

    /// Get or launch the shared browser instance
    ///
    /// Health-checks an existing browser before handing it out; a crashed
    /// instance is cleaned up and replaced without caller involvement.
    ///
    /// Returns the Arc to the browser Mutex - callers lock it to reach the
    /// `BrowserWrapper`.
    pub async fn get_or_launch(&self) -> Result<Arc<Mutex<Option<BrowserWrapper>>>> {
        let mut guard = self.browser.lock().await;

        if let Some(wrapper) = guard.as_ref() {
            match wrapper.browser().version().await {
                Ok(_) => {
                    tracing::debug!("Browser health check passed, reusing existing browser");
                    drop(guard);
                    return Ok(self.browser.clone());
                }
                Err(e) => {
                    tracing::warn!("Browser health check failed: {}. Triggering recovery...", e);

                    if let Some(mut crashed_wrapper) = guard.take() {
                        // Best-effort: the process may already be dead
                        let _ = crashed_wrapper.browser_mut().close().await;
                        let _ = crashed_wrapper.browser_mut().wait().await;
                        crashed_wrapper.cleanup_profile_dir();
                    }

                    tracing::info!("Crashed browser cleaned up, launching new instance");
                }
            }
        }

        tracing::info!("Launching browser (first use or after recovery)");
        let (browser, handler, user_data_dir) = launch_browser().await?;
        let wrapper = BrowserWrapper::new(browser, handler, user_data_dir);
        *guard = Some(wrapper);
        drop(guard);

        Ok(self.browser.clone())
    }

    /// Shutdown the browser if running
    ///
    /// Safe to call multiple times; subsequent calls are no-ops. Both
    /// `close()` and `wait()` are required - without the wait the Chrome
    /// process lingers as a zombie and the profile dir stays locked.
    pub async fn shutdown(&self) -> Result<()> {
        let mut guard = self.browser.lock().await;

        if let Some(mut wrapper) = guard.take() {
            info!("Shutting down browser");

            if let Err(e) = wrapper.browser_mut().close().await {
                tracing::warn!("Failed to close browser cleanly: {}", e);
            }

            if let Err(e) = wrapper.browser_mut().wait().await {
                tracing::warn!("Failed to wait for browser exit: {}", e);
            }

            wrapper.cleanup_profile_dir();

            drop(wrapper);
        }

        Ok(())
    }

    /// Non-blocking check of browser state
    pub async fn is_browser_running(&self) -> bool {
        self.browser.lock().await.is_some()
    }
}

impl Drop for BrowserManager {
    fn drop(&mut self) {
        // Not a clean shutdown: only the handler task is aborted here.
        // Call shutdown().await first for an orderly exit.
        info!("BrowserManager dropping - browser will be cleaned up");
    }
}
