//! Search pipeline error taxonomy
//!
//! Only `Acquisition` is fatal to the caller; every other variant is caught at
//! the orchestrator boundary and converted into an empty result set plus a
//! diagnostic. Interstitial absence and missing listing fields are not errors
//! at all and never reach this enum.

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    /// Could not obtain a controllable browser session. Fatal, not retried.
    #[error("failed to acquire browser session: {0}")]
    Acquisition(String),

    /// Caller supplied an empty or blank query
    #[error("query must not be empty")]
    EmptyQuery,

    /// The search input never appeared within its bounded wait
    #[error("search input not found within {}s", .timeout.as_secs())]
    QueryInputTimeout { timeout: Duration },

    /// The results grid never appeared within its bounded wait
    #[error("results surface not found within {}s", .timeout.as_secs())]
    ResultsTimeout { timeout: Duration },

    /// A capability was invoked on a session that has already been released
    #[error("session already closed")]
    SessionClosed,

    /// Unanticipated browser/CDP fault mid-pipeline
    #[error("browser interaction failed: {0}")]
    Surface(String),
}

impl SearchError {
    pub(crate) fn surface(err: impl std::fmt::Display) -> Self {
        SearchError::Surface(err.to_string())
    }
}
