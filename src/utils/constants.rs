//! Shared configuration constants
//!
//! Default values used throughout the crate so that magic numbers live in
//! exactly one place.

/// Chrome user agent string presented by stealth sessions
///
/// Chrome ships a new stable roughly every 4 weeks; refresh this string
/// periodically so the claimed version stays within a plausible window.
///
/// Reference: https://chromiumdash.appspot.com/schedule
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
