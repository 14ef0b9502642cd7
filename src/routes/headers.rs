//! Response header policy, per branch.
//!
//! Bot-served metadata pages are safe to cache at a shared cache for a short
//! window; redirects and errors must never be served stale to a human whose
//! underlying content may change.

use axum::http::header::{
    CACHE_CONTROL, EXPIRES, HeaderMap, HeaderValue, PRAGMA, X_CONTENT_TYPE_OPTIONS,
};

/// Cache policy for the bot metadata branch: 10 minutes fresh, a day of
/// stale-while-revalidate tolerance. Crawlers re-fetch infrequently.
const BOT_CACHE: &str = "public, max-age=600, s-maxage=600, stale-while-revalidate=86400";

/// Cache-busting policy for error and redirect branches.
const NO_STORE: &str = "no-store, no-cache, must-revalidate";

/// Headers for error and redirect responses: strong cache busting plus the
/// legacy `Pragma`/`Expires` pair, and nosniff.
pub fn no_store_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(NO_STORE));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(EXPIRES, HeaderValue::from_static("0"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers
}

/// Headers for the bot metadata branch: short shared-cache lifetime with
/// stale-while-revalidate, and nosniff.
pub fn bot_cache_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(BOT_CACHE));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers
}
