//! Utility functions and helpers.

pub mod http;

use url::Url;

/// Storefront product page base; claim links live under `/p/<slug>`.
const STORE_PAGE_BASE: &str = "https://store.epicgames.com/en-US/p/";

/// Build the claim page URL for a product slug.
///
/// The slug is resolved against the store page base, so characters that are
/// not path-safe get percent-encoded.
pub fn claim_url(slug: &str) -> String {
    Url::parse(STORE_PAGE_BASE)
        .and_then(|base| base.join(slug))
        .map(|u| u.to_string())
        .unwrap_or_else(|_| format!("{STORE_PAGE_BASE}{slug}"))
}
