//! Heuristic HTML extraction.
//!
//! Turns a page into a flat text context and a list of product-like records.
//! Blocks are found by substring class matches, prices by a regex and titles
//! by the first heading in the block.

pub mod links;
pub mod products;
pub mod text;

pub use links::discover_product_links;
pub use products::extract_products;
pub use text::extract_context;

use scraper::Selector;
use url::Url;

/// Parse a selector that is a compile-time constant of this module tree.
fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

/// Collapse whitespace runs to a single space and trim.
#[must_use]
pub fn clean_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The first `max` characters of `s` (never splits a code point).
#[must_use]
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Resolve `href` against `base`. Unresolvable inputs are returned unchanged.
#[must_use]
pub fn resolve_link(base: &str, href: &str) -> String {
    Url::parse(base)
        .and_then(|b| b.join(href))
        .map_or_else(|_| href.to_string(), String::from)
}
