//! Structured lookups against the cached product list.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::Product;

/// Lower-case fragments that mark a question as being about price.
const PRICE_KEYWORDS: &[&str] = &[
    "price", "cost", "how much", "price of", "rate", "₹", "rs ", "rs.", "rupees",
];

/// Query words shorter than this never match a title on their own.
const MIN_WORD_CHARS: usize = 3;

static PRICE_OF_RE: OnceLock<Regex> = OnceLock::new();

#[must_use]
pub fn is_price_question(question: &str) -> bool {
    let lower = question.to_lowercase();
    PRICE_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// The product name after "price of", or the whole lower-cased question.
#[must_use]
pub fn price_search_key(question: &str) -> String {
    let lower = question.to_lowercase();
    let re = PRICE_OF_RE.get_or_init(|| Regex::new(r"price of (.+)").expect("price-of regex is valid"));
    re.captures(&lower)
        .and_then(|c| c.get(1))
        .map_or_else(|| lower.clone(), |m| m.as_str().trim().to_string())
}

/// Products whose title or description contains `query`, or whose title
/// contains any query word of three or more characters. Order is preserved.
#[must_use]
pub fn find_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    let words: Vec<&str> = query
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| w.chars().count() >= MIN_WORD_CHARS)
        .collect();

    products
        .iter()
        .filter(|p| {
            let title = p.title.to_lowercase();
            let desc = p.description.to_lowercase();
            title.contains(&query)
                || desc.contains(&query)
                || words.iter().any(|w| title.contains(w))
        })
        .collect()
}
