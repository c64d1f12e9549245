use scraper::Html;

use super::{resolve_link, selector};

/// Substrings of an href that suggest a product or listing page.
const PRODUCT_LINK_HINTS: &[&str] = &[
    "/product",
    "/shop",
    "/item",
    "/catalog",
    "productid",
    "/collections",
];

/// Collect up to `limit` distinct absolute URLs that look like product pages,
/// in document order.
#[must_use]
pub fn discover_product_links(html: &str, base_url: &str, limit: usize) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    if limit == 0 {
        return links;
    }

    let doc = Html::parse_document(html);
    let anchors = selector("a[href]");
    for a in doc.select(&anchors) {
        let Some(href) = a.value().attr("href") else {
            continue;
        };
        let lower = href.to_lowercase();
        if PRODUCT_LINK_HINTS.iter().any(|hint| lower.contains(hint)) {
            let full = resolve_link(base_url, href);
            if !links.contains(&full) {
                links.push(full);
            }
        }
        if links.len() >= limit {
            break;
        }
    }
    links
}
