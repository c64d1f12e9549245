use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html};

use super::{clean_text, resolve_link, selector, truncate_chars};
use crate::config::ExtractSettings;
use crate::models::Product;

/// Blocks whose class or id hints at a product card.
const CANDIDATE_SELECTORS: &[&str] = &[
    "[class*='product']",
    "[class*='Product']",
    "[class*='item']",
    "[class*='card']",
    "[class*='listing']",
    "[id*='product']",
];

/// Characters of the title (or description) used as the dedup key.
const KEY_CHARS: usize = 120;

static PRICE_RE: OnceLock<Regex> = OnceLock::new();

/// Rupee, `Rs`/`Rs.`, dollar or trailing `INR` amounts.
fn price_pattern() -> &'static Regex {
    PRICE_RE.get_or_init(|| {
        Regex::new(
            r"(?i)(?:₹\s?|\bRs\.?\s?|\$\s?)\d(?:[\d,]*\d)?(?:\.\d+)?|\d(?:[\d,]*\d)?(?:\.\d+)?\s?INR\b",
        )
        .expect("price regex is valid")
    })
}

/// First price-looking substring of `text`.
#[must_use]
pub fn find_price(text: &str) -> Option<&str> {
    price_pattern().find(text).map(|m| m.as_str())
}

/// Extract product-like records from `html`, resolving links against `base_url`.
#[must_use]
pub fn extract_products(html: &str, base_url: &str, settings: &ExtractSettings) -> Vec<Product> {
    let doc = Html::parse_document(html);
    let blocks = candidate_blocks(&doc, settings.fallback_block_limit);

    let mut found = Vec::new();
    let mut seen_keys = HashSet::new();

    for block in blocks {
        let product = read_block(block, base_url, settings);

        let key_source = if product.title.is_empty() {
            &product.description
        } else {
            &product.title
        };
        let key = truncate_chars(key_source, KEY_CHARS).to_string();

        let meaningful = product.title.chars().count() > 3
            || product.description.chars().count() > 30;
        if !key.is_empty() && meaningful && seen_keys.insert(key) {
            found.push(product);
        }
    }

    dedup_by_title(found)
}

/// Candidate blocks in selector order, then `article`s. Falls back to the
/// first `fallback_limit` div/section elements when nothing matched.
fn candidate_blocks(doc: &Html, fallback_limit: usize) -> Vec<ElementRef<'_>> {
    let mut blocks = Vec::new();
    for &css in CANDIDATE_SELECTORS {
        blocks.extend(doc.select(&selector(css)));
    }
    blocks.extend(doc.select(&selector("article")));

    if blocks.is_empty() {
        blocks.extend(doc.select(&selector("div, section")).take(fallback_limit));
    }
    blocks
}

fn read_block(block: ElementRef<'_>, base_url: &str, settings: &ExtractSettings) -> Product {
    let title_sel = selector("h1, h2, h3, h4, strong");
    let title = block
        .select(&title_sel)
        .find(|el| el.id() != block.id())
        .map(|el| clean_text(&el.text().collect::<String>()))
        .unwrap_or_default();

    let block_text = clean_text(
        &block
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
    );

    let price = find_price(&block_text).unwrap_or_default().to_string();

    let description = if title.is_empty() {
        truncate_chars(&block_text, settings.description_chars).to_string()
    } else {
        let rest = block_text.replacen(&title, "", 1);
        truncate_chars(rest.trim(), settings.description_chars).to_string()
    };

    let link_sel = selector("a[href]");
    let link = block
        .select(&link_sel)
        .find(|el| el.id() != block.id())
        .and_then(|a| a.value().attr("href"))
        .map(|href| {
            if href.starts_with("http") {
                href.to_string()
            } else {
                resolve_link(base_url, href)
            }
        })
        .unwrap_or_default();

    Product {
        title,
        price,
        description,
        link,
    }
}

/// Drop records whose lower-cased, non-empty title was already seen.
fn dedup_by_title(products: Vec<Product>) -> Vec<Product> {
    let mut titles = HashSet::new();
    products
        .into_iter()
        .filter(|p| {
            let t = p.title.to_lowercase();
            t.is_empty() || titles.insert(t)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://shop.example.com/";

    fn settings() -> ExtractSettings {
        ExtractSettings::default()
    }

    #[test]
    fn price_pattern_variants() {
        assert_eq!(find_price("Only ₹ 1,499 today"), Some("₹ 1,499"));
        assert_eq!(find_price("Costs Rs. 2,999 per month"), Some("Rs. 2,999"));
        assert_eq!(find_price("rs 450 flat"), Some("rs 450"));
        assert_eq!(find_price("Starter $49.99/mo"), Some("$49.99"));
        assert_eq!(find_price("Billed 12,000 INR yearly"), Some("12,000 INR"));
        assert_eq!(find_price("From ₹999, cancel anytime"), Some("₹999"));
    }

    #[test]
    fn price_pattern_ignores_words_ending_in_rs() {
        assert_eq!(find_price("open 24 hours 7 days"), None);
        assert_eq!(find_price("no price here"), None);
    }

    #[test]
    fn extracts_product_cards() {
        let html = r#"
            <div class="product-card">
              <h3>Starter Plan</h3>
              <p>Great for small teams getting started.</p>
              <span class="price">₹2,499</span>
              <a href="/plans/starter">Details</a>
            </div>
            <div class="product-card">
              <h3>Pro Plan</h3>
              <p>Everything in Starter plus analytics.</p>
              <span class="price">₹7,999</span>
              <a href="https://other.example.com/pro">Details</a>
            </div>"#;
        let products = extract_products(html, BASE, &settings());
        assert_eq!(products.len(), 2);

        assert_eq!(products[0].title, "Starter Plan");
        assert_eq!(products[0].price, "₹2,499");
        assert_eq!(
            products[0].description,
            "Great for small teams getting started. ₹2,499 Details"
        );
        assert_eq!(products[0].link, "https://shop.example.com/plans/starter");

        assert_eq!(products[1].title, "Pro Plan");
        assert_eq!(products[1].link, "https://other.example.com/pro");
    }

    #[test]
    fn overlapping_selectors_are_deduplicated() {
        // Matches both [class*='product'] and [class*='card'].
        let html = r#"<div class="product card"><h2>Widget Deluxe</h2><p>$19</p></div>"#;
        let products = extract_products(html, BASE, &settings());
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].price, "$19");
    }

    #[test]
    fn duplicate_titles_differing_in_case_are_dropped() {
        let html = r#"
            <article><h2>Chat Widget</h2><p>first listing text</p></article>
            <article><h2>CHAT WIDGET</h2><p>second listing text</p></article>"#;
        let products = extract_products(html, BASE, &settings());
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].description, "first listing text");
    }

    #[test]
    fn untitled_block_needs_long_description() {
        let html = r#"
            <div class="item">tiny</div>
            <div class="item">An untitled block with enough text to be kept around.</div>"#;
        let products = extract_products(html, BASE, &settings());
        assert_eq!(products.len(), 1);
        assert!(products[0].title.is_empty());
        assert!(products[0].description.starts_with("An untitled block"));
    }

    #[test]
    fn falls_back_to_divs_without_candidates() {
        let html = r#"<div><strong>Fallback Offer</strong> only Rs 99</div>"#;
        let products = extract_products(html, BASE, &settings());
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].title, "Fallback Offer");
        assert_eq!(products[0].price, "Rs 99");
        assert_eq!(products[0].description, "only Rs 99");
    }

    #[test]
    fn fallback_scans_only_the_first_blocks() {
        let mut s = settings();
        s.fallback_block_limit = 2;
        let html: String = (1..=5)
            .map(|i| format!("<div><h2>Seasonal Offer {i}</h2></div>"))
            .collect();
        let products = extract_products(&html, BASE, &s);
        let titles: Vec<&str> = products.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["Seasonal Offer 1", "Seasonal Offer 2"]);
    }

    #[test]
    fn product_id_marks_a_candidate() {
        let html = r#"
            <div><h2>Navigation Heading</h2></div>
            <section id="main-product"><h2>Hero Bundle</h2><p>Now ₹999</p></section>"#;
        let products = extract_products(html, BASE, &settings());
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].title, "Hero Bundle");
        assert_eq!(products[0].price, "₹999");
    }

    #[test]
    fn titles_sharing_a_long_prefix_collapse() {
        let prefix = "Handmade ceramic ".repeat(10);
        assert!(prefix.chars().count() > KEY_CHARS);
        let html = format!(
            r#"<div class="card"><h3>{prefix}mug</h3></div>
               <div class="card"><h3>{prefix}bowl</h3></div>
               <div class="card"><h3>Glazed Teapot</h3></div>"#
        );
        let products = extract_products(&html, BASE, &settings());
        assert_eq!(products.len(), 2);
        assert!(products[0].title.ends_with("mug"));
        assert_eq!(products[1].title, "Glazed Teapot");
    }

    #[test]
    fn block_own_link_and_heading_are_not_used() {
        let html = r#"
            <a class="card" href="/promo"><strong>Promo Bundle</strong> only $5</a>
            <h2 class="product-heading">Our handpicked catalogue of brass lighting</h2>"#;
        let products = extract_products(html, BASE, &settings());
        assert_eq!(products.len(), 2);

        // [class*='product'] is scanned before [class*='card'].
        assert!(products[0].title.is_empty());
        assert_eq!(
            products[0].description,
            "Our handpicked catalogue of brass lighting"
        );

        assert_eq!(products[1].title, "Promo Bundle");
        assert_eq!(products[1].price, "$5");
        assert!(products[1].link.is_empty());
    }

    #[test]
    fn description_is_truncated() {
        let mut s = settings();
        s.description_chars = 10;
        let html = r#"<div class="card"><h4>Long One</h4><p>abcdefghijklmnopqrstuvwxyz</p></div>"#;
        let products = extract_products(html, BASE, &s);
        assert_eq!(products[0].description, "abcdefghij");
    }

    #[test]
    fn nothing_found_in_plain_page() {
        let html = "<p>hi</p>";
        assert!(extract_products(html, BASE, &settings()).is_empty());
    }
}
