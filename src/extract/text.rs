use scraper::Html;

use super::{clean_text, selector};
use crate::config::ExtractSettings;

/// Build the context blob: an optional `HERO:` line from the first `h1`,
/// then every long-enough heading, paragraph and list item in document order.
///
/// The result is whitespace-collapsed, so block boundaries end up as single
/// spaces.
#[must_use]
pub fn extract_context(html: &str, settings: &ExtractSettings) -> String {
    let doc = Html::parse_document(html);

    let blocks = selector("h1, h2, h3, p, li");
    let texts: Vec<String> = doc
        .select(&blocks)
        .map(|el| clean_text(&el.text().collect::<String>()))
        .filter(|t| t.chars().count() >= settings.min_text_chars)
        .take(settings.max_text_blocks)
        .collect();

    let h1 = selector("h1");
    let hero = doc
        .select(&h1)
        .next()
        .map(|el| clean_text(&el.text().collect::<String>()))
        .unwrap_or_default();

    let mut content = String::new();
    if !hero.is_empty() {
        content.push_str("HERO: ");
        content.push_str(&hero);
        content.push_str("\n\n");
    }
    content.push_str(&texts.join("\n"));

    clean_text(&content)
}
