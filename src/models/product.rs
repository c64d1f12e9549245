use serde::{Deserialize, Serialize};

/// A product-like record scraped from a page block.
///
/// Every field may be empty: the extraction heuristics keep blocks that have
/// either a usable title or a long enough description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub title: String,
    pub price: String,
    pub description: String,
    /// Absolute URL of the first link in the block.
    pub link: String,
}

impl Product {
    /// Title to show in replies.
    #[must_use]
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "Item"
        } else {
            &self.title
        }
    }

    /// Price to show in replies.
    #[must_use]
    pub fn display_price(&self) -> &str {
        if self.price.is_empty() {
            "Price not found"
        } else {
            &self.price
        }
    }
}
