use serde::{Deserialize, Serialize};

/// Bookkeeping written next to the cached context for each scraped URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMeta {
    /// URL that was scraped.
    pub url: String,
    /// SHA-256 of the fetched page body.
    pub content_hash: String,
    /// Characters in the saved context (after truncation).
    pub context_chars: usize,
    pub product_count: usize,
}
