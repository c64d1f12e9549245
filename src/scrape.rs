//! The scrape pipeline: fetch, extract, optionally follow product links, cache.

use std::time::Duration;

use serde::Serialize;

use crate::cache::{self, CachePaths};
use crate::config::Config;
use crate::error::Result;
use crate::extract::{discover_product_links, extract_context, extract_products};
use crate::fetch::{FetchedPage, Fetcher};
use crate::hasher::hash_bytes;
use crate::models::CacheMeta;

/// Something that can fetch a page by URL.
pub trait PageSource {
    fn fetch_page(&self, url: &str) -> Result<FetchedPage>;
}

impl PageSource for Fetcher {
    fn fetch_page(&self, url: &str) -> Result<FetchedPage> {
        self.fetch(url)
    }
}

/// Summary of a completed scrape.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeReport {
    pub url: String,
    pub context_file: String,
    pub products_file: String,
    /// Characters in the saved (possibly truncated) context.
    pub context_chars: usize,
    pub products: usize,
    /// Product-looking links that were fetched because the page had no products.
    pub followed_links: usize,
    pub content_hash: String,
    /// False when the previous scrape saw the same page body.
    pub changed: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScrapeOutcome {
    Saved(ScrapeReport),
    /// The URL served a PDF, nothing was written.
    SkippedPdf { url: String },
}

/// Scrape `url` over HTTP and cache the results.
pub fn scrape_url(config: &Config, url: &str) -> Result<ScrapeOutcome> {
    let fetcher = Fetcher::new(&config.settings.fetch)?;
    scrape_with(config, url, &fetcher)
}

/// Scrape `url` using `source` for every page fetch.
pub fn scrape_with(config: &Config, url: &str, source: &impl PageSource) -> Result<ScrapeOutcome> {
    let cache_dir = config.ensure_cache_dir()?;
    let paths = CachePaths::for_url(&cache_dir, url)?;

    tracing::info!(url, "fetching page");
    let page = source.fetch_page(url)?;
    if page.is_pdf() {
        tracing::warn!(
            url,
            "PDF detected; extraction is not supported, paste its text into {} instead",
            paths.context.display()
        );
        return Ok(ScrapeOutcome::SkippedPdf {
            url: url.to_string(),
        });
    }

    tracing::info!(bytes = page.body.len(), "parsing html");
    let extract = &config.settings.extract;
    let context = extract_context(&page.body, extract);
    let mut products = extract_products(&page.body, url, extract);

    let mut followed_links = 0;
    let fetch = &config.settings.fetch;
    if products.is_empty() && fetch.follow_product_links {
        let links = discover_product_links(&page.body, url, fetch.max_followed_links);
        tracing::info!(
            candidates = links.len(),
            "no product blocks found, scanning product-looking links"
        );
        for (i, link) in links.iter().enumerate() {
            if i > 0 && fetch.follow_delay_ms > 0 {
                std::thread::sleep(Duration::from_millis(fetch.follow_delay_ms));
            }
            match source.fetch_page(link) {
                Ok(linked) => {
                    followed_links += 1;
                    let found = extract_products(&linked.body, &linked.url, extract);
                    tracing::debug!(link = %link, found = found.len(), "followed link");
                    products.extend(found);
                }
                Err(e) => tracing::warn!(link = %link, "skipping link: {e}"),
            }
        }
    }

    let content_hash = hash_bytes(page.body.as_bytes());
    let changed = cache::load_meta(&paths.meta)
        .map_or(true, |prev| prev.content_hash != content_hash);

    let saved = cache::save_context(
        &paths.context,
        &context,
        config.settings.cache.max_context_chars,
    )?;
    cache::save_products(&paths.products, &products)?;
    let context_chars = saved.chars().count();
    cache::save_meta(
        &paths.meta,
        &CacheMeta {
            url: url.to_string(),
            content_hash: content_hash.clone(),
            context_chars,
            product_count: products.len(),
        },
    )?;

    tracing::info!(
        file = %paths.context.display(),
        chars = context_chars,
        "saved context"
    );
    tracing::info!(
        file = %paths.products.display(),
        items = products.len(),
        "saved products"
    );

    Ok(ScrapeOutcome::Saved(ScrapeReport {
        url: url.to_string(),
        context_file: paths.context.display().to_string(),
        products_file: paths.products.display().to_string(),
        context_chars,
        products: products.len(),
        followed_links,
        content_hash,
        changed,
    }))
}
