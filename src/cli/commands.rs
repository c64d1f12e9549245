use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sitechat",
    version,
    about = "Scrape a web page into a local cache and chat about it",
    after_help = "Cached files live in ./cached_contexts (see [cache] in .sitechat/config.toml). \
                  Questions the cached products cannot answer are sent to the inference \
                  endpoint configured under [model]; set HF_API_KEY for it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch a page, extract its context and products, and cache them.
    ///
    /// If the page has no product-like blocks, a handful of product-looking
    /// links on it are fetched as well.
    Scrape {
        /// URL to scrape (prompted for on stdin when omitted)
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Interactive chat over a previously scraped page
    Chat {
        /// URL whose cached context to use (prompted for on stdin when omitted)
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Answer a single question over a previously scraped page
    Ask {
        /// URL whose cached context to use
        #[arg(short, long)]
        url: String,
        /// The question
        question: String,
    },

    /// Print the cached products for a URL
    Products {
        /// URL whose cached products to print
        #[arg(short, long)]
        url: String,
    },
}
