// Pedantic lint configuration for the crate.
// - missing_errors_doc: Error handling is self-evident from Result types
// - missing_panics_doc: Only static regexes/selectors can panic
// - module_name_repetitions: `ScrapeReport` in `scrape` reads better than `Report`
// - needless_pass_by_value: CLI arguments are owned by clap anyway
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::needless_pass_by_value
)]

pub mod cache;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod hasher;
pub mod llm;
pub mod lookup;
pub mod models;
pub mod retrieve;
pub mod scrape;
