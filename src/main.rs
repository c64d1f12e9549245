// Inherit lint configuration from lib.rs for consistency
#![allow(clippy::missing_errors_doc, clippy::needless_pass_by_value)]

use std::io::{BufRead, Write};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sitechat::cache::{self, CachePaths};
use sitechat::chat::ChatSession;
use sitechat::cli::commands::{Cli, Command};
use sitechat::cli::output;
use sitechat::config::Config;
use sitechat::llm::InferenceClient;
use sitechat::scrape;

fn main() {
    // Logs go to stderr; stdout carries reports and chat replies.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sitechat=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CmdResult {
    match cli.command {
        Command::Scrape { url } => cmd_scrape(url),
        Command::Chat { url } => cmd_chat(url),
        Command::Ask { url, question } => cmd_ask(&url, &question),
        Command::Products { url } => cmd_products(&url),
    }
}

type CmdResult = Result<(), Box<dyn std::fmt::Display>>;

fn map_err(e: impl std::fmt::Display + 'static) -> Box<dyn std::fmt::Display> {
    Box::new(e.to_string())
}

fn get_config() -> Result<Config, Box<dyn std::fmt::Display>> {
    Config::from_cwd().map_err(map_err)
}

/// Use `url` if given, else ask for one on stdin. `None` means nothing was entered.
fn resolve_url(
    url: Option<String>,
    prompt: &str,
) -> Result<Option<String>, Box<dyn std::fmt::Display>> {
    if let Some(url) = url {
        return Ok(Some(url.trim().to_string()).filter(|u| !u.is_empty()));
    }

    let mut stdout = std::io::stdout();
    write!(stdout, "{prompt}").map_err(map_err)?;
    stdout.flush().map_err(map_err)?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line).map_err(map_err)?;
    let url = line.trim().to_string();
    Ok(Some(url).filter(|u| !u.is_empty()))
}

fn cmd_scrape(url: Option<String>) -> CmdResult {
    let Some(url) = resolve_url(url, "Enter URL to scrape: ")? else {
        println!("No URL provided. Exiting.");
        return Ok(());
    };
    let config = get_config()?;
    let outcome = scrape::scrape_url(&config, &url).map_err(map_err)?;
    println!("{}", output::format_json(&outcome));
    Ok(())
}

fn cmd_chat(url: Option<String>) -> CmdResult {
    let Some(url) = resolve_url(url, "Enter URL whose context to use: ")? else {
        println!("No URL provided. Exiting.");
        return Ok(());
    };
    let config = get_config()?;
    let generator = InferenceClient::new(&config.settings.model).map_err(map_err)?;
    let session = ChatSession::load(&config, &url, generator).map_err(map_err)?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    session.run(stdin.lock(), stdout.lock()).map_err(map_err)
}

fn cmd_ask(url: &str, question: &str) -> CmdResult {
    let config = get_config()?;
    let generator = InferenceClient::new(&config.settings.model).map_err(map_err)?;
    let session = ChatSession::load(&config, url, generator).map_err(map_err)?;
    println!("{}", session.answer(question).render().trim_start());
    Ok(())
}

fn cmd_products(url: &str) -> CmdResult {
    let config = get_config()?;
    let paths = CachePaths::for_url(&config.cache_dir(), url).map_err(map_err)?;
    // Only report products for pages that were actually scraped.
    cache::load_context(&paths.context).map_err(map_err)?;
    let products = cache::load_products(&paths.products);
    println!("{}", output::format_json(&products));
    Ok(())
}
