//! Question answering over a scraped page.
//!
//! Structured product data is consulted first; everything else goes through
//! keyword retrieval and the remote model.

use std::io::{BufRead, Write};

use crate::cache::{self, CachePaths};
use crate::config::Config;
use crate::error::Result;
use crate::llm::{build_prompt, Generator};
use crate::lookup::{find_products, is_price_question, price_search_key};
use crate::models::Product;
use crate::retrieve::retrieve;

/// Most matches listed for a price question.
const MAX_PRICE_MATCHES: usize = 5;

/// A reply to one user line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Answered from the cached product list.
    Scraped(String),
    /// Answered by the model (or the model's error message).
    Model(String),
    Bye,
}

impl Reply {
    /// Text printed for this reply in the interactive loop.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Scraped(text) => format!("\nBot (from scraped data):\n{text}"),
            Self::Model(text) => format!("\nBot: {text}"),
            Self::Bye => "Bye.".to_string(),
        }
    }
}

pub struct ChatSession<G> {
    context: String,
    products: Vec<Product>,
    chunk_chars: usize,
    generator: G,
}

impl<G: Generator> ChatSession<G> {
    #[must_use]
    pub fn new(context: String, products: Vec<Product>, chunk_chars: usize, generator: G) -> Self {
        Self {
            context,
            products,
            chunk_chars,
            generator,
        }
    }

    /// Load the cached context and products for `url`.
    pub fn load(config: &Config, url: &str, generator: G) -> Result<Self> {
        let paths = CachePaths::for_url(&config.cache_dir(), url)?;
        let context = cache::load_context(&paths.context)?;
        let products = cache::load_products(&paths.products);
        tracing::info!(
            context_chars = context.chars().count(),
            products = products.len(),
            "loaded cache for {}",
            paths.key
        );
        Ok(Self::new(
            context,
            products,
            config.settings.retrieval.chunk_chars,
            generator,
        ))
    }

    /// Answer a single question.
    pub fn answer(&self, question: &str) -> Reply {
        let question = question.trim();
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            return Reply::Bye;
        }

        if is_price_question(question) {
            let matches = find_products(&self.products, &price_search_key(question));
            if !matches.is_empty() {
                let lines: Vec<String> = matches
                    .iter()
                    .take(MAX_PRICE_MATCHES)
                    .map(|p| price_line(p))
                    .collect();
                return Reply::Scraped(lines.join("\n"));
            }
            return self.ask_model(question);
        }

        if let Some(p) = find_products(&self.products, question).first() {
            return Reply::Scraped(product_details(p));
        }

        self.ask_model(question)
    }

    fn ask_model(&self, question: &str) -> Reply {
        let chunk = retrieve(&self.context, question, self.chunk_chars);
        let prompt = build_prompt(chunk, question);
        match self.generator.generate(&prompt) {
            Ok(text) => Reply::Model(text),
            Err(e) => {
                tracing::warn!("model call failed: {e}");
                Reply::Model(format!("ERROR: {e}"))
            }
        }
    }

    /// Interactive loop: read questions from `input` until exit/quit or EOF.
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, mut output: W) -> Result<()> {
        writeln!(
            output,
            "[+] Loaded context and products. Start chat (type exit)."
        )?;

        let mut line = String::new();
        loop {
            write!(output, "\nYou: ")?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(output, "{}", Reply::Bye.render())?;
                return Ok(());
            }
            if line.trim().is_empty() {
                continue;
            }

            let reply = self.answer(&line);
            writeln!(output, "{}", reply.render())?;
            if reply == Reply::Bye {
                return Ok(());
            }
        }
    }
}

fn price_line(p: &Product) -> String {
    let mut line = format!("{} — {}", p.display_title(), p.display_price());
    if !p.link.is_empty() {
        line.push_str(&format!(" (link: {})", p.link));
    }
    line
}

fn product_details(p: &Product) -> String {
    let description = if p.description.is_empty() {
        String::new()
    } else {
        format!("Description: {}", p.description)
    };
    let link = if p.link.is_empty() {
        String::new()
    } else {
        format!("Link: {}", p.link)
    };
    format!(
        "{}\nPrice: {}\n{description}\n{link}",
        p.display_title(),
        p.display_price()
    )
}
