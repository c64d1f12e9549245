use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteChatError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("invalid url {url}: {detail}")]
    InvalidUrl { url: String, detail: String },

    #[error("context not found at {path}: run `sitechat scrape` first")]
    ContextNotFound { path: String },

    #[error("model error: {0}")]
    Model(String),

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SiteChatError>;
