//! Blocking page fetch.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

use crate::config::FetchSettings;
use crate::error::{Result, SiteChatError};

/// A fetched page body plus the bits of the response the pipeline cares about.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after redirects.
    pub url: String,
    /// `content-type` header, empty if absent.
    pub content_type: String,
    pub body: String,
}

impl FetchedPage {
    #[must_use]
    pub fn is_pdf(&self) -> bool {
        self.content_type
            .to_ascii_lowercase()
            .contains("application/pdf")
    }
}

/// HTTP client configured from `[fetch]` settings.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    /// GET `url`; any non-2xx status is an error.
    pub fn fetch(&self, url: &str) -> Result<FetchedPage> {
        tracing::debug!(url, "fetching");
        let resp = self.client.get(url).send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SiteChatError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = resp.url().to_string();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let body = resp.text()?;

        Ok(FetchedPage {
            url: final_url,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(content_type: &str) -> FetchedPage {
        FetchedPage {
            url: "https://example.com/".into(),
            content_type: content_type.into(),
            body: String::new(),
        }
    }

    #[test]
    fn pdf_detection_is_case_insensitive() {
        assert!(page("application/pdf").is_pdf());
        assert!(page("Application/PDF; charset=binary").is_pdf());
        assert!(!page("text/html; charset=utf-8").is_pdf());
        assert!(!page("").is_pdf());
    }

    #[test]
    fn fetcher_builds_from_default_settings() {
        assert!(Fetcher::new(&FetchSettings::default()).is_ok());
    }
}
