//! Prompt construction and the remote text-generation client.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;

use crate::config::{ModelSettings, API_KEY_ENV};
use crate::error::{Result, SiteChatError};

/// Prefix of the placeholder key shipped in sample configs.
const PLACEHOLDER_KEY_PREFIX: &str = "hf_xxx";

/// Build the grounded-answer prompt for one question.
#[must_use]
pub fn build_prompt(context_chunk: &str, question: &str) -> String {
    format!(
        "You are a helpful assistant. Use ONLY the website context below to answer the user's question. \
         If the answer is not present in the context say 'I couldn't find that on the website.' \
         Keep the answer concise.\n\n\
         Website context:\n{context_chunk}\n\nUser: {question}\nAssistant:"
    )
}

/// Turns a prompt into generated text.
pub trait Generator {
    fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
    temperature: f32,
}

/// Client for a Hugging Face style inference endpoint.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    max_new_tokens: u32,
    temperature: f32,
}

impl InferenceClient {
    pub fn new(settings: &ModelSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        let api_key = settings
            .resolved_api_key()
            .filter(|k| !k.trim().is_empty() && !k.starts_with(PLACEHOLDER_KEY_PREFIX));
        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key,
            max_new_tokens: settings.max_new_tokens,
            temperature: settings.temperature,
        })
    }
}

impl Generator for InferenceClient {
    fn generate(&self, prompt: &str) -> Result<String> {
        let Some(api_key) = &self.api_key else {
            return Err(SiteChatError::Model(format!(
                "set {API_KEY_ENV} (or model.api_key in .sitechat/config.toml) before chatting"
            )));
        };

        let request = GenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters {
                max_new_tokens: self.max_new_tokens,
                temperature: self.temperature,
            },
        };

        tracing::debug!(endpoint = %self.endpoint, prompt_chars = prompt.len(), "querying model");
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .map_err(|e| SiteChatError::Model(format!("request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| SiteChatError::Model(format!("cannot read response: {e}")))?;
        if status.as_u16() != 200 {
            return Err(SiteChatError::Model(format!(
                "endpoint returned {}: {body}",
                status.as_u16()
            )));
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| SiteChatError::Model(format!("parse failed: {e}")))?;
        Ok(parse_generation(&value))
    }
}

/// Pull `generated_text` out of an inference response.
///
/// Accepts `[{"generated_text": ..}, ..]` or `{"generated_text": ..}`; any
/// other shape is returned as compact JSON.
#[must_use]
pub fn parse_generation(value: &Value) -> String {
    let generated = match value {
        Value::Array(items) => items.first().and_then(|first| first.get("generated_text")),
        Value::Object(_) => value.get("generated_text"),
        _ => None,
    };
    match generated {
        Some(Value::String(text)) => text.trim().to_string(),
        Some(other) => other.to_string(),
        None => value.to_string(),
    }
}
