//! Reading assistant backed by a generative-text API
//!
//! The dashboard hands the user's titles and a free-text question to an
//! [`Assistant`] and shows whatever text comes back. Every failure mode of
//! the upstream call (timeout, transport, HTTP status, unexpected payload)
//! surfaces as an [`AssistantError`]. Upstream response bodies are only
//! logged, never carried in the error.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Errors from the assistant bridge
#[derive(Error, Debug, Clone)]
pub enum AssistantError {
    #[error("the assistant is not configured")]
    NotConfigured,

    #[error("the assistant did not answer within {0} seconds")]
    Timeout(u64),

    #[error("could not reach the assistant: {0}")]
    Transport(String),

    #[error("the assistant returned HTTP {0}")]
    Upstream(u16),

    #[error("the assistant returned an unexpected response")]
    MalformedResponse,
}

/// Answers questions about a reading list
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn reply(&self, books: &[String], query: &str) -> Result<String, AssistantError>;
}

/// Assistant configuration
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// API key; `None` disables the assistant
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
    /// API base URL, without the `/models/...` suffix
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl AssistantConfig {
    /// Create a new AssistantConfig from environment variables
    ///
    /// # Environment Variables
    /// - `GEMINI_API_KEY`: API key (optional; the assistant is disabled without it)
    /// - `GEMINI_MODEL`: model name (default: "gemini-1.5-flash")
    /// - `GEMINI_BASE_URL`: API base URL (default: the public v1beta endpoint)
    /// - `ASSISTANT_TIMEOUT_SECONDS`: request timeout (default: 30)
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let base_url =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let timeout_seconds = std::env::var("ASSISTANT_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        AssistantConfig {
            api_key,
            model,
            base_url,
            timeout_seconds,
        }
    }
}

/// Build the assistant matching `config`
pub fn from_config(config: AssistantConfig) -> Result<Box<dyn Assistant>> {
    match config.api_key.clone() {
        Some(api_key) => {
            info!("Assistant enabled with model {}", config.model);
            Ok(Box::new(GeminiAssistant::new(api_key, &config)?))
        }
        None => {
            warn!("GEMINI_API_KEY not set, assistant disabled");
            Ok(Box::new(DisabledAssistant))
        }
    }
}

/// Stand-in used when no API key is configured
pub struct DisabledAssistant;

#[async_trait]
impl Assistant for DisabledAssistant {
    async fn reply(&self, _books: &[String], _query: &str) -> Result<String, AssistantError> {
        Err(AssistantError::NotConfigured)
    }
}

/// Assistant calling the Gemini `generateContent` endpoint
pub struct GeminiAssistant {
    api_key: String,
    endpoint: String,
    timeout_seconds: u64,
    client: reqwest::Client,
}

impl GeminiAssistant {
    pub fn new(api_key: String, config: &AssistantConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            api_key,
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.base_url.trim_end_matches('/'),
                config.model
            ),
            timeout_seconds: config.timeout_seconds,
            client,
        })
    }

    fn classify(&self, e: reqwest::Error) -> AssistantError {
        if e.is_timeout() {
            AssistantError::Timeout(self.timeout_seconds)
        } else {
            // Strip the URL: it carries the API key as a query parameter.
            AssistantError::Transport(e.without_url().to_string())
        }
    }
}

/// Compose the prompt sent upstream
pub fn build_prompt(books: &[String], query: &str) -> String {
    let list = if books.is_empty() {
        "The user has not recorded any books yet.".to_string()
    } else {
        books
            .iter()
            .enumerate()
            .map(|(i, title)| format!("{}. {}", i + 1, title))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "You are a friendly reading assistant. These are the books the user has read:\n\
         {list}\n\n\
         Answer the user's question with their reading history in mind.\n\n\
         Question: {query}"
    )
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

fn extract_reply(response: GenerateContentResponse) -> Result<String, AssistantError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AssistantError::MalformedResponse);
    }

    Ok(text)
}

#[async_trait]
impl Assistant for GeminiAssistant {
    async fn reply(&self, books: &[String], query: &str) -> Result<String, AssistantError> {
        let payload = serde_json::json!({
            "contents": [{
                "parts": [{ "text": build_prompt(books, query) }]
            }]
        });

        let resp = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body: String = resp
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY_CHARS)
                .collect();
            warn!("Assistant returned {}: {}", status, body);
            return Err(AssistantError::Upstream(status.as_u16()));
        }

        let body: GenerateContentResponse = resp.json().await.map_err(|e| {
            if e.is_timeout() {
                AssistantError::Timeout(self.timeout_seconds)
            } else {
                AssistantError::MalformedResponse
            }
        })?;

        extract_reply(body)
    }
}
