//! Chat-completion client backing the expert panel. Bearer auth against an
//! OpenAI-compatible endpoint.

use config::ExpertsConfig;
use reqwest::Url;
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::json;

use crate::{
    error::{Result, UpstreamError},
    http::{Auth, FetchClient, decode},
};

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for the configured chat-completions endpoint.
#[derive(Clone)]
pub struct ExpertClient {
    fetch: FetchClient,
    base_url: String,
    api_key: Option<SecretString>,
    model: String,
    temperature: f64,
}

impl ExpertClient {
    pub(crate) fn new(fetch: FetchClient, config: &ExpertsConfig) -> Self {
        Self {
            fetch,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }

    /// Whether a key is configured; reported by the health tool.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// The configured model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// One chat completion; returns the first choice's content.
    pub async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let key = self
            .api_key
            .as_ref()
            .ok_or(UpstreamError::Credential { provider: "llm" })?;

        let url = Url::parse(&format!("{}/chat/completions", self.base_url)).map_err(|_| {
            UpstreamError::Transient {
                reason: "invalid upstream URL for /chat/completions".to_string(),
            }
        })?;

        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": self.temperature,
            "max_tokens": max_tokens,
        });

        let value = self.fetch.post_json(url, &body, Auth::Bearer(key)).await?;
        let response: ChatResponse = decode(value)?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(UpstreamError::Decode {
                reason: "chat completion had no content".to_string(),
            })
    }
}
