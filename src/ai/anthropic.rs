//! Anthropic API integration.
//!
//! Implements the ChatModel trait for Claude models, including the
//! extended-thinking request parameters used by the section grader.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{ChatModel, ModelSettings};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// The messages API requires max_tokens; used when the caller sets none.
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Anthropic messages backend.
#[derive(Debug)]
pub struct AnthropicModel {
    client: Client,
    api_key: Option<String>,
    model: String,
    settings: ModelSettings,
    base_url: String,
}

impl AnthropicModel {
    /// Create a new Anthropic model client.
    ///
    /// Reads the API key from the ANTHROPIC_API_KEY environment variable; a
    /// missing key only fails once a request is made.
    pub fn new(model: impl Into<String>, settings: ModelSettings) -> Self {
        Self {
            client: Client::new(),
            api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
            model: model.into(),
            settings,
            base_url: "https://api.anthropic.com".to_string(),
        }
    }

    /// Create with an explicit API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Create with a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn request_body(&self, system: &str, user: &str) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("model".to_string(), json!(self.model));
        body.insert(
            "max_tokens".to_string(),
            json!(self.settings.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)),
        );
        body.insert("system".to_string(), json!(system));
        body.insert("messages".to_string(), json!([{"role": "user", "content": user}]));
        if let Some(thinking) = &self.settings.thinking {
            // Thinking requests reject explicit temperature
            body.insert("thinking".to_string(), json!(thinking));
        } else {
            body.insert("temperature".to_string(), json!(self.settings.temperature));
        }
        for (key, value) in &self.settings.extra {
            body.insert(key.clone(), value.clone());
        }
        body
    }

    /// Make a request to the Anthropic messages API.
    async fn request(&self, system: &str, user: &str) -> anyhow::Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("ANTHROPIC_API_KEY not set"))?;

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&self.request_body(system, user))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Anthropic API error ({}): {}", status, body);
        }

        let response: AnthropicResponse = response.json().await?;

        // Thinking responses interleave thinking blocks with text blocks
        response
            .content
            .into_iter()
            .find_map(|block| {
                let text = block.text?;
                if text.is_empty() {
                    None
                } else {
                    Some(text)
                }
            })
            .ok_or_else(|| anyhow::anyhow!("No response from Anthropic"))
    }
}

#[async_trait]
impl ChatModel for AnthropicModel {
    async fn invoke(&self, system: &str, user: &str) -> anyhow::Result<String> {
        self.request(system, user).await
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

/// Anthropic API response structure.
#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

/// Content block in an Anthropic response.
#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ThinkingConfig;

    #[test]
    fn test_request_body_defaults_max_tokens() {
        let model = AnthropicModel::new("claude-3-7-sonnet-latest", ModelSettings::default());
        let body = model.request_body("system", "user");
        assert_eq!(body["max_tokens"], 1024);
        assert_eq!(body["system"], "system");
        assert!(body.contains_key("temperature"));
        assert!(!body.contains_key("thinking"));
    }

    #[test]
    fn test_request_body_with_thinking_drops_temperature() {
        let settings =
            ModelSettings::default().with_max_tokens(20_000).with_thinking(ThinkingConfig::enabled(16_000));
        let model = AnthropicModel::new("claude-3-7-sonnet-latest", settings);
        let body = model.request_body("system", "user");

        assert_eq!(body["max_tokens"], 20_000);
        assert_eq!(body["thinking"]["type"], "enabled");
        assert_eq!(body["thinking"]["budget_tokens"], 16_000);
        assert!(!body.contains_key("temperature"));
    }

    #[test]
    fn test_response_parsing_skips_textless_blocks() {
        let raw = r#"{"content": [{"type": "thinking"}, {"type": "text", "text": "answer"}]}"#;
        let response: AnthropicResponse = serde_json::from_str(raw).unwrap();
        let text = response.content.into_iter().find_map(|b| b.text).unwrap();
        assert_eq!(text, "answer");
    }
}
