//! OpenAI API integration.
//!
//! Implements the ChatModel trait for OpenAI chat-completion models.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{ChatModel, ModelSettings};

/// OpenAI chat-completions backend.
#[derive(Debug)]
pub struct OpenAiModel {
    client: Client,
    api_key: Option<String>,
    model: String,
    settings: ModelSettings,
    base_url: String,
}

impl OpenAiModel {
    /// Create a new OpenAI model client.
    ///
    /// Reads the API key from the OPENAI_API_KEY environment variable; a
    /// missing key only fails once a request is made.
    pub fn new(model: impl Into<String>, settings: ModelSettings) -> Self {
        Self {
            client: Client::new(),
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            model: model.into(),
            settings,
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Create with an explicit API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Create with a custom base URL (for Azure OpenAI or compatible APIs).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn request_body(&self, system: &str, user: &str) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("model".to_string(), json!(self.model));
        body.insert(
            "messages".to_string(),
            json!([
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ]),
        );
        body.insert("temperature".to_string(), json!(self.settings.temperature));
        if let Some(max_tokens) = self.settings.max_tokens {
            body.insert("max_tokens".to_string(), json!(max_tokens));
        }
        for (key, value) in &self.settings.extra {
            body.insert(key.clone(), value.clone());
        }
        body
    }

    /// Make a request to the OpenAI API.
    async fn request(&self, system: &str, user: &str) -> anyhow::Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY not set"))?;

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&self.request_body(system, user))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API error ({}): {}", status, body);
        }

        let response: OpenAiResponse = response.json().await?;

        response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("No response from OpenAI"))
    }
}

#[async_trait]
impl ChatModel for OpenAiModel {
    async fn invoke(&self, system: &str, user: &str) -> anyhow::Result<String> {
        self.request(system, user).await
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// OpenAI API response structure.
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<Choice>,
}

/// Choice in an OpenAI response.
#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

/// Message in an OpenAI response choice.
#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let settings = ModelSettings::default().with_max_tokens(1024);
        let model = OpenAiModel::new("gpt-4", settings).with_api_key("test-key");
        let body = model.request_body("system prompt", "user prompt");

        assert_eq!(body["model"], "gpt-4");
        assert_eq!(body["max_tokens"], 1024);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "user prompt");
    }

    #[test]
    fn test_extra_params_are_merged() {
        let settings = ModelSettings::default().with_extra("top_p", json!(0.9));
        let model = OpenAiModel::new("gpt-4", settings);
        let body = model.request_body("s", "u");
        assert_eq!(body["top_p"], json!(0.9));
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{"choices": [{"message": {"role": "assistant", "content": "hi"}}]}"#;
        let response: OpenAiResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.choices[0].message.content, "hi");
    }
}
