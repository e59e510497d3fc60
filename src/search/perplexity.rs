//! Perplexity search integration.
//!
//! Perplexity answers through a chat-completions endpoint; the answer text
//! plus its citations are normalized into the common search-result shape.

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{SearchError, SearchResult};

const DEFAULT_MODEL: &str = "sonar-pro";

/// Perplexity API client.
pub struct PerplexityClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl PerplexityClient {
    /// Create a new Perplexity client.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.perplexity.ai".to_string(),
        }
    }

    /// Create with a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn request_body(&self, query: &str, params: &Map<String, Value>) -> Value {
        let model = params.get("model").and_then(Value::as_str).unwrap_or(DEFAULT_MODEL);
        json!({
            "model": model,
            "messages": [
                {
                    "role": "system",
                    "content": "Search the web and provide factual information with sources."
                },
                {"role": "user", "content": query}
            ]
        })
    }

    /// Run a single search query.
    pub async fn search(
        &self,
        query: &str,
        params: &Map<String, Value>,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&self.request_body(query, params))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status { status, body });
        }

        let response: PerplexityResponse = response.json().await?;
        let content = response
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .unwrap_or_default();
        let crawled_at = Utc::now().to_rfc3339();

        let citations = if response.citations.is_empty() {
            vec!["https://perplexity.ai".to_string()]
        } else {
            response.citations
        };

        // The first citation carries the full answer; the rest are bare links
        Ok(citations
            .into_iter()
            .enumerate()
            .map(|(index, url)| SearchResult {
                title: format!("Perplexity search, source {}", index + 1),
                url,
                content: if index == 0 { content.clone() } else { String::new() },
                score: if index == 0 { 1.0 } else { 0.5 },
                raw_content: if index == 0 { Some(content.clone()) } else { None },
                source_type: "perplexity".to_string(),
                query: query.to_string(),
                crawled_at: crawled_at.clone(),
            })
            .collect())
    }
}

/// Perplexity API response structure.
#[derive(Debug, Deserialize)]
struct PerplexityResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    citations: Vec<String>,
}

/// Choice in a Perplexity response.
#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

/// Message in a Perplexity response choice.
#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}
