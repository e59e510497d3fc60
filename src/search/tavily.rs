//! Tavily search API integration.

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{SearchError, SearchResult};

/// Tavily REST API client.
pub struct TavilyClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TavilyClient {
    /// Create a new Tavily client.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.tavily.com".to_string(),
        }
    }

    /// Create with a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn request_body(&self, query: &str, params: &Map<String, Value>) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("api_key".to_string(), json!(self.api_key));
        body.insert("query".to_string(), json!(query));
        body.insert("max_results".to_string(), json!(5));
        body.insert("include_raw_content".to_string(), json!(true));
        // Caller params override the defaults
        for (key, value) in params {
            body.insert(key.clone(), value.clone());
        }
        body
    }

    /// Run a single search query.
    pub async fn search(
        &self,
        query: &str,
        params: &Map<String, Value>,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .header("Content-Type", "application/json")
            .json(&self.request_body(query, params))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status { status, body });
        }

        let response: TavilyResponse = response.json().await?;
        let crawled_at = Utc::now().to_rfc3339();

        Ok(response
            .results
            .into_iter()
            .map(|hit| SearchResult {
                title: hit.title,
                url: hit.url,
                content: hit.content,
                score: hit.score,
                raw_content: hit.raw_content.filter(|raw| !raw.is_empty()),
                source_type: "tavily".to_string(),
                query: query.to_string(),
                crawled_at: crawled_at.clone(),
            })
            .collect())
    }
}

/// Tavily API response structure.
#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyHit>,
}

/// Single hit in a Tavily response.
#[derive(Debug, Deserialize)]
struct TavilyHit {
    #[serde(default)]
    title: String,
    url: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    score: f64,
    #[serde(default)]
    raw_content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_defaults() {
        let client = TavilyClient::new("key");
        let body = client.request_body("rust web frameworks", &Map::new());
        assert_eq!(body["query"], "rust web frameworks");
        assert_eq!(body["max_results"], 5);
        assert_eq!(body["include_raw_content"], true);
    }

    #[test]
    fn test_request_body_params_override_defaults() {
        let client = TavilyClient::new("key");
        let mut params = Map::new();
        params.insert("max_results".to_string(), json!(2));
        let body = client.request_body("q", &params);
        assert_eq!(body["max_results"], 2);
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{"results": [{"title": "t", "url": "https://a", "content": "c", "score": 0.9, "raw_content": null}]}"#;
        let response: TavilyResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].url, "https://a");
        assert!(response.results[0].raw_content.is_none());
    }
}
