//! Web search integration module.
//!
//! Provides the search clients used to gather supporting material for blog
//! sections, with per-provider parameter filtering and per-query outcome
//! classification. Provider selection is a closed dispatch, mirroring the
//! chat-model layer.

mod format;
mod perplexity;
mod tavily;

pub use format::{dedupe_and_format_sources, format_sections};
pub use perplexity::PerplexityClient;
pub use tavily::TavilyClient;

use std::fmt;
use std::str::FromStr;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::workflow::SearchStatus;

/// Search layer error types.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("unsupported search provider: {0}")]
    UnsupportedProvider(String),

    #[error("missing search API key for {0}")]
    MissingApiKey(&'static str),

    #[error("search request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("search provider returned status {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },
}

/// Supported search providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchProviderKind {
    Tavily,
    Perplexity,
}

impl SearchProviderKind {
    /// All supported search providers.
    pub const ALL: &'static [Self] = &[Self::Tavily, Self::Perplexity];

    /// Canonical lowercase provider name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tavily => "tavily",
            Self::Perplexity => "perplexity",
        }
    }

    /// Environment variable holding the provider's API key.
    pub fn api_key_var(self) -> &'static str {
        match self {
            Self::Tavily => "TAVILY_API_KEY",
            Self::Perplexity => "PERPLEXITY_API_KEY",
        }
    }

    /// Request parameters the provider accepts beyond the query itself.
    pub fn accepted_params(self) -> &'static [&'static str] {
        match self {
            Self::Tavily => &["max_results", "include_raw_content", "topic"],
            Self::Perplexity => &["model"],
        }
    }
}

impl FromStr for SearchProviderKind {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|provider| provider.as_str() == normalized)
            .ok_or_else(|| SearchError::UnsupportedProvider(s.to_string()))
    }
}

impl fmt::Display for SearchProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub content: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
    /// Provider that produced the hit
    pub source_type: String,
    /// Query that produced the hit
    pub query: String,
    /// RFC 3339 timestamp of when the result was fetched
    pub crawled_at: String,
}

/// Results and outcome classification for a single query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuerySearch {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub status: SearchStatus,
}

/// Filter a configuration map down to the parameters the provider accepts.
///
/// Unknown keys are dropped; an absent map yields an empty parameter set.
pub fn search_params_for(
    provider: SearchProviderKind,
    config: Option<&Map<String, Value>>,
) -> Map<String, Value> {
    let accepted = provider.accepted_params();
    let Some(config) = config else {
        return Map::new();
    };

    config
        .iter()
        .filter(|(key, _)| accepted.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

enum SearchBackend {
    Tavily(TavilyClient),
    Perplexity(PerplexityClient),
}

impl SearchBackend {
    fn build(kind: SearchProviderKind, api_key: String) -> Self {
        match kind {
            SearchProviderKind::Tavily => Self::Tavily(TavilyClient::new(api_key)),
            SearchProviderKind::Perplexity => Self::Perplexity(PerplexityClient::new(api_key)),
        }
    }

    async fn search(
        &self,
        query: &str,
        params: &Map<String, Value>,
    ) -> Result<Vec<SearchResult>, SearchError> {
        match self {
            Self::Tavily(client) => client.search(query, params).await,
            Self::Perplexity(client) => client.search(query, params).await,
        }
    }
}

/// Run every query against the selected provider concurrently.
///
/// A failing query never fails the batch: each query is classified
/// individually as success, partial (no results), or failed.
pub async fn multi_search(
    provider: &str,
    queries: &[String],
    api_key: Option<&str>,
    params: Option<&Map<String, Value>>,
) -> Result<Vec<QuerySearch>, SearchError> {
    let kind = SearchProviderKind::from_str(provider)?;
    let key = resolve_api_key(kind, api_key)?;
    let filtered = search_params_for(kind, params);
    let backend = SearchBackend::build(kind, key);

    let searches = queries.iter().map(|query| {
        let backend = &backend;
        let filtered = &filtered;
        async move {
            match backend.search(query, filtered).await {
                Ok(results) => {
                    let status = if results.is_empty() {
                        SearchStatus::Partial
                    } else {
                        SearchStatus::Success
                    };
                    QuerySearch { query: query.clone(), results, status }
                }
                Err(err) => {
                    tracing::warn!(query = %query, error = %err, "Search query failed");
                    QuerySearch { query: query.clone(), results: Vec::new(), status: SearchStatus::Failed }
                }
            }
        }
    });

    Ok(join_all(searches).await)
}

/// Resolve the API key: an explicit key wins, then the provider's
/// environment variable.
fn resolve_api_key(
    kind: SearchProviderKind,
    explicit: Option<&str>,
) -> Result<String, SearchError> {
    if let Some(key) = explicit.filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }
    std::env::var(kind.api_key_var())
        .ok()
        .filter(|k| !k.is_empty())
        .ok_or(SearchError::MissingApiKey(kind.api_key_var()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_parse_is_case_insensitive() {
        assert_eq!("Tavily".parse::<SearchProviderKind>().unwrap(), SearchProviderKind::Tavily);
        assert_eq!(
            "PERPLEXITY".parse::<SearchProviderKind>().unwrap(),
            SearchProviderKind::Perplexity
        );
    }

    #[test]
    fn test_provider_parse_rejects_unknown() {
        let err = "bing".parse::<SearchProviderKind>().unwrap_err();
        assert!(err.to_string().contains("bing"));
    }

    #[test]
    fn test_search_params_drop_unknown_keys() {
        let mut config = Map::new();
        config.insert("max_results".to_string(), json!(10));
        config.insert("depth".to_string(), json!("advanced"));

        let params = search_params_for(SearchProviderKind::Tavily, Some(&config));
        assert_eq!(params.len(), 1);
        assert_eq!(params["max_results"], json!(10));
    }

    #[test]
    fn test_search_params_without_config() {
        let params = search_params_for(SearchProviderKind::Perplexity, None);
        assert!(params.is_empty());
    }

    #[test]
    fn test_multi_search_rejects_unknown_provider() {
        let queries = vec!["rust async".to_string()];
        let err = tokio_test::block_on(multi_search("bing", &queries, Some("key"), None))
            .unwrap_err();
        assert!(matches!(err, SearchError::UnsupportedProvider(ref p) if p == "bing"));
    }
}
