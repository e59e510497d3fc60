//! Chat-model integration module.
//!
//! Provides a thin adapter over hosted chat-model providers. Model selection
//! is a closed dispatch: one variant per supported provider, resolved from
//! the provider string carried by the run configuration.

mod anthropic;
mod openai;

pub use anthropic::AnthropicModel;
pub use openai::OpenAiModel;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Model layer error types.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("unsupported model provider: {0}")]
    UnsupportedProvider(String),
}

/// Supported chat-model providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
}

impl Provider {
    /// All supported providers, in dispatch order.
    pub const ALL: &'static [Self] = &[Self::OpenAi, Self::Anthropic];

    /// Canonical lowercase provider name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        }
    }

    /// Environment variable holding the provider's API key.
    pub fn api_key_var(self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

impl FromStr for Provider {
    type Err = ModelError;

    /// Parse a provider name case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|provider| provider.as_str() == normalized)
            .ok_or_else(|| ModelError::UnsupportedProvider(s.to_string()))
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extended-thinking request parameters, forwarded to Anthropic models.
#[derive(Debug, Clone, Serialize)]
pub struct ThinkingConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub budget_tokens: u32,
}

impl ThinkingConfig {
    /// Enable thinking with the given token budget.
    pub fn enabled(budget_tokens: u32) -> Self {
        Self { kind: "enabled".to_string(), budget_tokens }
    }
}

/// Settings forwarded to the provider backend.
///
/// Temperature, token bounds, and extra parameters are passed through as-is;
/// range validation is the provider's responsibility.
#[derive(Debug, Clone)]
pub struct ModelSettings {
    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,

    /// Extended-thinking parameters (Anthropic only)
    pub thinking: Option<ThinkingConfig>,

    /// Extra provider-specific request parameters, merged into the request
    /// body verbatim
    pub extra: Map<String, Value>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self { temperature: 0.7, max_tokens: None, thinking: None, extra: Map::new() }
    }
}

impl ModelSettings {
    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the maximum token count.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set extended-thinking parameters.
    pub fn with_thinking(mut self, thinking: ThinkingConfig) -> Self {
        self.thinking = Some(thinking);
        self
    }

    /// Add an extra provider-specific request parameter.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Trait for chat-model backends.
#[async_trait]
pub trait ChatModel: Send + Sync + fmt::Debug {
    /// Run a single system + user exchange and return the response text.
    async fn invoke(&self, system: &str, user: &str) -> anyhow::Result<String>;

    /// Get the backend provider name.
    fn name(&self) -> &str;
}

/// Initialize a chat model for the given provider.
///
/// Fails with [`ModelError::UnsupportedProvider`] when the provider string
/// matches no supported backend; the error carries the offending string.
/// No retry, timeout, or parameter validation happens here.
pub fn init_chat_model(
    model: &str,
    provider: &str,
    settings: ModelSettings,
) -> Result<Box<dyn ChatModel>, ModelError> {
    match Provider::from_str(provider)? {
        Provider::OpenAi => Ok(Box::new(OpenAiModel::new(model, settings))),
        Provider::Anthropic => Ok(Box::new(AnthropicModel::new(model, settings))),
    }
}
