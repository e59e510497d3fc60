//! Run configuration for the blog generation pipeline.
//!
//! Handles defaults, override maps, and loading from TOML files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for `{key}`: expected {expected}, found {found}")]
    InvalidValue { key: String, expected: &'static str, found: &'static str },

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for a single generation run.
///
/// Every field has a default, so a run is always constructible with zero
/// input. Built once per run and read-only afterwards; the workflow context
/// exclusively owns its instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Provider for the planning model
    pub planner_provider: String,

    /// Model used for section planning and grading
    pub planner_model: String,

    /// Provider for the writing model
    pub writer_provider: String,

    /// Model used for content writing
    pub writer_model: String,

    /// Web search provider
    pub searcher_provider: String,

    /// Search API key (falls back to the provider's environment variable)
    pub searcher_api_key: String,

    /// Number of blog sections to plan
    pub number_of_blog_sections: u32,

    /// Number of search queries generated per section
    pub number_of_queries: u32,

    /// Maximum search/write iterations per section
    pub max_search_depth: u32,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            planner_provider: "openai".to_string(),
            planner_model: "gpt-4".to_string(),
            writer_provider: "openai".to_string(),
            writer_model: "gpt-4".to_string(),
            searcher_provider: "tavily".to_string(),
            searcher_api_key: String::new(),
            number_of_blog_sections: 5,
            number_of_queries: 3,
            max_search_depth: 3,
        }
    }
}

impl Configuration {
    /// Build a configuration from an external override map.
    ///
    /// The map may carry a nested `"configurable"` object; a missing map or
    /// missing sub-object yields the defaults. Only the nine known field
    /// names are applied, each type-checked against the field's declared
    /// type. Unknown keys are ignored.
    pub fn from_overrides(config: Option<&Value>) -> Result<Self, ConfigError> {
        let Some(configurable) =
            config.and_then(|v| v.get("configurable")).and_then(Value::as_object)
        else {
            return Ok(Self::default());
        };

        let mut resolved = Self::default();
        for (key, value) in configurable {
            match key.as_str() {
                "planner_provider" => resolved.planner_provider = expect_string(key, value)?,
                "planner_model" => resolved.planner_model = expect_string(key, value)?,
                "writer_provider" => resolved.writer_provider = expect_string(key, value)?,
                "writer_model" => resolved.writer_model = expect_string(key, value)?,
                "searcher_provider" => resolved.searcher_provider = expect_string(key, value)?,
                "searcher_api_key" => resolved.searcher_api_key = expect_string(key, value)?,
                "number_of_blog_sections" => {
                    resolved.number_of_blog_sections = expect_u32(key, value)?;
                }
                "number_of_queries" => resolved.number_of_queries = expect_u32(key, value)?,
                "max_search_depth" => resolved.max_search_depth = expect_u32(key, value)?,
                _ => {}
            }
        }

        Ok(resolved)
    }

    /// Serialize the configuration to a flat map of exactly nine keys.
    ///
    /// The key set is the exact inverse of the field names accepted by
    /// [`Configuration::from_overrides`].
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("planner_provider".to_string(), Value::from(self.planner_provider.clone()));
        map.insert("planner_model".to_string(), Value::from(self.planner_model.clone()));
        map.insert("writer_provider".to_string(), Value::from(self.writer_provider.clone()));
        map.insert("writer_model".to_string(), Value::from(self.writer_model.clone()));
        map.insert("searcher_provider".to_string(), Value::from(self.searcher_provider.clone()));
        map.insert("searcher_api_key".to_string(), Value::from(self.searcher_api_key.clone()));
        map.insert(
            "number_of_blog_sections".to_string(),
            Value::from(self.number_of_blog_sections),
        );
        map.insert("number_of_queries".to_string(), Value::from(self.number_of_queries));
        map.insert("max_search_depth".to_string(), Value::from(self.max_search_depth));
        map
    }

    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.blogsmith.toml` in current directory
    /// 2. `~/.config/blogsmith/config.toml`
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        let local_config = PathBuf::from(".blogsmith.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let global_config = config_dir.join("blogsmith").join("config.toml");
            if global_config.exists() {
                return Self::load_from_file(&global_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}

fn expect_string(key: &str, value: &Value) -> Result<String, ConfigError> {
    value.as_str().map(ToOwned::to_owned).ok_or_else(|| ConfigError::InvalidValue {
        key: key.to_string(),
        expected: "string",
        found: json_type(value),
    })
}

fn expect_u32(key: &str, value: &Value) -> Result<u32, ConfigError> {
    value.as_u64().and_then(|n| u32::try_from(n).ok()).ok_or_else(|| {
        ConfigError::InvalidValue {
            key: key.to_string(),
            expected: "unsigned integer",
            found: json_type(value),
        }
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_configuration() {
        let config = Configuration::default();
        assert_eq!(config.planner_provider, "openai");
        assert_eq!(config.planner_model, "gpt-4");
        assert_eq!(config.writer_provider, "openai");
        assert_eq!(config.writer_model, "gpt-4");
        assert_eq!(config.searcher_provider, "tavily");
        assert_eq!(config.searcher_api_key, "");
        assert_eq!(config.number_of_blog_sections, 5);
        assert_eq!(config.number_of_queries, 3);
        assert_eq!(config.max_search_depth, 3);
    }

    #[test]
    fn test_from_overrides_absent_map() {
        let config = Configuration::from_overrides(None).unwrap();
        assert_eq!(config, Configuration::default());
    }

    #[test]
    fn test_from_overrides_without_configurable() {
        let overrides = json!({"tags": ["draft"]});
        let config = Configuration::from_overrides(Some(&overrides)).unwrap();
        assert_eq!(config, Configuration::default());
    }

    #[test]
    fn test_from_overrides_single_field() {
        let overrides = json!({"configurable": {"number_of_queries": 7}});
        let config = Configuration::from_overrides(Some(&overrides)).unwrap();
        assert_eq!(config.number_of_queries, 7);

        let expected = Configuration { number_of_queries: 7, ..Configuration::default() };
        assert_eq!(config, expected);
    }

    #[test]
    fn test_from_overrides_ignores_unknown_keys() {
        let overrides = json!({"configurable": {"bogus_field": 1, "writer_model": "gpt-4o"}});
        let config = Configuration::from_overrides(Some(&overrides)).unwrap();
        assert_eq!(config.writer_model, "gpt-4o");
        assert!(!config.to_map().contains_key("bogus_field"));
    }

    #[test]
    fn test_from_overrides_rejects_wrong_type() {
        let overrides = json!({"configurable": {"number_of_queries": "seven"}});
        let err = Configuration::from_overrides(Some(&overrides)).unwrap_err();
        assert!(err.to_string().contains("number_of_queries"));
        assert!(err.to_string().contains("string"));
    }

    #[test]
    fn test_from_overrides_rejects_negative_count() {
        let overrides = json!({"configurable": {"max_search_depth": -1}});
        assert!(Configuration::from_overrides(Some(&overrides)).is_err());
    }

    #[test]
    fn test_to_map_has_exactly_nine_keys() {
        let map = Configuration::default().to_map();
        assert_eq!(map.len(), 9);
        assert_eq!(map["planner_provider"], "openai");
        assert_eq!(map["planner_model"], "gpt-4");
        assert_eq!(map["searcher_provider"], "tavily");
        assert_eq!(map["number_of_blog_sections"], 5);
        assert_eq!(map["max_search_depth"], 3);
    }

    #[test]
    fn test_override_round_trip() {
        let config = Configuration {
            planner_provider: "anthropic".to_string(),
            planner_model: "claude-3-7-sonnet-latest".to_string(),
            number_of_blog_sections: 8,
            ..Configuration::default()
        };

        let overrides = json!({"configurable": config.to_map()});
        let restored = Configuration::from_overrides(Some(&overrides)).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_load_from_toml() {
        let toml_str = r#"
            planner_provider = "anthropic"
            planner_model = "claude-3-7-sonnet-latest"
            number_of_queries = 2
        "#;

        let config: Configuration = toml::from_str(toml_str).unwrap();
        assert_eq!(config.planner_provider, "anthropic");
        assert_eq!(config.number_of_queries, 2);
        // Unspecified fields keep their defaults
        assert_eq!(config.writer_model, "gpt-4");
        assert_eq!(config.max_search_depth, 3);
    }
}
