use serde::{Deserialize, Serialize};

/// API keys for the model providers
///
/// Keys are only ever read from the environment and are never written back to
/// a configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeys {
    /// Google AI Studio key used by the Gemini provider
    #[serde(skip_serializing)]
    pub gemini_api_key: Option<String>,
    /// Key for OpenAI-compatible endpoints
    #[serde(skip_serializing)]
    pub openai_api_key: Option<String>,
}

impl ApiKeys {
    /// Loads API keys from the environment
    ///
    /// `GOOGLE_API_KEY` wins over `GEMINI_API_KEY` when both are set.
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: get_env_value("GOOGLE_API_KEY")
                .or_else(|| get_env_value("GEMINI_API_KEY")),
            openai_api_key: get_env_value("OPENAI_API_KEY"),
        }
    }
}

/// Reads an environment variable, treating empty values as unset
pub fn get_env_value(key: &str) -> Option<String> {
    let value = std::env::var(key).ok()?;
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_env_value_is_unset() {
        std::env::set_var("REPODOC_TEST_EMPTY_VALUE", "  ");
        assert_eq!(get_env_value("REPODOC_TEST_EMPTY_VALUE"), None);

        std::env::set_var("REPODOC_TEST_SET_VALUE", "abc");
        assert_eq!(get_env_value("REPODOC_TEST_SET_VALUE").as_deref(), Some("abc"));
    }
}
