//! Provider configuration from TOML (`[providers]` section)

use serde::{Deserialize, Serialize};

/// Read an API key: the literal value wins, then the named env var.
/// Empty strings count as unset.
fn resolve_key(literal: Option<&String>, env_name: &str) -> Option<String> {
    literal
        .filter(|k| !k.trim().is_empty())
        .cloned()
        .or_else(|| std::env::var(env_name).ok().filter(|k| !k.trim().is_empty()))
}

/// Anthropic API provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAnthropicConfig {
    /// Environment variable name for the API key (default: "ANTHROPIC_API_KEY").
    pub api_key_env: String,
    /// Direct API key; prefer the env var.
    pub api_key: Option<String>,
    /// Base URL for the Anthropic API.
    pub base_url: String,
    /// Max tokens per response when the caller sets none.
    pub max_tokens: u32,
    /// Anthropic API version header.
    pub api_version: String,
    pub timeout_secs: u64,
}

impl Default for FileAnthropicConfig {
    fn default() -> Self {
        Self {
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 8192,
            api_version: "2023-06-01".to_string(),
            timeout_secs: 120,
        }
    }
}

impl FileAnthropicConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_key(self.api_key.as_ref(), &self.api_key_env)
    }
}

/// OpenAI API provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key; prefer the env var.
    pub api_key: Option<String>,
    /// Base URL for the OpenAI API (can point at any compatible endpoint).
    pub base_url: String,
    /// Max completion tokens per response when the caller sets none.
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            max_tokens: 8192,
            timeout_secs: 120,
        }
    }
}

impl FileOpenAiConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_key(self.api_key.as_ref(), &self.api_key_env)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub anthropic: FileAnthropicConfig,
    pub openai: FileOpenAiConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_key_wins() {
        let config = FileAnthropicConfig {
            api_key: Some("sk-literal".to_string()),
            api_key_env: "PARLEY_TEST_UNSET_KEY_A".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key().as_deref(), Some("sk-literal"));
    }

    #[test]
    fn test_blank_key_is_unset() {
        let config = FileOpenAiConfig {
            api_key: Some("  ".to_string()),
            api_key_env: "PARLEY_TEST_UNSET_KEY_B".to_string(),
            ..Default::default()
        };
        assert!(config.resolve_api_key().is_none());
    }
}
