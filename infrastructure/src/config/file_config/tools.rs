//! Tools configuration from TOML (`[tools]` section)
//!
//! ```toml
//! [tools]
//! tavily_api_key_env = "TAVILY_API_KEY"
//! tavily_base_url = "https://api.tavily.com"
//! ```
//!
//! The calculator is always available; web search is registered only when a
//! Tavily key resolves.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    pub tavily_api_key_env: String,
    pub tavily_api_key: Option<String>,
    pub tavily_base_url: String,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            tavily_api_key_env: "TAVILY_API_KEY".to_string(),
            tavily_api_key: None,
            tavily_base_url: "https://api.tavily.com".to_string(),
        }
    }
}

impl FileToolsConfig {
    pub fn resolve_tavily_key(&self) -> Option<String> {
        self.tavily_api_key
            .as_ref()
            .filter(|k| !k.trim().is_empty())
            .cloned()
            .or_else(|| {
                std::env::var(&self.tavily_api_key_env)
                    .ok()
                    .filter(|k| !k.trim().is_empty())
            })
    }
}
