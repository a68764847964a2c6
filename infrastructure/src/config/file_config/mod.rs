//! Raw TOML configuration data types
//!
//! These structs mirror the TOML file exactly. Identifiers stay strings here;
//! they are resolved against the model catalog during bootstrap.

mod agent;
mod catalog;
mod models;
mod providers;
mod routing;
mod storage;
mod tools;

pub use agent::FileAgentConfig;
pub use catalog::FileCatalogConfig;
pub use models::FileModelsConfig;
pub use providers::{FileAnthropicConfig, FileOpenAiConfig, FileProvidersConfig};
pub use routing::FileRoutingConfig;
pub use storage::{FileStorageConfig, StorageBackend};
pub use tools::FileToolsConfig;

use super::validation::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Catalog location
    pub catalog: FileCatalogConfig,
    /// Default, allow-list, classifier and routes
    pub models: FileModelsConfig,
    /// Classifier switches
    pub routing: FileRoutingConfig,
    /// Provider credentials and endpoints
    pub providers: FileProvidersConfig,
    /// Conversation persistence
    pub storage: FileStorageConfig,
    /// Tool credentials
    pub tools: FileToolsConfig,
    /// Tool loop limits
    pub agent: FileAgentConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks identifier shapes in `[models]`, an empty route list while
    /// model routing is on, and the storage backend name.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.models.validate(self.routing.model_routing);
        issues.extend(self.storage.parse_backend().1);
        issues
    }
}
