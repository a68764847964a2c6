//! Infrastructure layer for parley
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer (LLM providers, key-value stores, tools), configuration
//! file loading, and the startup wiring that assembles them.

pub mod bootstrap;
pub mod catalog;
pub mod config;
pub mod providers;
pub mod storage;
pub mod tools;

// Re-export commonly used types
pub use bootstrap::{AppContext, BootstrapError};
pub use catalog::{CatalogLoadError, default_catalog, load_catalog};
pub use config::{
    ConfigIssue, ConfigLoader, FileAgentConfig, FileConfig, FileModelsConfig, FileRoutingConfig,
    FileStorageConfig, FileToolsConfig, Severity, StorageBackend,
};
pub use providers::{AnthropicAdapter, LoggingGateway, OpenAiAdapter, RoutingGateway};
pub use storage::{FileStore, MemoryStore};
pub use tools::default_tool_registry;
