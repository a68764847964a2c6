//! **Web Tools**: `tavily_search`
//!
//! Gated behind the `web-tools` Cargo feature flag:
//!
//! ```toml
//! # cli/Cargo.toml
//! [features]
//! default = ["web-tools"]
//! web-tools = ["parley-infrastructure/web-tools"]
//! ```
//!
//! The tool is only registered when a Tavily API key is configured.

mod search;

pub use search::{TAVILY_SEARCH, TavilySearchTool, format_search_results, tavily_search_definition};
