//! Tool implementations available to execution models
//!
//! | Tool | Availability |
//! |------|--------------|
//! | `calculator` | always |
//! | `tavily_search` | `web-tools` feature and a resolvable Tavily key |

pub mod calculator;
#[cfg(feature = "web-tools")]
pub mod web;

pub use calculator::{CALCULATOR, CalculatorTool, calculator_definition};
#[cfg(feature = "web-tools")]
pub use web::{TAVILY_SEARCH, TavilySearchTool};

use crate::config::FileToolsConfig;
use parley_application::ToolRegistry;
use std::sync::Arc;
use tracing::{debug, info};

/// Build the process-wide tool table from configuration.
#[cfg_attr(not(feature = "web-tools"), allow(unused_variables))]
pub fn default_tool_registry(config: &FileToolsConfig, client: &reqwest::Client) -> ToolRegistry {
    let registry = ToolRegistry::new().register(Arc::new(CalculatorTool::new()));

    #[cfg(feature = "web-tools")]
    let registry = match config.resolve_tavily_key() {
        Some(key) => {
            debug!("Registering {} tool", TAVILY_SEARCH);
            registry.register(Arc::new(TavilySearchTool::new(
                client.clone(),
                key,
                config.tavily_base_url.clone(),
            )))
        }
        None => {
            info!(
                "{} not set; web search disabled",
                config.tavily_api_key_env
            );
            registry
        }
    };

    registry
}
