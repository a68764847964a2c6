//! Routing switches (`[routing]` section)

use serde::{Deserialize, Serialize};

/// ```toml
/// [routing]
/// auto_route = true      # default for `send` when --no-route is not given
/// model_routing = true   # attach the model classifier
/// tool_routing = true    # attach the tool classifier
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRoutingConfig {
    pub auto_route: bool,
    pub model_routing: bool,
    pub tool_routing: bool,
}

impl Default for FileRoutingConfig {
    fn default() -> Self {
        Self {
            auto_route: true,
            model_routing: true,
            tool_routing: true,
        }
    }
}
