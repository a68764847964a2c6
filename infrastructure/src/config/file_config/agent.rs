//! Execution client settings from TOML (`[agent]` section)

use parley_application::ExecutionParams;
use serde::{Deserialize, Serialize};

/// ```toml
/// [agent]
/// max_tool_turns = 8    # model ↔ tool round trips per message
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub max_tool_turns: usize,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        Self {
            max_tool_turns: ExecutionParams::default().max_tool_turns,
        }
    }
}

impl FileAgentConfig {
    pub fn to_execution_params(&self) -> ExecutionParams {
        ExecutionParams::default().with_max_tool_turns(self.max_tool_turns)
    }
}
