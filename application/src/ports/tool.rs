//! Tool port
//!
//! Tools are invoked by execution clients when the model asks for them.

use async_trait::async_trait;
use parley_domain::{ConversationHistory, ToolDefinition, ToolError};

/// A callable tool
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name, description and parameters shown to the model
    fn definition(&self) -> &ToolDefinition;

    fn name(&self) -> &str {
        &self.definition().name
    }

    /// Run the tool with the arguments the model supplied.
    ///
    /// `context` is the conversation as it stood when the turn started.
    async fn call(
        &self,
        args: &serde_json::Value,
        context: &ConversationHistory,
    ) -> Result<String, ToolError>;
}

/// Pull a required string argument out of a tool call's arguments.
pub fn string_arg<'a>(args: &'a serde_json::Value, name: &str) -> Result<&'a str, ToolError> {
    args.get(name)
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| ToolError::invalid_argument(format!("missing string argument '{name}'")))
}
