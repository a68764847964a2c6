//! Tool domain module
//!
//! Tools are named functions the execution model may call during a turn
//! (e.g. `calculator`, `tavily_search`). The domain only describes them:
//! a [`ToolDefinition`] is what the model sees, a [`ToolError`] is what comes
//! back when a call goes wrong. Implementations live in the infrastructure
//! layer behind the application's `Tool` port.

pub mod entities;
pub mod value_objects;

pub use entities::{ToolDefinition, ToolParameter};
pub use value_objects::ToolError;
