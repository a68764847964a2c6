//! Classifier decisions
//!
//! Routing runs a cheap model before the expensive one. Its answers are
//! untrusted: a model route outside the allowed set is replaced by the first
//! allowed route, and unknown tool names are dropped. Neither case is an error.

pub mod decision;
pub mod parsing;

pub use decision::{ModelRoute, RouteDecision, ToolDecision};
pub use parsing::{extract_json_object, parse_route_decision, parse_tool_decision};
