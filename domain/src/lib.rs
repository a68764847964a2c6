//! Domain layer for parley
//!
//! This crate contains the core types and rules of the routing engine. It has
//! no dependencies on I/O, providers or storage.
//!
//! # Core Concepts
//!
//! ## Catalog
//!
//! Every model the system knows about, grouped by [`Vendor`]. Identifiers of
//! the form `"vendor:model"` resolve to a [`ModelSpec`]; a [`ModelRegistry`]
//! narrows the catalog to an allow-list with a default.
//!
//! ## Conversation
//!
//! A [`ConversationHistory`] is the persisted state of one conversation: an id,
//! append-only [`StoredMessage`]s and a [`ConversationStatus`].
//!
//! ## Routing
//!
//! Fast classifier models answer with a [`RouteDecision`] (which model) and a
//! [`ToolDecision`] (which tools). Both are treated as untrusted input.

pub mod catalog;
pub mod conversation;
pub mod core;
pub mod prompt;
pub mod routing;
pub mod tool;

// Re-export commonly used types
pub use catalog::{
    FastModelOverrides, ModelCapability, ModelCatalog, ModelRegistry, ModelSpec, ModelVariant,
    TierClass, Vendor, VendorCatalog, VendorEntry,
};
pub use conversation::{
    ConversationHistory, ConversationId, ConversationStatus, MessageId, ModelMessage,
    ModelRequest, ModelResponse, RequestPart, ResponsePart, StoredMessage, ToolCallRef, Usage,
};
pub use core::error::DomainError;
pub use prompt::RouterPromptTemplate;
pub use routing::{ModelRoute, RouteDecision, ToolDecision};
pub use tool::{ToolDefinition, ToolError, ToolParameter};
