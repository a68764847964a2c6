//! Conversation error types

use crate::ports::key_value_store::StoreError;
use crate::ports::llm_gateway::GatewayError;
use parley_domain::DomainError;
use thiserror::Error;

/// Errors surfaced by a conversation turn.
///
/// Identifier problems come through as [`Domain`](Self::Domain) and are the
/// caller's fault; provider failures during routing or execution come through
/// as [`Gateway`](Self::Gateway) and are never retried here.
#[derive(Error, Debug)]
pub enum ConversationError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl ConversationError {
    /// Check if the caller should be told their request was invalid
    pub fn is_bad_request(&self) -> bool {
        matches!(self, ConversationError::Domain(e) if e.is_bad_request())
    }
}
