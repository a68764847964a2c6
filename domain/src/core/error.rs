//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Identifier errors (`MalformedIdentifier`, `UnknownVendor`,
/// `VendorNotRegistered`, `UnknownModel`, `NotAllowListed`) are caused by
/// caller input and surface as bad requests. The rest are configuration
/// errors raised while the process starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Model identifier must be in 'vendor:model' format: '{0}'")]
    MalformedIdentifier(String),

    #[error("Unknown vendor: '{0}'")]
    UnknownVendor(String),

    #[error("Vendor '{0}' not registered")]
    VendorNotRegistered(String),

    #[error("Model '{identifier}' not registered for vendor '{vendor}'")]
    UnknownModel { vendor: String, identifier: String },

    #[error("Model not allow-listed: {0}")]
    NotAllowListed(String),

    #[error("Duplicate model identifiers for vendor '{vendor}': {identifiers:?}")]
    DuplicateIdentifiers {
        vendor: String,
        identifiers: Vec<String>,
    },

    #[error("Invalid model catalog: {0}")]
    InvalidCatalog(String),

    #[error("No models available in catalog")]
    EmptyCatalog,

    #[error("Router requires at least one available route")]
    NoRoutes,
}

impl DomainError {
    /// Check if this error was caused by a caller-supplied model reference
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            DomainError::MalformedIdentifier(_)
                | DomainError::UnknownVendor(_)
                | DomainError::VendorNotRegistered(_)
                | DomainError::UnknownModel { .. }
                | DomainError::NotAllowListed(_)
        )
    }
}
