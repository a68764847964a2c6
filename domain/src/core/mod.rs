//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`] - catalog, registry and routing errors

pub mod error;
