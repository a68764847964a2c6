//! Normalized model references

use super::Vendor;
use serde::{Deserialize, Serialize};

/// A `(vendor, canonical variant id)` pair.
///
/// Specs produced by [`ModelCatalog::parse_spec`](super::ModelCatalog::parse_spec)
/// always carry the canonical id, so two specs for the same variant compare
/// equal no matter which alias was used to obtain them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelSpec {
    pub vendor: Vendor,
    pub variant_id: String,
}

impl ModelSpec {
    pub fn new(vendor: Vendor, variant_id: impl Into<String>) -> Self {
        Self {
            vendor,
            variant_id: variant_id.into(),
        }
    }

    /// `"vendor:variant_id"`, accepted back by `parse_spec`.
    pub fn identifier(&self) -> String {
        format!("{}:{}", self.vendor, self.variant_id)
    }
}

impl std::fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.vendor, self.variant_id)
    }
}
