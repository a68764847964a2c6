//! Per-vendor model list with identifier lookup

use super::{ModelVariant, Vendor};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Vendor entry as written in the catalog document.
///
/// The vendor itself is the key the entry sits under, so it is not part of
/// the entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VendorEntry {
    pub template_key: String,
    #[serde(default)]
    pub supports_native_thinking: bool,
    #[serde(default)]
    pub allowed_markers: Vec<String>,
    #[serde(default)]
    pub available_models: Vec<ModelVariant>,
}

/// One vendor's validated model list.
///
/// Every identifier of every variant maps to exactly one variant, so lookups
/// by id, api id or alias are a single hash probe.
#[derive(Debug, Clone)]
pub struct VendorCatalog {
    vendor: Vendor,
    template_key: String,
    supports_native_thinking: bool,
    allowed_markers: Vec<String>,
    models: Vec<ModelVariant>,
    lookup: HashMap<String, usize>,
}

impl VendorCatalog {
    /// Build the catalog, rejecting identifiers shared by more than one variant.
    pub fn new(vendor: Vendor, entry: VendorEntry) -> Result<Self, DomainError> {
        let mut lookup = HashMap::new();
        let mut duplicates = BTreeSet::new();

        for (index, variant) in entry.available_models.iter().enumerate() {
            for identifier in variant.identifiers() {
                if lookup.insert(identifier.to_string(), index).is_some() {
                    duplicates.insert(identifier.to_string());
                }
            }
        }

        if !duplicates.is_empty() {
            return Err(DomainError::DuplicateIdentifiers {
                vendor: vendor.to_string(),
                identifiers: duplicates.into_iter().collect(),
            });
        }

        Ok(Self {
            vendor,
            template_key: entry.template_key,
            supports_native_thinking: entry.supports_native_thinking,
            allowed_markers: entry.allowed_markers,
            models: entry.available_models,
            lookup,
        })
    }

    pub fn vendor(&self) -> Vendor {
        self.vendor
    }

    pub fn template_key(&self) -> &str {
        &self.template_key
    }

    pub fn supports_native_thinking(&self) -> bool {
        self.supports_native_thinking
    }

    pub fn allowed_markers(&self) -> &[String] {
        &self.allowed_markers
    }

    /// Variants in document order
    pub fn models(&self) -> &[ModelVariant] {
        &self.models
    }

    /// Find a variant by id, api id or alias.
    ///
    /// Surrounding whitespace is ignored; matching is case-sensitive.
    pub fn find_variant(&self, identifier: &str) -> Result<&ModelVariant, DomainError> {
        let key = identifier.trim();
        self.lookup
            .get(key)
            .map(|&index| &self.models[index])
            .ok_or_else(|| DomainError::UnknownModel {
                vendor: self.vendor.to_string(),
                identifier: key.to_string(),
            })
    }
}
