//! Root catalog: vendor → model list

use super::{ModelSpec, ModelVariant, TierClass, Vendor, VendorCatalog, VendorEntry};
use crate::core::error::DomainError;
use std::collections::BTreeMap;

/// All vendors and their validated model lists.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    vendors: BTreeMap<Vendor, VendorCatalog>,
}

impl ModelCatalog {
    pub fn new(vendors: impl IntoIterator<Item = VendorCatalog>) -> Self {
        Self {
            vendors: vendors.into_iter().map(|v| (v.vendor(), v)).collect(),
        }
    }

    /// Parse and validate a catalog document.
    ///
    /// The document is an object keyed by vendor name. Unknown vendor keys,
    /// malformed entries and duplicate identifiers all fail the load.
    pub fn from_json_str(json: &str) -> Result<Self, DomainError> {
        let raw: BTreeMap<String, VendorEntry> =
            serde_json::from_str(json).map_err(|e| DomainError::InvalidCatalog(e.to_string()))?;

        let mut vendors = Vec::with_capacity(raw.len());
        for (key, entry) in raw {
            let vendor: Vendor = key
                .parse()
                .map_err(|_| DomainError::InvalidCatalog(format!("unknown vendor '{key}'")))?;
            vendors.push(VendorCatalog::new(vendor, entry)?);
        }
        Ok(Self::new(vendors))
    }

    pub fn vendor(&self, vendor: Vendor) -> Result<&VendorCatalog, DomainError> {
        self.vendors
            .get(&vendor)
            .ok_or_else(|| DomainError::VendorNotRegistered(vendor.to_string()))
    }

    pub fn vendors(&self) -> impl Iterator<Item = &VendorCatalog> {
        self.vendors.values()
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.values().all(|v| v.models().is_empty())
    }

    /// Parse a `"vendor:model"` identifier into a normalized spec.
    ///
    /// Splits on the first colon; both halves are trimmed. The model token may
    /// be the canonical id, the api id or any alias.
    pub fn parse_spec(&self, identifier: &str) -> Result<ModelSpec, DomainError> {
        let (vendor_token, variant_token) = identifier
            .split_once(':')
            .ok_or_else(|| DomainError::MalformedIdentifier(identifier.to_string()))?;
        let vendor: Vendor = vendor_token.trim().parse()?;
        let variant = self.vendor(vendor)?.find_variant(variant_token)?;
        Ok(ModelSpec::new(vendor, &variant.id))
    }

    /// Check that a spec still names a catalog variant.
    pub fn ensure_spec<'a>(&self, spec: &'a ModelSpec) -> Result<&'a ModelSpec, DomainError> {
        self.variant(spec)?;
        Ok(spec)
    }

    pub fn variant(&self, spec: &ModelSpec) -> Result<&ModelVariant, DomainError> {
        self.vendor(spec.vendor)?.find_variant(&spec.variant_id)
    }

    /// Provider-facing model string for a spec
    pub fn api_model(&self, spec: &ModelSpec) -> Result<&str, DomainError> {
        Ok(self.variant(spec)?.api_id.as_str())
    }

    /// Every variant of a vendor as specs, in document order
    pub fn specs_for(&self, vendor: Vendor) -> Vec<ModelSpec> {
        self.vendors
            .get(&vendor)
            .map(|v| {
                v.models()
                    .iter()
                    .map(|m| ModelSpec::new(vendor, &m.id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First fast-tier variant of a vendor, if any
    pub fn fast_spec(&self, vendor: Vendor) -> Option<ModelSpec> {
        self.vendors.get(&vendor).and_then(|v| {
            v.models()
                .iter()
                .find(|m| m.tier_class == TierClass::Fast)
                .map(|m| ModelSpec::new(vendor, &m.id))
        })
    }

    /// Pick a default execution model.
    ///
    /// Vendors are tried in the given order (falling back to the first catalog
    /// vendor when the list is empty). Within a vendor the first standard-tier
    /// variant wins, otherwise its first variant.
    pub fn preferred_default(&self, vendors: &[Vendor]) -> Result<ModelSpec, DomainError> {
        let candidates: Vec<Vendor> = if vendors.is_empty() {
            self.vendors.keys().take(1).copied().collect()
        } else {
            vendors.to_vec()
        };

        for vendor in candidates {
            let Some(catalog) = self.vendors.get(&vendor) else {
                continue;
            };
            let models = catalog.models();
            if let Some(variant) = models
                .iter()
                .find(|m| m.tier_class == TierClass::Standard)
                .or_else(|| models.first())
            {
                return Ok(ModelSpec::new(vendor, &variant.id));
            }
        }

        self.vendors
            .values()
            .find_map(|v| v.models().first().map(|m| ModelSpec::new(v.vendor(), &m.id)))
            .ok_or(DomainError::EmptyCatalog)
    }
}
