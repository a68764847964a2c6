//! Capability views and fast-model companions

use super::{ModelCatalog, ModelSpec, ModelVariant, TierClass, VendorCatalog};
use crate::core::error::DomainError;

/// Borrowed view of everything the catalog knows about one spec.
#[derive(Debug, Clone, Copy)]
pub struct ModelCapability<'a> {
    pub spec: &'a ModelSpec,
    pub variant: &'a ModelVariant,
    pub vendor: &'a VendorCatalog,
}

impl<'a> ModelCapability<'a> {
    pub fn from_catalog(spec: &'a ModelSpec, catalog: &'a ModelCatalog) -> Result<Self, DomainError> {
        let vendor = catalog.vendor(spec.vendor)?;
        let variant = vendor.find_variant(&spec.variant_id)?;
        Ok(Self {
            spec,
            variant,
            vendor,
        })
    }

    pub fn is_fast_tier(&self) -> bool {
        self.variant.tier_class == TierClass::Fast
    }

    pub fn is_deep_tier(&self) -> bool {
        self.variant.tier_class == TierClass::Deep
    }

    pub fn supports_native_thinking(&self) -> bool {
        self.vendor.supports_native_thinking()
    }
}

/// Primary model → fast companion used for classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FastModelOverrides {
    overrides: Vec<(ModelSpec, ModelSpec)>,
}

impl FastModelOverrides {
    /// Resolve `primary identifier → companion identifier` pairs against the catalog.
    pub fn from_identifiers<'s>(
        mapping: impl IntoIterator<Item = (&'s str, &'s str)>,
        catalog: &ModelCatalog,
    ) -> Result<Self, DomainError> {
        let overrides = mapping
            .into_iter()
            .map(|(primary, companion)| {
                Ok((catalog.parse_spec(primary)?, catalog.parse_spec(companion)?))
            })
            .collect::<Result<Vec<_>, DomainError>>()?;
        Ok(Self { overrides })
    }

    pub fn for_spec(&self, spec: &ModelSpec) -> Option<&ModelSpec> {
        self.overrides
            .iter()
            .find(|(primary, _)| primary == spec)
            .map(|(_, companion)| companion)
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}
