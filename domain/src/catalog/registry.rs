//! Allow-listed subset of the catalog

use super::{ModelCapability, ModelCatalog, ModelSpec};
use crate::core::error::DomainError;
use std::collections::HashSet;
use std::sync::Arc;

/// The models a deployment permits, with one designated default.
///
/// `available[0]` is always the default and `available` never holds the same
/// spec twice.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    catalog: Arc<ModelCatalog>,
    default: ModelSpec,
    available: Vec<ModelSpec>,
}

impl ModelRegistry {
    /// Build a registry, placing `default` first and dropping repeats while
    /// keeping first-seen order.
    pub fn from_specs(
        catalog: Arc<ModelCatalog>,
        default: ModelSpec,
        available: impl IntoIterator<Item = ModelSpec>,
    ) -> Result<Self, DomainError> {
        catalog.ensure_spec(&default)?;

        let mut seen = HashSet::new();
        let ordered: Vec<ModelSpec> = std::iter::once(default.clone())
            .chain(available)
            .filter(|spec| seen.insert(spec.clone()))
            .collect();

        for spec in &ordered {
            catalog.ensure_spec(spec)?;
        }

        Ok(Self {
            catalog,
            default,
            available: ordered,
        })
    }

    pub fn catalog(&self) -> &Arc<ModelCatalog> {
        &self.catalog
    }

    pub fn default_spec(&self) -> &ModelSpec {
        &self.default
    }

    pub fn available(&self) -> &[ModelSpec] {
        &self.available
    }

    /// `"vendor:id"` for every allow-listed model, default first
    pub fn ids(&self) -> Vec<String> {
        self.available.iter().map(ModelSpec::identifier).collect()
    }

    pub fn capability_for<'a>(&'a self, spec: &'a ModelSpec) -> Result<ModelCapability<'a>, DomainError> {
        ModelCapability::from_catalog(spec, &self.catalog)
    }

    /// Check that a spec exists in the catalog and is allow-listed.
    pub fn resolve_spec(&self, spec: &ModelSpec) -> Result<ModelSpec, DomainError> {
        self.catalog.ensure_spec(spec)?;
        if !self.available.contains(spec) {
            return Err(DomainError::NotAllowListed(spec.identifier()));
        }
        Ok(spec.clone())
    }

    pub fn resolve_identifier(&self, identifier: &str) -> Result<ModelSpec, DomainError> {
        let spec = self.catalog.parse_spec(identifier)?;
        self.resolve_spec(&spec)
    }

    pub fn resolve_or_default(&self, spec: Option<&ModelSpec>) -> Result<ModelSpec, DomainError> {
        match spec {
            None => Ok(self.default.clone()),
            Some(spec) => self.resolve_spec(spec),
        }
    }
}
