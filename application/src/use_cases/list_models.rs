//! List models use case.

use parley_domain::{DomainError, ModelRegistry, TierClass};
use serde::Serialize;
use std::sync::Arc;

/// One allow-listed model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelEntry {
    /// `"vendor:id"`
    pub identifier: String,
    pub api_model: String,
    pub tier_class: TierClass,
    pub is_default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

pub struct ListModelsUseCase {
    registry: Arc<ModelRegistry>,
}

impl ListModelsUseCase {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    /// Allow-listed models, default first
    pub fn execute(&self) -> Result<Vec<ModelEntry>, DomainError> {
        self.registry
            .available()
            .iter()
            .map(|spec| {
                let variant = self.registry.catalog().variant(spec)?;
                Ok(ModelEntry {
                    identifier: spec.identifier(),
                    api_model: variant.api_id.clone(),
                    tier_class: variant.tier_class,
                    is_default: spec == self.registry.default_spec(),
                    notes: variant.notes.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_registry;

    #[test]
    fn test_lists_registry_ids_default_first() {
        let registry = Arc::new(sample_registry());
        let entries = ListModelsUseCase::new(registry.clone()).execute().unwrap();

        let ids: Vec<String> = entries.iter().map(|e| e.identifier.clone()).collect();
        assert_eq!(ids, registry.ids());
        assert_eq!(ids[0], "anthropic:claude-sonnet-4-5");
        assert!(entries[0].is_default);
        assert!(entries[1..].iter().all(|e| !e.is_default));
        assert_eq!(entries[0].api_model, "claude-sonnet-4-5-20250929");
        assert_eq!(entries[0].tier_class, TierClass::Standard);
    }
}
