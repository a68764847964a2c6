//! Concrete model offerings within a vendor's catalog

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Coarse cost/capability bucket used to pick defaults and classifier models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierClass {
    /// Low-latency, inexpensive (routing and tool selection)
    Fast,
    /// Balanced performance (general queries)
    #[default]
    Standard,
    /// Maximum capability, higher cost
    Deep,
}

impl TierClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TierClass::Fast => "fast",
            TierClass::Standard => "standard",
            TierClass::Deep => "deep",
        }
    }
}

impl std::fmt::Display for TierClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One concrete model version offered by a vendor.
///
/// Uniqueness of [`identifiers`](Self::identifiers) is checked by
/// [`VendorCatalog`](super::VendorCatalog), since duplicates are only visible
/// across the whole vendor list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelVariant {
    /// Canonical identifier (e.g., "claude-sonnet-4-5-20250929")
    pub id: String,
    /// Identifier sent to the provider API
    pub api_id: String,
    /// Model family (e.g., "claude-sonnet")
    pub family: String,
    /// Tier within the family (e.g., "sonnet-4.5")
    pub tier: String,
    #[serde(default)]
    pub tier_class: TierClass,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ModelVariant {
    /// All strings this variant can be looked up by: `{id, api_id, aliases...}`.
    pub fn identifiers(&self) -> BTreeSet<&str> {
        std::iter::once(self.id.as_str())
            .chain(std::iter::once(self.api_id.as_str()))
            .chain(self.aliases.iter().map(String::as_str))
            .collect()
    }
}
