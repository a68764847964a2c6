//! LLM vendors known to the catalog

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// LLM provider identifier.
///
/// The lowercase string form is the vendor token of a `"vendor:model"`
/// identifier and the top-level key of the catalog document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Anthropic,
    OpenAi,
}

impl Vendor {
    pub const ALL: [Vendor; 2] = [Vendor::Anthropic, Vendor::OpenAi];

    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::Anthropic => "anthropic",
            Vendor::OpenAi => "openai",
        }
    }
}

impl std::fmt::Display for Vendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Vendor {
    type Err = DomainError;

    /// Case-sensitive, matching the catalog keys exactly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "anthropic" => Ok(Vendor::Anthropic),
            "openai" => Ok(Vendor::OpenAi),
            other => Err(DomainError::UnknownVendor(other.to_string())),
        }
    }
}
