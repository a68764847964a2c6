//! Model selection from TOML (`[models]` section)

use crate::config::validation::{ConfigIssue, ConfigIssueCode, Severity};
use parley_domain::{ModelRoute, Vendor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Model selection from TOML
///
/// # Example
///
/// ```toml
/// [models]
/// default = "anthropic:claude-sonnet-4.5"
/// allowed = ["anthropic:claude-haiku-4.5", "openai:gpt-5"]
/// classifier = "anthropic:claude-haiku-4.5"    # fast model used for routing
/// routes = ["anthropic:claude-sonnet-4-5-20250929", "openai:gpt-5"]
///
/// [models.fast_overrides]
/// "openai:gpt-5" = "openai:gpt-5-mini"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    /// Default execution model; chosen from credentialed vendors when unset
    pub default: Option<String>,
    /// Allow-listed models; every model of a credentialed vendor when empty
    pub allowed: Vec<String>,
    /// Fast model for both classifiers
    pub classifier: Option<String>,
    /// Models the model classifier may choose from
    pub routes: Vec<String>,
    /// Primary model → fast companion used for classification
    pub fast_overrides: BTreeMap<String, String>,
}

impl Default for FileModelsConfig {
    fn default() -> Self {
        Self {
            default: None,
            allowed: Vec::new(),
            classifier: None,
            routes: ModelRoute::defaults()
                .into_iter()
                .map(|r| r.as_str().to_string())
                .collect(),
            fast_overrides: BTreeMap::new(),
        }
    }
}

/// Shape check for a `vendor:model` identifier.
///
/// Whether the model exists is only known once the catalog is loaded.
fn check_identifier(field: &str, value: &str) -> Option<ConfigIssue> {
    if value.trim().is_empty() {
        return Some(ConfigIssue {
            severity: Severity::Error,
            code: ConfigIssueCode::EmptyModelName {
                field: field.to_string(),
            },
            message: format!("{}: model name cannot be empty", field),
        });
    }
    let valid = value
        .split_once(':')
        .is_some_and(|(vendor, model)| vendor.trim().parse::<Vendor>().is_ok() && !model.trim().is_empty());
    if valid {
        return None;
    }
    Some(ConfigIssue {
        severity: Severity::Error,
        code: ConfigIssueCode::InvalidIdentifier {
            field: field.to_string(),
            value: value.to_string(),
        },
        message: format!(
            "{}: '{}' is not a 'vendor:model' identifier (vendors: {})",
            field,
            value,
            Vendor::ALL.map(|v| v.as_str()).join(", ")
        ),
    })
}

impl FileModelsConfig {
    pub fn validate(&self, model_routing: bool) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if let Some(default) = &self.default {
            issues.extend(check_identifier("models.default", default));
        }
        if let Some(classifier) = &self.classifier {
            issues.extend(check_identifier("models.classifier", classifier));
        }
        for value in &self.allowed {
            issues.extend(check_identifier("models.allowed", value));
        }
        for value in &self.routes {
            issues.extend(check_identifier("models.routes", value));
        }
        for (primary, fast) in &self.fast_overrides {
            issues.extend(check_identifier("models.fast_overrides", primary));
            issues.extend(check_identifier("models.fast_overrides", fast));
        }

        if model_routing && self.routes.is_empty() {
            issues.push(ConfigIssue {
                severity: Severity::Warning,
                code: ConfigIssueCode::EmptyRoutes,
                message: "models.routes is empty; model routing is disabled".to_string(),
            });
        }

        issues
    }
}
