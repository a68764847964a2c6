//! Model and tool routing decisions

use serde::{Deserialize, Serialize};

/// An execution-model identifier the model classifier may select.
///
/// Holds a `"vendor:model"` string; it becomes a
/// [`ModelSpec`](crate::catalog::ModelSpec) through the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelRoute(String);

impl ModelRoute {
    pub const ANTHROPIC_SONNET: &'static str = "anthropic:claude-sonnet-4-5-20250929";
    pub const OPENAI_GPT5: &'static str = "openai:gpt-5";

    pub fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Routes used when none are configured
    pub fn defaults() -> Vec<ModelRoute> {
        vec![
            ModelRoute::new(Self::ANTHROPIC_SONNET),
            ModelRoute::new(Self::OPENAI_GPT5),
        ]
    }
}

impl std::fmt::Display for ModelRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T: Into<String>> From<T> for ModelRoute {
    fn from(s: T) -> Self {
        Self::new(s)
    }
}

/// Model classifier output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDecision {
    pub model: ModelRoute,
    #[serde(default)]
    pub reasoning: Option<String>,
}

impl RouteDecision {
    pub fn new(model: impl Into<ModelRoute>, reasoning: Option<String>) -> Self {
        Self {
            model: model.into(),
            reasoning,
        }
    }

    /// Keep the decision if its route is allowed, otherwise switch to the
    /// first allowed route and say why in `reasoning`.
    ///
    /// `allowed` must not be empty; classifiers validate that on construction.
    pub fn constrain_to(self, allowed: &[ModelRoute]) -> RouteDecision {
        match allowed.first() {
            Some(_) if allowed.contains(&self.model) => self,
            Some(fallback) => RouteDecision {
                reasoning: Some(format!(
                    "Requested {} not available, using {}",
                    self.model, fallback
                )),
                model: fallback.clone(),
            },
            None => self,
        }
    }

    /// Whether [`constrain_to`](Self::constrain_to) would keep this decision
    pub fn is_allowed(&self, allowed: &[ModelRoute]) -> bool {
        allowed.contains(&self.model)
    }
}

/// Tool classifier output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDecision {
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

impl ToolDecision {
    /// Drop tool names not accepted by `is_known`, keeping order.
    pub fn retain_known(self, is_known: impl Fn(&str) -> bool) -> Vec<String> {
        self.tools.into_iter().filter(|t| is_known(t)).collect()
    }
}
