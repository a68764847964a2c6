//! Process-wide tool table
//!
//! Built once at startup and read-only afterwards. The tool classifier checks
//! names against it and the client pool resolves names to implementations.

use crate::ports::tool::Tool;
use parley_domain::ToolDefinition;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Name → tool mapping
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool, replacing any tool of the same name
    pub fn register(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.insert(tool.name().to_string(), tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Every tool name, sorted
    pub fn names(&self) -> BTreeSet<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition().clone()).collect()
    }

    /// Resolve requested names, silently dropping unknown ones.
    ///
    /// The returned set is the resolved names; the vector holds the matching
    /// tools in the same (sorted) order.
    pub fn resolve<'a>(
        &self,
        names: impl IntoIterator<Item = &'a str>,
    ) -> (BTreeSet<String>, Vec<Arc<dyn Tool>>) {
        let resolved: BTreeSet<String> = names
            .into_iter()
            .filter(|name| self.contains(name))
            .map(str::to_string)
            .collect();
        let tools = resolved
            .iter()
            .filter_map(|name| self.tools.get(name).cloned())
            .collect();
        (resolved, tools)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}
