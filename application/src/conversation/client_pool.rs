//! Execution client cache
//!
//! Building a client is expensive (HTTP setup, tool schema conversion), using
//! one is cheap, and clients hold no conversation state. The pool therefore
//! keeps one client per `(model, tool set)` and hands the same handle to every
//! conversation that asks for that combination.
//!
//! The tool set is keyed as a sorted set of *resolved* names: request order
//! does not matter, unknown names are dropped before keying, and `None`
//! ("all tools") shares its entry with an explicit list of every tool.

use crate::ports::execution_client::{ClientFactory, ExecutionClient};
use crate::tool_registry::ToolRegistry;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parley_domain::{DomainError, ModelRegistry, ModelSpec};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

type PoolKey = (ModelSpec, BTreeSet<String>);

pub struct ClientPool {
    registry: Arc<ModelRegistry>,
    tools: Arc<ToolRegistry>,
    factory: Arc<dyn ClientFactory>,
    clients: DashMap<PoolKey, Arc<dyn ExecutionClient>>,
}

impl ClientPool {
    pub fn new(
        registry: Arc<ModelRegistry>,
        tools: Arc<ToolRegistry>,
        factory: Arc<dyn ClientFactory>,
    ) -> Self {
        Self {
            registry,
            tools,
            factory,
            clients: DashMap::new(),
        }
    }

    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tools
    }

    /// Get the cached client for `(spec, tools)` or build one.
    ///
    /// `tool_names = None` selects every registered tool. Two concurrent
    /// misses on the same key may both build a client; the first one inserted
    /// is kept and the other is dropped.
    pub fn get_client(
        &self,
        spec: &ModelSpec,
        tool_names: Option<&[String]>,
    ) -> Result<Arc<dyn ExecutionClient>, DomainError> {
        let all_names;
        let requested: Vec<&str> = match tool_names {
            Some(names) => names.iter().map(String::as_str).collect(),
            None => {
                all_names = self.tools.names();
                all_names.iter().map(String::as_str).collect()
            }
        };
        let (resolved, tools) = self.tools.resolve(requested);
        let key = (spec.clone(), resolved);

        if let Some(client) = self.clients.get(&key) {
            debug!("Client pool hit: {} {:?}", spec, key.1);
            return Ok(client.value().clone());
        }

        let api_model = self.registry.catalog().api_model(spec)?;
        let client = self.factory.create(spec, api_model, tools);

        let client = match self.clients.entry(key) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                info!(
                    "Created execution client for {} ({}) with tools {:?}",
                    spec,
                    api_model,
                    entry.key().1
                );
                entry.insert(client).value().clone()
            }
        };
        Ok(client)
    }

    /// Number of cached clients
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl std::fmt::Debug for ClientPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientPool")
            .field("tools", &self.tools)
            .field("clients", &self.clients.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CountingFactory, EchoTool, sample_registry};
    use parley_domain::Vendor;

    fn pool() -> (ClientPool, Arc<CountingFactory>) {
        let factory = Arc::new(CountingFactory::default());
        let tools = ToolRegistry::new()
            .register(EchoTool::arc("calculator"))
            .register(EchoTool::arc("tavily_search"));
        let pool = ClientPool::new(Arc::new(sample_registry()), Arc::new(tools), factory.clone());
        (pool, factory)
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn sonnet() -> ModelSpec {
        ModelSpec::new(Vendor::Anthropic, "claude-sonnet-4-5")
    }

    #[test]
    fn test_same_key_returns_same_client() {
        let (pool, factory) = pool();
        let a = pool.get_client(&sonnet(), Some(&names(&["calculator"]))).unwrap();
        let b = pool.get_client(&sonnet(), Some(&names(&["calculator"]))).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(factory.created(), 1);
    }

    #[test]
    fn test_tool_order_does_not_matter() {
        let (pool, _) = pool();
        let a = pool
            .get_client(&sonnet(), Some(&names(&["calculator", "tavily_search"])))
            .unwrap();
        let b = pool
            .get_client(&sonnet(), Some(&names(&["tavily_search", "calculator"])))
            .unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_none_equals_full_explicit_set() {
        let (pool, factory) = pool();
        let all = pool.get_client(&sonnet(), None).unwrap();
        let explicit = pool
            .get_client(&sonnet(), Some(&names(&["tavily_search", "calculator"])))
            .unwrap();
        assert!(Arc::ptr_eq(&all, &explicit));
        assert_eq!(factory.created(), 1);
        assert_eq!(all.tool_names(), vec!["calculator", "tavily_search"]);
    }

    #[test]
    fn test_different_tool_set_gets_distinct_client() {
        let (pool, _) = pool();
        let calc = pool.get_client(&sonnet(), Some(&names(&["calculator"]))).unwrap();
        let none = pool.get_client(&sonnet(), Some(&[])).unwrap();
        let all = pool.get_client(&sonnet(), None).unwrap();
        assert!(!Arc::ptr_eq(&calc, &none));
        assert!(!Arc::ptr_eq(&calc, &all));
        assert!(none.tool_names().is_empty());
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_different_model_gets_distinct_client() {
        let (pool, _) = pool();
        let a = pool.get_client(&sonnet(), None).unwrap();
        let b = pool
            .get_client(&ModelSpec::new(Vendor::OpenAi, "gpt-5"), None)
            .unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(b.model(), "gpt-5");
        assert_eq!(a.model(), "claude-sonnet-4-5-20250929");
    }

    #[test]
    fn test_unknown_tool_names_are_dropped() {
        let (pool, _) = pool();
        let a = pool
            .get_client(&sonnet(), Some(&names(&["calculator", "weather"])))
            .unwrap();
        let b = pool.get_client(&sonnet(), Some(&names(&["calculator"]))).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.tool_names(), vec!["calculator"]);
    }

    #[test]
    fn test_stale_spec_is_error() {
        let (pool, _) = pool();
        let result = pool.get_client(&ModelSpec::new(Vendor::OpenAi, "gpt-3"), None);
        assert!(matches!(result, Err(DomainError::UnknownModel { .. })));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_misses_keep_one_client() {
        let (pool, _) = pool();
        let pool = Arc::new(pool);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let pool = pool.clone();
                tokio::spawn(async move { pool.get_client(&sonnet(), None).unwrap() })
            })
            .collect();

        let mut clients = Vec::new();
        for handle in handles {
            clients.push(handle.await.unwrap());
        }
        let first = pool.get_client(&sonnet(), None).unwrap();
        assert!(clients.iter().all(|c| Arc::ptr_eq(c, &first)));
        assert_eq!(pool.len(), 1);
    }
}
