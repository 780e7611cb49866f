//! Operation registry handed to the host on discovery

use std::collections::HashMap;
use std::sync::Arc;

use norvos_backend::KeyValueBackend;

use crate::handler::{Operation, OperationKind, RecordHandler};
use crate::keymap::KeyMapper;

/// Name → operation mapping for the component's operations.
///
/// All handlers share one backend handle and one key mapper.
#[derive(Clone)]
pub struct OperationRegistry {
    operations: HashMap<&'static str, Arc<dyn Operation>>,
}

impl OperationRegistry {
    /// Register `create`, `read`, `update` and `delete` over `backend`.
    pub fn new(backend: Arc<dyn KeyValueBackend>, mapper: KeyMapper) -> Self {
        let mapper = Arc::new(mapper);
        let operations = OperationKind::ALL
            .into_iter()
            .map(|kind| {
                let handler: Arc<dyn Operation> =
                    Arc::new(RecordHandler::new(kind, backend.clone(), mapper.clone()));
                (kind.name(), handler)
            })
            .collect();
        Self { operations }
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Operation>> {
        self.operations.get(name).cloned()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.operations.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn operations(&self) -> &HashMap<&'static str, Arc<dyn Operation>> {
        &self.operations
    }
}

impl std::fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationRegistry")
            .field("operations", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RequestContext;
    use crate::test_utils::name_input;
    use norvos_backend::MemoryBackend;

    fn registry() -> (Arc<MemoryBackend>, OperationRegistry) {
        let backend = Arc::new(MemoryBackend::new());
        let registry = OperationRegistry::new(backend.clone(), KeyMapper::default());
        (backend, registry)
    }

    #[test]
    fn test_registers_exactly_four_operations() {
        let (_, registry) = registry();
        assert_eq!(registry.operations().len(), 4);
        assert_eq!(registry.names(), ["create", "delete", "read", "update"]);
        assert!(registry.get("list").is_none());
        assert!(registry.get("Create").is_none());
    }

    #[test]
    fn test_describe_is_non_empty() {
        let (_, registry) = registry();
        for (name, op) in registry.operations() {
            assert!(!op.describe().is_empty(), "{name}");
        }
    }

    #[tokio::test]
    async fn test_handlers_share_backend() {
        let (backend, registry) = registry();
        backend.seed("/coredns/com/example/www", "{}").await;

        let read = registry.get("read").unwrap();
        let delete = registry.get("delete").unwrap();
        let ctx = RequestContext::background();

        read.execute(Some(&ctx), &name_input("www.example.com"))
            .await
            .unwrap();
        delete
            .execute(Some(&ctx), &name_input("www.example.com"))
            .await
            .unwrap();

        assert_eq!(backend.calls().await.len(), 2);
        assert!(backend.keys().await.is_empty());
    }
}
