//! Shared test helpers

use std::sync::Arc;

use async_trait::async_trait;
use norvos_backend::{
    DeleteOptions, GetOptions, KeyValueBackend, MemoryBackend, PutOptions, Result, StoreResponse,
};

use crate::handler::{OperationKind, RecordHandler};
use crate::keymap::KeyMapper;

/// Backend whose calls never complete.
pub struct StalledBackend;

#[async_trait]
impl KeyValueBackend for StalledBackend {
    fn id(&self) -> &'static str {
        "stalled"
    }

    async fn get(&self, _key: &str, _opts: &GetOptions) -> Result<StoreResponse> {
        std::future::pending().await
    }

    async fn create(&self, _key: &str, _value: &str, _opts: &PutOptions) -> Result<StoreResponse> {
        std::future::pending().await
    }

    async fn update(&self, _key: &str, _value: &str, _opts: &PutOptions) -> Result<StoreResponse> {
        std::future::pending().await
    }

    async fn delete(&self, _key: &str, _opts: &DeleteOptions) -> Result<StoreResponse> {
        std::future::pending().await
    }
}

/// Handler over a fresh in-memory backend with the default key root.
pub fn memory_handler(kind: OperationKind) -> (Arc<MemoryBackend>, RecordHandler) {
    let backend = Arc::new(MemoryBackend::new());
    let handler = RecordHandler::new(kind, backend.clone(), Arc::new(KeyMapper::default()));
    (backend, handler)
}

pub fn record_input(name: &str, host: &str, ttl: Option<i64>) -> Vec<u8> {
    let mut json = serde_json::json!({ "name": name, "host": host });
    if let Some(ttl) = ttl {
        json["ttl"] = ttl.into();
    }
    json.to_string().into_bytes()
}

pub fn name_input(name: &str) -> Vec<u8> {
    serde_json::json!({ "name": name }).to_string().into_bytes()
}
