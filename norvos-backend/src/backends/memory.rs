//! In-memory backend
//!
//! A process-local store with the same conditional-write and single-node
//! delete semantics as the etcd backend. A path that only has descendants is a
//! directory: it holds no record, yet create-if-absent treats it as taken.
//! Every read is trivially linearizable (one lock guards all state), so
//! `quorum` is accepted and recorded but changes nothing.
//!
//! Besides embedding, it doubles as the test double for everything above the
//! backend layer: calls are recorded, and latency or a fixed failure can be
//! injected.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use crate::error::{BackendError, Result};
use crate::traits::KeyValueBackend;
use crate::types::{DeleteOptions, GetOptions, PutOptions, StoreAction, StoreResponse};

const BACKEND_NAME: &str = "memory";

/// A call observed by [`MemoryBackend`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    /// [`KeyValueBackend::get`]
    Get { key: String, quorum: bool },
    /// [`KeyValueBackend::create`]
    Create { key: String, value: String },
    /// [`KeyValueBackend::update`]
    Update { key: String, value: String },
    /// [`KeyValueBackend::delete`]
    Delete { key: String, recursive: bool },
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    modified_index: u64,
}

#[derive(Debug, Default)]
struct MemoryState {
    entries: BTreeMap<String, Entry>,
    /// Store-wide modification counter, bumped on every successful write.
    index: u64,
}

/// In-memory [`KeyValueBackend`].
#[derive(Default)]
pub struct MemoryBackend {
    state: RwLock<MemoryState>,
    calls: Mutex<Vec<BackendCall>>,
    latency: RwLock<Option<Duration>>,
    /// 如果 Some，所有调用返回此错误（用于测试错误翻译路径）
    fault: RwLock<Option<BackendError>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call by `latency` before it touches the store.
    pub async fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.write().await = latency;
    }

    /// Make every call fail with `fault` (after recording and latency).
    pub async fn set_fault(&self, fault: Option<BackendError>) {
        *self.fault.write().await = fault;
    }

    /// Calls observed so far.
    pub async fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().await.clone()
    }

    /// Current value at `key`, bypassing recording, latency and faults.
    pub async fn value(&self, key: &str) -> Option<String> {
        self.state
            .read()
            .await
            .entries
            .get(key)
            .map(|entry| entry.value.clone())
    }

    /// All stored keys in lexical order.
    pub async fn keys(&self) -> Vec<String> {
        self.state.read().await.entries.keys().cloned().collect()
    }

    /// Store `value` at `key` unconditionally, bypassing recording, latency and faults.
    pub async fn seed(&self, key: &str, value: &str) {
        let mut state = self.state.write().await;
        state.index += 1;
        let modified_index = state.index;
        state.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                modified_index,
            },
        );
    }

    /// Record the call, then apply injected latency and fault.
    async fn enter(&self, call: BackendCall, deadline: Option<Instant>) -> Result<()> {
        self.calls.lock().await.push(call);

        if let Some(deadline) = deadline {
            if deadline <= Instant::now() {
                return Err(BackendError::Timeout {
                    backend: BACKEND_NAME.to_string(),
                    detail: "deadline already passed".to_string(),
                });
            }
        }

        let latency = *self.latency.read().await;
        if let Some(latency) = latency {
            let ready_at = Instant::now() + latency;
            match deadline {
                Some(deadline) if deadline < ready_at => {
                    tokio::time::sleep_until(deadline).await;
                    return Err(BackendError::Timeout {
                        backend: BACKEND_NAME.to_string(),
                        detail: format!("deadline passed after {}ms", latency.as_millis()),
                    });
                }
                _ => tokio::time::sleep_until(ready_at).await,
            }
        }

        if let Some(fault) = self.fault.read().await.clone() {
            return Err(fault);
        }
        Ok(())
    }

    fn not_found(key: &str) -> BackendError {
        BackendError::KeyNotFound {
            backend: BACKEND_NAME.to_string(),
            key: key.to_string(),
            raw_message: Some("Key not found".to_string()),
        }
    }
}

fn has_descendants(entries: &BTreeMap<String, Entry>, key: &str) -> bool {
    let prefix = format!("{key}/");
    entries
        .range(prefix.clone()..)
        .next()
        .is_some_and(|(k, _)| k.starts_with(&prefix))
}

/// Nearest proper ancestor of `key` that holds a value, if any.
fn file_ancestor<'a>(entries: &'a BTreeMap<String, Entry>, key: &str) -> Option<&'a str> {
    key.match_indices('/')
        .rev()
        .filter(|&(i, _)| i > 0)
        .find_map(|(i, _)| entries.get_key_value(&key[..i]).map(|(k, _)| k.as_str()))
}

#[async_trait]
impl KeyValueBackend for MemoryBackend {
    fn id(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn get(&self, key: &str, opts: &GetOptions) -> Result<StoreResponse> {
        self.enter(
            BackendCall::Get {
                key: key.to_string(),
                quorum: opts.quorum,
            },
            opts.deadline,
        )
        .await?;

        let state = self.state.read().await;
        let entry = state.entries.get(key).ok_or_else(|| Self::not_found(key))?;
        Ok(StoreResponse {
            action: StoreAction::Get,
            key: key.to_string(),
            value: Some(entry.value.clone()),
            revision: entry.modified_index,
            prev_value: None,
        })
    }

    async fn create(&self, key: &str, value: &str, opts: &PutOptions) -> Result<StoreResponse> {
        self.enter(
            BackendCall::Create {
                key: key.to_string(),
                value: value.to_string(),
            },
            opts.deadline,
        )
        .await?;

        let mut state = self.state.write().await;
        // 与 etcd 一致：只有子节点的路径是目录，同样视为已存在
        if state.entries.contains_key(key) || has_descendants(&state.entries, key) {
            return Err(BackendError::KeyExists {
                backend: BACKEND_NAME.to_string(),
                key: key.to_string(),
                raw_message: Some("Key already exists".to_string()),
            });
        }
        if let Some(parent) = file_ancestor(&state.entries, key) {
            return Err(BackendError::InvalidRequest {
                backend: BACKEND_NAME.to_string(),
                key: key.to_string(),
                detail: format!("Not a directory ({parent})"),
            });
        }
        state.index += 1;
        let modified_index = state.index;
        state.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                modified_index,
            },
        );
        log::debug!("[{BACKEND_NAME}] created {key} at index {modified_index}");

        Ok(StoreResponse {
            action: StoreAction::Create,
            key: key.to_string(),
            value: Some(value.to_string()),
            revision: modified_index,
            prev_value: None,
        })
    }

    async fn update(&self, key: &str, value: &str, opts: &PutOptions) -> Result<StoreResponse> {
        self.enter(
            BackendCall::Update {
                key: key.to_string(),
                value: value.to_string(),
            },
            opts.deadline,
        )
        .await?;

        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let Some(entry) = state.entries.get_mut(key) else {
            return Err(Self::not_found(key));
        };
        state.index += 1;
        let modified_index = state.index;
        let prev_value = std::mem::replace(&mut entry.value, value.to_string());
        entry.modified_index = modified_index;

        Ok(StoreResponse {
            action: StoreAction::Update,
            key: key.to_string(),
            value: Some(value.to_string()),
            revision: modified_index,
            prev_value: Some(prev_value),
        })
    }

    async fn delete(&self, key: &str, opts: &DeleteOptions) -> Result<StoreResponse> {
        self.enter(
            BackendCall::Delete {
                key: key.to_string(),
                recursive: opts.recursive,
            },
            opts.deadline,
        )
        .await?;

        let mut state = self.state.write().await;
        let removed = state.entries.remove(key);
        if removed.is_none() && !(opts.recursive && has_descendants(&state.entries, key)) {
            // 目录上没有记录：与 etcd 的 "Not a file" 一样按键不存在处理
            return Err(Self::not_found(key));
        }
        if opts.recursive {
            let prefix = format!("{key}/");
            state.entries.retain(|k, _| !k.starts_with(&prefix));
        }
        state.index += 1;

        Ok(StoreResponse {
            action: StoreAction::Delete,
            key: key.to_string(),
            value: None,
            revision: state.index,
            prev_value: removed.map(|entry| entry.value),
        })
    }
}
