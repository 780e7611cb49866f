use async_trait::async_trait;

use crate::error::{BackendError, Result};
use crate::types::{DeleteOptions, GetOptions, PutOptions, StoreResponse};

/// 原始存储错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（各 Backend 格式不同）
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
}

impl RawApiError {
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
/// 用于在映射错误时提供额外信息
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 请求涉及的键
    pub key: Option<String>,
}

impl ErrorContext {
    pub fn for_key(key: &str) -> Self {
        Self {
            key: Some(key.to_string()),
        }
    }

    pub fn key_or_unknown(&self) -> String {
        self.key.clone().unwrap_or_else(|| "<unknown>".to_string())
    }
}

/// Backend 错误映射 Trait（内部使用）
/// 各 Backend 实现此 trait 以将原始错误码映射到统一错误类型
pub(crate) trait BackendErrorMapper {
    /// 返回 Backend 标识符
    fn backend_name(&self) -> &'static str;

    /// 将原始错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> BackendError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> BackendError {
        BackendError::ParseError {
            backend: self.backend_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> BackendError {
        BackendError::Unknown {
            backend: self.backend_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Hierarchical key-value store holding DNS records.
///
/// Keys are `/`-separated paths. Implementations must be safe to share across
/// tasks behind an `Arc` with no external locking; a single handle serves every
/// concurrent caller.
///
/// Every call takes its deadline through the options struct. Implementations
/// should give up waiting at the deadline and report
/// [`BackendError::Timeout`]; callers may additionally bound the future
/// themselves.
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    /// Backend identifier.
    fn id(&self) -> &'static str;

    /// Read the value at `key`.
    ///
    /// With `quorum` set, the read reflects every write committed before it
    /// started. Fails with [`BackendError::KeyNotFound`] when absent.
    async fn get(&self, key: &str, opts: &GetOptions) -> Result<StoreResponse>;

    /// Write `value` at `key` only if the key does not exist yet.
    ///
    /// Fails with [`BackendError::KeyExists`] and leaves the stored value
    /// untouched when it does.
    async fn create(&self, key: &str, value: &str, opts: &PutOptions) -> Result<StoreResponse>;

    /// Replace the value at `key` only if the key exists.
    ///
    /// Fails with [`BackendError::KeyNotFound`] and creates nothing when absent.
    async fn update(&self, key: &str, value: &str, opts: &PutOptions) -> Result<StoreResponse>;

    /// Remove `key`.
    ///
    /// Without `recursive`, only the node at `key` is removed; siblings,
    /// parents and descendants are never touched.
    async fn delete(&self, key: &str, opts: &DeleteOptions) -> Result<StoreResponse>;
}
