//! etcd v2 error mapping

use crate::error::BackendError;
use crate::traits::{BackendErrorMapper, ErrorContext, RawApiError};

use super::{BACKEND_NAME, EtcdBackend};

/// etcd v2 error code mapping
/// Reference: <https://github.com/etcd-io/etcd/blob/release-2.3/Documentation/errorcode.md>
impl BackendErrorMapper for EtcdBackend {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> BackendError {
        match raw.code.as_deref() {
            // 100: Key not found
            // 102: Not a file（目录上没有记录，按键不存在处理）
            Some("100" | "102") => BackendError::KeyNotFound {
                backend: self.backend_name().to_string(),
                key: context.key_or_unknown(),
                raw_message: Some(raw.message),
            },

            // 105: Key already exists
            Some("105") => BackendError::KeyExists {
                backend: self.backend_name().to_string(),
                key: context.key_or_unknown(),
                raw_message: Some(raw.message),
            },

            // 110: The request requires user authentication / insufficient credentials
            Some("110") => BackendError::PermissionDenied {
                backend: self.backend_name().to_string(),
                raw_message: Some(raw.message),
            },

            // Request shape rejected by the store
            // 104: Not a directory
            // 107: Root is read only
            // 108: Directory not empty
            // 200-209: form/query validation (value required, invalid field, ...)
            Some(
                "104" | "107" | "108" | "200" | "201" | "202" | "203" | "204" | "205"
                | "206" | "207" | "208" | "209",
            ) => BackendError::InvalidRequest {
                backend: self.backend_name().to_string(),
                key: context.key_or_unknown(),
                detail: raw.message,
            },

            // Cluster cannot serve the request
            // 300: Raft internal error
            // 301: During leader election
            Some("300" | "301") => BackendError::ClusterUnavailable {
                backend: self.backend_name().to_string(),
                raw_message: Some(raw.message),
            },

            // Other error fallback
            _ => self.unknown_error(raw),
        }
    }
}
