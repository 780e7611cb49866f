use serde::{Deserialize, Serialize};

/// Unified error type for all key-value backend operations.
///
/// Each variant carries a `backend` field identifying which backend produced the
/// error, plus variant-specific context. Backend-native error codes are folded
/// into these variants by each backend's error mapper; nothing above this crate
/// should need to know the numeric codes of a particular store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum BackendError {
    /// A network-level error occurred (connection refused, reset, DNS failure,
    /// or a gateway-class HTTP status from a proxy in front of the store).
    NetworkError {
        /// Backend that produced the error.
        backend: String,
        /// Error details.
        detail: String,
    },

    /// The request did not complete within its deadline.
    ///
    /// The store may still have applied the write.
    Timeout {
        /// Backend that produced the error.
        backend: String,
        /// Error details.
        detail: String,
    },

    /// The key does not exist.
    KeyNotFound {
        /// Backend that produced the error.
        backend: String,
        /// Key that was not found.
        key: String,
        /// Original error message from the store, if available.
        raw_message: Option<String>,
    },

    /// A create-if-absent write found the key already present.
    KeyExists {
        /// Backend that produced the error.
        backend: String,
        /// Key that already exists.
        key: String,
        /// Original error message from the store, if available.
        raw_message: Option<String>,
    },

    /// The store rejected the request shape (e.g. the key is a directory,
    /// a directory is not empty, the root is read-only, a form field is missing).
    InvalidRequest {
        /// Backend that produced the error.
        backend: String,
        /// Key the request addressed.
        key: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// The authenticated user lacks permission for the requested key.
    PermissionDenied {
        /// Backend that produced the error.
        backend: String,
        /// Original error message from the store, if available.
        raw_message: Option<String>,
    },

    /// The store cluster could not serve the request (no leader, raft failure).
    ClusterUnavailable {
        /// Backend that produced the error.
        backend: String,
        /// Original error message from the store, if available.
        raw_message: Option<String>,
    },

    /// Failed to parse the store's response.
    ParseError {
        /// Backend that produced the error.
        backend: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// The backend handle could not be constructed from its configuration.
    ConfigError {
        /// Backend that produced the error.
        backend: String,
        /// Details about the configuration problem.
        detail: String,
    },

    /// An unrecognized error from the store.
    ///
    /// Catch-all for error codes not yet mapped to a specific variant.
    Unknown {
        /// Backend that produced the error.
        backend: String,
        /// Raw error code, if available.
        raw_code: Option<String>,
        /// Raw error message.
        raw_message: String,
    },
}

impl BackendError {
    /// 是否为预期行为（键不存在、键已存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::KeyNotFound { .. }
                | Self::KeyExists { .. }
                | Self::InvalidRequest { .. }
                | Self::PermissionDenied { .. }
        )
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { backend, detail } => {
                write!(f, "[{backend}] Network error: {detail}")
            }
            Self::Timeout { backend, detail } => {
                write!(f, "[{backend}] Request timeout: {detail}")
            }
            Self::KeyNotFound { backend, key, .. } => {
                write!(f, "[{backend}] Key '{key}' not found")
            }
            Self::KeyExists { backend, key, .. } => {
                write!(f, "[{backend}] Key '{key}' already exists")
            }
            Self::InvalidRequest {
                backend,
                key,
                detail,
            } => {
                write!(f, "[{backend}] Invalid request for '{key}': {detail}")
            }
            Self::PermissionDenied {
                backend,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{backend}] Permission denied: {msg}")
                } else {
                    write!(f, "[{backend}] Permission denied")
                }
            }
            Self::ClusterUnavailable {
                backend,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{backend}] Cluster unavailable: {msg}")
                } else {
                    write!(f, "[{backend}] Cluster unavailable")
                }
            }
            Self::ParseError { backend, detail } => {
                write!(f, "[{backend}] Parse error: {detail}")
            }
            Self::ConfigError { backend, detail } => {
                write!(f, "[{backend}] Configuration error: {detail}")
            }
            Self::Unknown {
                backend,
                raw_message,
                ..
            } => {
                write!(f, "[{backend}] {raw_message}")
            }
        }
    }
}

impl std::error::Error for BackendError {}

/// Convenience type alias for `Result<T, BackendError>`.
pub type Result<T> = std::result::Result<T, BackendError>;
