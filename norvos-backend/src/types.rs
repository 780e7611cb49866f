use serde::{Deserialize, Serialize};
use tokio::time::Instant;

// ============ Request Options ============

/// Options for [`get`](crate::KeyValueBackend::get).
///
/// # Default
///
/// The default is a quorum read with no deadline.
#[derive(Debug, Clone, Copy)]
pub struct GetOptions {
    /// Require the read to be served through consensus rather than from
    /// a possibly stale local replica.
    pub quorum: bool,
    /// Instant after which the caller stops waiting.
    pub deadline: Option<Instant>,
}

impl Default for GetOptions {
    fn default() -> Self {
        Self {
            quorum: true,
            deadline: None,
        }
    }
}

/// Options for the conditional writes [`create`](crate::KeyValueBackend::create)
/// and [`update`](crate::KeyValueBackend::update).
#[derive(Debug, Clone, Copy, Default)]
pub struct PutOptions {
    /// Instant after which the caller stops waiting.
    pub deadline: Option<Instant>,
}

/// Options for [`delete`](crate::KeyValueBackend::delete).
///
/// # Default
///
/// The default is a single-node (non-recursive) delete with no deadline.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeleteOptions {
    /// Remove descendants as well. Callers in this workspace always pass `false`.
    pub recursive: bool,
    /// Instant after which the caller stops waiting.
    pub deadline: Option<Instant>,
}

/// Remaining budget until `deadline`, or `None` when there is no deadline.
///
/// An already-passed deadline yields a zero duration.
pub fn remaining(deadline: Option<Instant>) -> Option<std::time::Duration> {
    deadline.map(|d| d.saturating_duration_since(Instant::now()))
}

// ============ Responses ============

/// The store action that produced a [`StoreResponse`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreAction {
    /// A read.
    Get,
    /// A create-if-absent write.
    Create,
    /// An update-if-present write.
    Update,
    /// A single-node delete.
    Delete,
}

impl std::fmt::Display for StoreAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// The raw result of a backend call.
///
/// Kept close to what the store reports: the key it touched, the value now
/// stored there (absent after a delete), the store revision of the change,
/// and the previous value for writes that replaced or removed one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoreResponse {
    /// Action the store performed.
    pub action: StoreAction,
    /// Key the action applied to.
    pub key: String,
    /// Value at the key after the action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Store revision (modification index) of the node.
    pub revision: u64,
    /// Value at the key before the action, for update/delete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_value: Option<String>,
}

// ============ Backend Types ============

/// Identifies which backend implementation to use.
///
/// Each variant is gated behind its corresponding feature flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    /// etcd v2 keys API over HTTP. Requires feature `etcd`.
    #[cfg(feature = "etcd")]
    Etcd,
    /// Process-local store. Requires feature `memory`.
    #[cfg(feature = "memory")]
    Memory,
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "etcd")]
            Self::Etcd => write!(f, "etcd"),
            #[cfg(feature = "memory")]
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Default etcd client URL.
pub const DEFAULT_ETCD_ENDPOINT: &str = "http://127.0.0.1:2379";
/// Default connect timeout (seconds) for HTTP backends.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for a backend, tagged by `type`.
///
/// ```json
/// { "type": "etcd", "endpoint": "http://10.0.0.5:2379", "username": "root", "password": "pw" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendConfig {
    /// etcd v2 keys API.
    #[cfg(feature = "etcd")]
    Etcd {
        /// Base URL of one etcd client endpoint.
        #[serde(default = "default_etcd_endpoint")]
        endpoint: String,
        /// Basic-auth user, when etcd auth is enabled.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        username: Option<String>,
        /// Basic-auth password.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        password: Option<String>,
        /// TCP connect timeout in seconds.
        #[serde(default = "default_connect_timeout", rename = "connectTimeoutSecs")]
        connect_timeout_secs: u64,
    },
    /// In-process store with no persistence.
    #[cfg(feature = "memory")]
    Memory,
}

#[cfg(feature = "etcd")]
fn default_etcd_endpoint() -> String {
    DEFAULT_ETCD_ENDPOINT.to_string()
}

#[cfg(feature = "etcd")]
fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

impl BackendConfig {
    /// Which backend this configuration builds.
    pub fn backend_type(&self) -> BackendType {
        match self {
            #[cfg(feature = "etcd")]
            Self::Etcd { .. } => BackendType::Etcd,
            #[cfg(feature = "memory")]
            Self::Memory => BackendType::Memory,
        }
    }
}
