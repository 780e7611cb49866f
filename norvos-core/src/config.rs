//! Component configuration

use norvos_backend::BackendConfig;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::keymap::KeyRoot;

/// Settings read by [`DnsComponent::start`](crate::DnsComponent::start).
///
/// ```json
/// {
///   "backend": { "type": "etcd", "endpoint": "http://127.0.0.1:2379" },
///   "keyRoot": "coredns"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentConfig {
    pub backend: BackendConfig,
    #[serde(default)]
    pub key_root: KeyRoot,
}

impl ComponentConfig {
    pub fn new(backend: BackendConfig) -> Self {
        Self {
            backend,
            key_root: KeyRoot::default(),
        }
    }

    /// Parse a JSON configuration document.
    pub fn from_json(raw: &str) -> CoreResult<Self> {
        serde_json::from_str(raw).map_err(|e| CoreError::Config(e.to_string()))
    }
}

impl Default for ComponentConfig {
    /// Local etcd at the default endpoint, `/coredns/` root.
    fn default() -> Self {
        Self::new(BackendConfig::Etcd {
            endpoint: norvos_backend::DEFAULT_ETCD_ENDPOINT.to_string(),
            username: None,
            password: None,
            connect_timeout_secs: norvos_backend::DEFAULT_CONNECT_TIMEOUT_SECS,
        })
    }
}
