//! Backend factory.

use std::sync::Arc;

use crate::error::Result;
use crate::traits::KeyValueBackend;
use crate::types::BackendConfig;

#[cfg(feature = "etcd")]
use crate::backends::EtcdBackend;
#[cfg(feature = "memory")]
use crate::backends::MemoryBackend;

/// Creates a [`KeyValueBackend`] from its configuration.
///
/// The concrete backend is determined by the [`BackendConfig`] variant. The
/// returned handle is wrapped in `Arc<dyn KeyValueBackend>` so one instance can
/// be shared by every concurrent caller.
///
/// # Examples
///
/// ```rust,no_run
/// use norvos_backend::{create_backend, BackendConfig};
///
/// let backend = create_backend(&BackendConfig::Etcd {
///     endpoint: "http://127.0.0.1:2379".to_string(),
///     username: None,
///     password: None,
///     connect_timeout_secs: 10,
/// }).unwrap();
/// ```
pub fn create_backend(config: &BackendConfig) -> Result<Arc<dyn KeyValueBackend>> {
    let backend: Arc<dyn KeyValueBackend> = match config {
        #[cfg(feature = "etcd")]
        BackendConfig::Etcd {
            endpoint,
            username,
            password,
            connect_timeout_secs,
        } => Arc::new(EtcdBackend::new(
            endpoint,
            username.clone(),
            password.clone(),
            std::time::Duration::from_secs(*connect_timeout_secs),
        )?),
        #[cfg(feature = "memory")]
        BackendConfig::Memory => Arc::new(MemoryBackend::new()),
    };
    log::info!("Backend initialized: {}", config.backend_type());
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "memory")]
    #[test]
    fn memory_config_builds_memory_backend() {
        let backend = create_backend(&BackendConfig::Memory).unwrap();
        assert_eq!(backend.id(), "memory");
    }

    #[cfg(feature = "etcd")]
    #[test]
    fn etcd_config_builds_etcd_backend() {
        let backend = create_backend(&BackendConfig::Etcd {
            endpoint: "http://10.0.0.5:2379".to_string(),
            username: Some("root".to_string()),
            password: Some("secret".to_string()),
            connect_timeout_secs: 3,
        })
        .unwrap();
        assert_eq!(backend.id(), "etcd");
    }

    #[cfg(feature = "etcd")]
    #[test]
    fn bad_etcd_endpoint_is_config_error() {
        let result = create_backend(&BackendConfig::Etcd {
            endpoint: "not a url".to_string(),
            username: None,
            password: None,
            connect_timeout_secs: 3,
        });
        assert!(matches!(
            result,
            Err(crate::BackendError::ConfigError { .. })
        ));
    }
}
