//! etcd v2 keys API backend

mod backend;
mod error;
mod http;
mod types;

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::{BackendError, Result};
use crate::http_client::HttpUtils;

pub(crate) use types::{EtcdErrorBody, EtcdNode, EtcdResponse};

/// Identifier reported in errors and logs.
pub(crate) const BACKEND_NAME: &str = "etcd";
/// Path of the v2 keys API under the client URL.
pub(crate) const KEYS_API_PATH: &str = "/v2/keys";

/// etcd v2 backend
///
/// Speaks the v2 keys API, the storage layout SkyDNS and the CoreDNS `etcd`
/// plugin (v2 mode) read records from.
pub struct EtcdBackend {
    pub(crate) client: Client,
    /// Client URL without trailing slash, e.g. `http://127.0.0.1:2379`.
    pub(crate) endpoint: String,
    pub(crate) username: Option<String>,
    pub(crate) password: Option<String>,
}

impl EtcdBackend {
    /// Build a backend for one etcd client endpoint.
    ///
    /// # Errors
    /// [`BackendError::ConfigError`] when the endpoint is not an absolute
    /// `http`/`https` URL or the HTTP client cannot be built.
    pub fn new(
        endpoint: &str,
        username: Option<String>,
        password: Option<String>,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let parsed = Url::parse(endpoint).map_err(|e| BackendError::ConfigError {
            backend: BACKEND_NAME.to_string(),
            detail: format!("invalid endpoint '{endpoint}': {e}"),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(BackendError::ConfigError {
                backend: BACKEND_NAME.to_string(),
                detail: format!("unsupported endpoint scheme '{}'", parsed.scheme()),
            });
        }

        Ok(Self {
            client: HttpUtils::build_client(BACKEND_NAME, connect_timeout)?,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            username,
            password,
        })
    }

    /// Client URL this backend talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_trailing_slash_is_dropped() {
        let backend =
            EtcdBackend::new("http://127.0.0.1:2379/", None, None, Duration::from_secs(1)).unwrap();
        assert_eq!(backend.endpoint(), "http://127.0.0.1:2379");
    }

    #[test]
    fn relative_endpoint_is_rejected() {
        let result = EtcdBackend::new("127.0.0.1:2379/keys", None, None, Duration::from_secs(1));
        assert!(matches!(result, Err(BackendError::ConfigError { .. })));
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let result = EtcdBackend::new("unix:///var/run/etcd.sock", None, None, Duration::from_secs(1));
        assert!(matches!(
            result,
            Err(BackendError::ConfigError { detail, .. }) if detail.contains("unix")
        ));
    }
}
