//! Shared HTTP request handling for HTTP-speaking backends.
//!
//! Each backend builds its own `RequestBuilder` (URL layout, auth, form body);
//! this module owns the part every backend repeats: sending, status
//! classification, body reading, logging and JSON decoding.
//!
//! Requests are sent exactly once. Whether a failure is worth retrying is the
//! host's decision, not the backend's.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::BackendError;

/// Longest response body excerpt written to the log.
const LOG_BODY_LIMIT: usize = 256;

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Build a client with the given connect timeout.
    ///
    /// No overall request timeout is set here: each request carries the
    /// remaining budget of its caller's deadline instead.
    pub fn build_client(backend_name: &str, connect_timeout: Duration) -> Result<Client, BackendError> {
        Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| BackendError::ConfigError {
                backend: backend_name.to_string(),
                detail: format!("failed to build HTTP client: {e}"),
            })
    }

    /// Performs an HTTP request and returns the status code and body text.
    ///
    /// # Errors
    /// * [`BackendError::Timeout`] when the request's timeout elapsed
    /// * [`BackendError::NetworkError`] on transport failure or HTTP 502/503/504
    pub async fn execute_request(
        request_builder: RequestBuilder,
        backend_name: &str,
        method_name: &str,
        url: &str,
    ) -> Result<(u16, String), BackendError> {
        log::debug!("[{backend_name}] {method_name} {url}");

        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout {
                    backend: backend_name.to_string(),
                    detail: e.to_string(),
                }
            } else {
                BackendError::NetworkError {
                    backend: backend_name.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        log::debug!("[{backend_name}] Response Status: {status_code}");

        // A proxy or load balancer in front of the store answered instead of the store.
        if matches!(status_code, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{backend_name}] Gateway error (HTTP {status_code})");
            return Err(BackendError::NetworkError {
                backend: backend_name.to_string(),
                detail: format!("HTTP {status_code}: {}", truncate_for_log(&body)),
            });
        }

        let response_text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout {
                    backend: backend_name.to_string(),
                    detail: format!("reading response body: {e}"),
                }
            } else {
                BackendError::NetworkError {
                    backend: backend_name.to_string(),
                    detail: format!("Failed to read response body: {e}"),
                }
            }
        })?;

        log::debug!(
            "[{backend_name}] Response Body: {}",
            truncate_for_log(&response_text)
        );

        Ok((status_code, response_text))
    }

    /// Parse a JSON response body.
    ///
    /// # Errors
    /// * [`BackendError::ParseError`] when the body does not match `T`
    pub fn parse_json<T>(response_text: &str, backend_name: &str) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(response_text).map_err(|e| {
            log::error!("[{backend_name}] JSON parse failed: {e}");
            log::error!(
                "[{backend_name}] Raw response: {}",
                truncate_for_log(response_text)
            );
            BackendError::ParseError {
                backend: backend_name.to_string(),
                detail: e.to_string(),
            }
        })
    }
}

/// Cut `s` to at most [`LOG_BODY_LIMIT`] bytes on a char boundary, noting the
/// full length when anything was dropped. Stored record values can be large.
pub(crate) fn truncate_for_log(s: &str) -> String {
    if s.len() <= LOG_BODY_LIMIT {
        return s.to_string();
    }
    let cut = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= LOG_BODY_LIMIT)
        .last()
        .unwrap_or(0);
    format!("{}... [truncated, total {} bytes]", &s[..cut], s.len())
}
