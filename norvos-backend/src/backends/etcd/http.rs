//! etcd v2 HTTP 请求方法

use reqwest::Method;
use tokio::time::Instant;

use crate::error::Result;
use crate::http_client::{HttpUtils, truncate_for_log};
use crate::traits::{BackendErrorMapper, ErrorContext, RawApiError};
use crate::types::remaining;

use super::{EtcdBackend, EtcdErrorBody, EtcdResponse, KEYS_API_PATH};

impl EtcdBackend {
    /// 构建键的完整 URL，逐段做 URL 编码，保留 `/` 层级
    pub(crate) fn key_url(&self, key: &str, query: &str) -> String {
        let encoded: Vec<String> = key
            .trim_start_matches('/')
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        let mut url = format!("{}{KEYS_API_PATH}/{}", self.endpoint, encoded.join("/"));
        if !query.is_empty() {
            url.push('?');
            url.push_str(query);
        }
        url
    }

    /// 执行一次 keys API 请求
    ///
    /// `value` 为 `Some` 时以表单 `value=...` 作为请求体（PUT）。
    /// `deadline` 的剩余时间作为本次请求的超时。
    pub(crate) async fn request(
        &self,
        method: Method,
        key: &str,
        query: &str,
        value: Option<&str>,
        deadline: Option<Instant>,
    ) -> Result<EtcdResponse> {
        let url = self.key_url(key, query);

        let mut builder = self.client.request(method.clone(), &url);
        if let Some(ref username) = self.username {
            builder = builder.basic_auth(username, self.password.as_deref());
        }
        if let Some(value) = value {
            builder = builder.form(&[("value", value)]);
        }
        if let Some(budget) = remaining(deadline) {
            builder = builder.timeout(budget);
        }

        let (status, response_text) =
            HttpUtils::execute_request(builder, self.backend_name(), method.as_str(), &url).await?;

        if (200..300).contains(&status) {
            return HttpUtils::parse_json(&response_text, self.backend_name());
        }

        // etcd 以 JSON 返回错误码；非 JSON（代理页面等）按 HTTP 状态码兜底
        let raw = match serde_json::from_str::<EtcdErrorBody>(&response_text) {
            Ok(body) => RawApiError::with_code(body.error_code.to_string(), body.describe()),
            Err(_) => {
                RawApiError::with_code(format!("HTTP {status}"), truncate_for_log(&response_text))
            }
        };
        log::debug!(
            "[{}] {} {key} failed: {:?} {}",
            self.backend_name(),
            method,
            raw.code,
            raw.message
        );
        Err(self.map_error(raw, ErrorContext::for_key(key)))
    }
}
