//! Record CRUD handlers
//!
//! One [`RecordHandler`] per [`OperationKind`]. Each invocation decodes its
//! input, maps the domain name to a key, makes exactly one backend call under
//! a deadline of at most [`OPERATION_TIMEOUT`], and translates any failure.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use norvos_backend::{
    DeleteOptions, GetOptions, KeyValueBackend, PutOptions, StoreResponse,
};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::context::{RequestContext, OPERATION_TIMEOUT};
use crate::error::{CoreError, CoreResult};
use crate::keymap::KeyMapper;
use crate::record::{decode_name_request, decode_record_request};
use crate::translate::{translate, BackendFailure};

/// The four record operations, as named in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Create,
    Read,
    Update,
    Delete,
}

impl OperationKind {
    pub const ALL: [Self; 4] = [Self::Create, Self::Read, Self::Update, Self::Delete];

    /// Registry name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Human-readable description returned by [`Operation::describe`].
    pub fn description(self) -> &'static str {
        match self {
            Self::Create => "Create a DNS record; fails if one already exists for the name",
            Self::Read => "Read the DNS record stored for a name",
            Self::Update => "Replace the DNS record for a name; fails if none exists",
            Self::Delete => "Delete the DNS record for a name, leaving records below it untouched",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Successful outcome of an operation: the key touched and what the backend reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationResult {
    pub operation: OperationKind,
    pub key: String,
    pub response: StoreResponse,
}

/// A host-invocable operation.
#[async_trait]
pub trait Operation: Send + Sync {
    fn describe(&self) -> &'static str;

    /// Run the operation on a raw JSON input.
    ///
    /// `ctx` is `None` when the host supplied no request context; that yields
    /// [`CoreError::InternalNil`] without touching the backend.
    async fn execute(
        &self,
        ctx: Option<&RequestContext>,
        input: &[u8],
    ) -> CoreResult<OperationResult>;
}

/// Backend call decided by the decoded input.
enum StoreCommand {
    Get,
    Create(String),
    Update(String),
    Delete,
}

/// [`Operation`] backed by a [`KeyValueBackend`].
pub struct RecordHandler {
    kind: OperationKind,
    backend: Arc<dyn KeyValueBackend>,
    mapper: Arc<KeyMapper>,
    timeout: Duration,
}

impl RecordHandler {
    pub fn new(
        kind: OperationKind,
        backend: Arc<dyn KeyValueBackend>,
        mapper: Arc<KeyMapper>,
    ) -> Self {
        Self {
            kind,
            backend,
            mapper,
            timeout: OPERATION_TIMEOUT,
        }
    }

    fn decode(&self, input: &[u8]) -> CoreResult<(String, StoreCommand)> {
        match self.kind {
            OperationKind::Create | OperationKind::Update => {
                let request = decode_record_request(input)?;
                let value = request.payload.encode()?;
                let command = if self.kind == OperationKind::Create {
                    StoreCommand::Create(value)
                } else {
                    StoreCommand::Update(value)
                };
                Ok((request.name, command))
            }
            OperationKind::Read => Ok((decode_name_request(input)?.name, StoreCommand::Get)),
            OperationKind::Delete => Ok((decode_name_request(input)?.name, StoreCommand::Delete)),
        }
    }

    async fn dispatch(
        &self,
        key: &str,
        command: &StoreCommand,
        deadline: Instant,
    ) -> norvos_backend::Result<StoreResponse> {
        let deadline = Some(deadline);
        match command {
            StoreCommand::Get => {
                let opts = GetOptions {
                    quorum: true,
                    deadline,
                };
                self.backend.get(key, &opts).await
            }
            StoreCommand::Create(value) => {
                self.backend
                    .create(key, value, &PutOptions { deadline })
                    .await
            }
            StoreCommand::Update(value) => {
                self.backend
                    .update(key, value, &PutOptions { deadline })
                    .await
            }
            StoreCommand::Delete => {
                let opts = DeleteOptions {
                    recursive: false,
                    deadline,
                };
                self.backend.delete(key, &opts).await
            }
        }
    }

    async fn run(&self, ctx: &RequestContext, input: &[u8]) -> CoreResult<OperationResult> {
        let (name, command) = self.decode(input)?;
        let key = self.mapper.map_to_key(&name)?;

        let started = Instant::now();
        let deadline = ctx.bounded(self.timeout);
        let budget = deadline.saturating_duration_since(started);

        log::debug!(
            "[{}] {} -> {key} via {} (budget {}ms)",
            self.kind,
            name.trim(),
            self.backend.id(),
            budget.as_millis()
        );

        // timeout_at polls the call once before it looks at the timer
        if deadline <= started {
            return Err(translate(
                self.kind,
                &key,
                budget,
                BackendFailure::DeadlineExceeded,
            ));
        }

        let outcome =
            tokio::time::timeout_at(deadline, self.dispatch(&key, &command, deadline)).await;

        match outcome {
            Ok(Ok(response)) => Ok(OperationResult {
                operation: self.kind,
                key,
                response,
            }),
            Ok(Err(e)) => Err(translate(self.kind, &key, budget, BackendFailure::Backend(e))),
            Err(_) => Err(translate(
                self.kind,
                &key,
                budget,
                BackendFailure::DeadlineExceeded,
            )),
        }
    }
}

#[async_trait]
impl Operation for RecordHandler {
    fn describe(&self) -> &'static str {
        self.kind.description()
    }

    async fn execute(
        &self,
        ctx: Option<&RequestContext>,
        input: &[u8],
    ) -> CoreResult<OperationResult> {
        let result = match ctx {
            Some(ctx) => self.run(ctx, input).await,
            None => Err(CoreError::InternalNil),
        };

        if let Err(e) = &result {
            if e.is_expected() {
                log::warn!("[{}] {e}", self.kind);
            } else {
                log::error!("[{}] {e}", self.kind);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_utils::{memory_handler, record_input, name_input, StalledBackend};
    use norvos_backend::{BackendCall, BackendError, StoreAction};

    #[test]
    fn test_operation_names() {
        let names: Vec<_> = OperationKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names, ["create", "read", "update", "delete"]);
        assert_eq!(
            serde_json::to_string(&OperationKind::Update).unwrap(),
            r#""update""#
        );
    }

    #[tokio::test]
    async fn test_create_stores_skydns_json() {
        let (backend, handler) = memory_handler(OperationKind::Create);
        let ctx = RequestContext::background();

        let result = handler
            .execute(Some(&ctx), &record_input("www.example.com", "10.0.0.1", None))
            .await
            .unwrap();

        assert_eq!(result.operation, OperationKind::Create);
        assert_eq!(result.key, "/coredns/com/example/www");
        assert_eq!(result.response.action, StoreAction::Create);

        let stored = backend.value("/coredns/com/example/www").await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&stored).unwrap();
        assert_eq!(json["host"], "10.0.0.1");
        assert_eq!(json["ttl"], 300);
    }

    #[tokio::test]
    async fn test_read_is_quorum() {
        let (backend, handler) = memory_handler(OperationKind::Read);
        backend.seed("/coredns/com/example/www", r#"{"host":"10.0.0.1"}"#).await;

        let result = handler
            .execute(Some(&RequestContext::background()), &name_input("www.example.com"))
            .await
            .unwrap();

        assert_eq!(
            result.response.value.as_deref(),
            Some(r#"{"host":"10.0.0.1"}"#)
        );
        assert_eq!(
            backend.calls().await,
            vec![BackendCall::Get {
                key: "/coredns/com/example/www".into(),
                quorum: true,
            }]
        );
    }

    #[tokio::test]
    async fn test_delete_is_single_node() {
        let (backend, handler) = memory_handler(OperationKind::Delete);
        backend.seed("/coredns/com/example", "{}").await;
        backend.seed("/coredns/com/example/www", "{}").await;

        handler
            .execute(Some(&RequestContext::background()), &name_input("example.com"))
            .await
            .unwrap();

        assert_eq!(backend.keys().await, vec!["/coredns/com/example/www"]);
        assert_eq!(
            backend.calls().await,
            vec![BackendCall::Delete {
                key: "/coredns/com/example".into(),
                recursive: false,
            }]
        );
    }

    #[tokio::test]
    async fn test_missing_context_is_internal_nil() {
        let (backend, handler) = memory_handler(OperationKind::Read);
        let err = handler
            .execute(None, &name_input("www.example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InternalNil);
        assert!(backend.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_input_skips_backend() {
        let (backend, handler) = memory_handler(OperationKind::Update);
        let ctx = RequestContext::background();

        let cases: [&[u8]; 3] = [
            b"{",
            br#"{"name":"www.example.com"}"#,
            br#"{"name":"  ","host":"10.0.0.1"}"#,
        ];
        for input in cases {
            let err = handler.execute(Some(&ctx), input).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "{input:?}");
        }
        assert!(backend.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_backend_fault_is_unavailable() {
        let (backend, handler) = memory_handler(OperationKind::Read);
        backend
            .set_fault(Some(BackendError::ClusterUnavailable {
                backend: "memory".into(),
                raw_message: None,
            }))
            .await;

        let err = handler
            .execute(Some(&RequestContext::background()), &name_input("www.example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unavailable);
        assert_eq!(err.status_hint(), 502);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_backend_times_out_at_five_seconds() {
        let handler = RecordHandler::new(
            OperationKind::Read,
            Arc::new(StalledBackend),
            Arc::new(KeyMapper::default()),
        );

        let started = Instant::now();
        let err = handler
            .execute(Some(&RequestContext::background()), &name_input("www.example.com"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Timeout);
        let elapsed = started.elapsed();
        assert!(
            elapsed >= OPERATION_TIMEOUT && elapsed < OPERATION_TIMEOUT + Duration::from_millis(10),
            "{elapsed:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_deadline_skips_backend() {
        let (backend, handler) = memory_handler(OperationKind::Delete);
        backend.seed("/coredns/com/example/www", "{}").await;
        let ctx = RequestContext::with_deadline(Instant::now());
        tokio::time::advance(Duration::from_millis(10)).await;

        let err = handler
            .execute(Some(&ctx), &name_input("www.example.com"))
            .await
            .unwrap_err();

        assert!(
            matches!(err, CoreError::Timeout { budget_ms: 0, .. }),
            "{err:?}"
        );
        assert!(backend.calls().await.is_empty());
        assert_eq!(backend.keys().await, vec!["/coredns/com/example/www"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_caller_deadline_shortens_budget() {
        let handler = RecordHandler::new(
            OperationKind::Delete,
            Arc::new(StalledBackend),
            Arc::new(KeyMapper::default()),
        );

        let started = Instant::now();
        let ctx = RequestContext::with_timeout(Duration::from_millis(250));
        let err = handler
            .execute(Some(&ctx), &name_input("www.example.com"))
            .await
            .unwrap_err();

        assert!(
            matches!(err, CoreError::Timeout { budget_ms: 250, .. }),
            "{err:?}"
        );
        assert!(started.elapsed() < Duration::from_millis(260));
    }
}
