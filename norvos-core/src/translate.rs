//! Backend failure to [`CoreError`] translation

use std::time::Duration;

use norvos_backend::BackendError;

use crate::error::CoreError;
use crate::handler::OperationKind;

/// Why a backend call did not produce a response.
#[derive(Debug)]
pub enum BackendFailure {
    /// The backend answered with an error.
    Backend(BackendError),
    /// The handler stopped waiting at its deadline.
    DeadlineExceeded,
}

impl From<BackendError> for BackendFailure {
    fn from(e: BackendError) -> Self {
        Self::Backend(e)
    }
}

/// Translate a failed call of `operation` on `key` into the stable taxonomy.
///
/// | failure | operation | result |
/// |---------|-----------|--------|
/// | deadline passed (either side) | any | `Timeout` |
/// | key exists | create | `Conflict` |
/// | key not found | read, update, delete | `Missing` |
/// | anything else | any | `Unavailable` |
pub fn translate(
    operation: OperationKind,
    key: &str,
    budget: Duration,
    failure: BackendFailure,
) -> CoreError {
    let key = key.to_string();
    match failure {
        BackendFailure::DeadlineExceeded | BackendFailure::Backend(BackendError::Timeout { .. }) => {
            CoreError::Timeout {
                operation,
                key,
                budget_ms: u64::try_from(budget.as_millis()).unwrap_or(u64::MAX),
            }
        }
        BackendFailure::Backend(BackendError::KeyExists { .. })
            if operation == OperationKind::Create =>
        {
            CoreError::Conflict { key }
        }
        BackendFailure::Backend(BackendError::KeyNotFound { .. })
            if operation != OperationKind::Create =>
        {
            CoreError::Missing { key }
        }
        BackendFailure::Backend(source) => CoreError::Unavailable {
            operation,
            key,
            source,
        },
    }
}
