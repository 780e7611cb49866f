//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use norvos_backend::BackendError;

use crate::handler::OperationKind;

/// Stable outcome taxonomy observable by the host.
///
/// Backend vocabulary never leaks past this enum; hosts match on it (or on
/// [`ErrorKind::status_hint`]) instead of on store error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// The request could not be decoded or named no usable key.
    InvalidInput,
    /// Create found the record already present.
    Conflict,
    /// Read, Update or Delete found no record.
    Missing,
    /// The call was abandoned at its deadline; backend state is unknown.
    Timeout,
    /// The backend failed for any other reason.
    Unavailable,
    /// The host invoked an operation without a request context.
    InternalNil,
}

impl ErrorKind {
    /// Suggested HTTP-class status for hosts that answer over a network protocol.
    pub fn status_hint(self) -> u16 {
        match self {
            Self::InvalidInput => 400,
            Self::Conflict => 409,
            Self::Missing => 404,
            Self::Timeout => 504,
            Self::Unavailable => 502,
            Self::InternalNil => 500,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::InvalidInput => "InvalidInput",
            Self::Conflict => "Conflict",
            Self::Missing => "Missing",
            Self::Timeout => "Timeout",
            Self::Unavailable => "Unavailable",
            Self::InternalNil => "InternalNil",
        };
        f.write_str(name)
    }
}

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Malformed payload, missing field, or empty domain name
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Create-if-absent found an existing record
    #[error("Record already exists: {key}")]
    Conflict { key: String },

    /// No record at the key
    #[error("Record not found: {key}")]
    Missing { key: String },

    /// Deadline exceeded before the backend answered
    #[error("{operation} '{key}' timed out after {budget_ms}ms")]
    Timeout {
        operation: OperationKind,
        key: String,
        budget_ms: u64,
    },

    /// Any other backend failure
    #[error("{operation} '{key}' failed: {source}")]
    Unavailable {
        operation: OperationKind,
        key: String,
        source: BackendError,
    },

    /// Operation invoked without a request context
    #[error("Request context is missing")]
    InternalNil,

    /// Operations discovered before `start` or after `stop`
    #[error("Component is not started")]
    NotStarted,

    /// `start` called on a running component
    #[error("Component is already started")]
    AlreadyStarted,

    /// Component configuration rejected
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CoreError {
    /// Position of this error in the stable taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) | Self::Config(_) => ErrorKind::InvalidInput,
            Self::Conflict { .. } | Self::AlreadyStarted => ErrorKind::Conflict,
            Self::Missing { .. } => ErrorKind::Missing,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Unavailable { .. } | Self::NotStarted => ErrorKind::Unavailable,
            Self::InternalNil => ErrorKind::InternalNil,
        }
    }

    /// Suggested HTTP-class status, see [`ErrorKind::status_hint`].
    pub fn status_hint(&self) -> u16 {
        self.kind().status_hint()
    }

    /// Whether it is expected behavior (bad input, record exists/absent), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update [`CoreError::kind`] simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidInput | ErrorKind::Conflict | ErrorKind::Missing
        )
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
