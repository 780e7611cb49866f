//! Per-request context supplied by the host

use std::time::Duration;

use tokio::time::Instant;

/// Upper bound on every backend call made by a handler.
pub const OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Cancellation scope of one host request.
///
/// Carries only the caller's deadline. Handlers derive a subordinate deadline
/// from it with [`RequestContext::bounded`], which can only shorten it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestContext {
    deadline: Option<Instant>,
}

impl RequestContext {
    /// Context with no deadline of its own.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// The earlier of the caller's deadline and `now + budget`.
    pub fn bounded(&self, budget: Duration) -> Instant {
        let own = Instant::now() + budget;
        match self.deadline {
            Some(caller) => caller.min(own),
            None => own,
        }
    }
}
