//! Errors raised by actor code and the per-instance facilities it uses.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::client::SidecarError;

/// Failure inside an actor method, lifecycle hook, or state operation.
///
/// This is the error type user-registered methods and hooks return; the
/// manager wraps it into
/// [`RuntimeError`](crate::runtime::RuntimeError) on the way back to the
/// sidecar, after resetting the state tracker.
#[derive(Debug, Error)]
pub enum ActorError {
    /// `add_state` on a name that already holds a value.
    #[error("actor state {0:?} already exists")]
    StateAlreadyExists(String),

    /// `get_state`/`remove_state` on a name with no value.
    #[error("actor state {0:?} was not found")]
    StateNotFound(String),

    /// A timer fire referenced a name missing from the timer table.
    #[error("timer {0:?} is not registered on this actor")]
    TimerNotFound(String),

    /// Domain failure raised by actor code.
    #[error("actor method failed: {0}")]
    MethodFailed(String),

    /// An outbound sidecar call failed.
    #[error(transparent)]
    Sidecar(#[from] SidecarError),

    /// A value refused to round-trip through the serializer.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ActorError {
    /// Shorthand for a domain failure raised by actor code.
    pub fn method_failed(message: impl Into<String>) -> Self {
        Self::MethodFailed(message.into())
    }
}
