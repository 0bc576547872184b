//! Runtime-level error taxonomy.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::actor::ActorError;
use crate::client::SidecarError;

/// Errors surfaced by the runtime callback surface.
///
/// Each variant is an error kind the sidecar can identify; nothing is
/// swallowed except a malformed reminder body, which reads as success.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Registration was attempted with an empty method table.
    #[error("actor type {0} has no dispatchable methods registered")]
    NoMethodsRegistered(String),

    /// A callback referenced an actor type that was never registered.
    #[error("actor type {0} is not registered")]
    UnknownActorType(String),

    /// The instance was absent even after an activation attempt, or a
    /// deactivation targeted an id that was never activated.
    #[error("{actor_type}/{actor_id} is not activated")]
    NotActivated {
        actor_type: String,
        actor_id: String,
    },

    /// A reminder fired on a type registered without reminder support.
    #[error("actor type {0} does not consume reminders")]
    NotRemindable(String),

    /// A dispatch named a method missing from the dispatch table.
    #[error("actor type {actor_type} has no method {method}")]
    NoSuchMethod { actor_type: String, method: String },

    /// A reentrant call chain went deeper than the configured limit.
    #[error("reentrant call depth exceeded the configured limit of {max}")]
    ReentrancyDepthExceeded { max: u32 },

    /// An actor method, hook, or state operation failed. The state tracker
    /// has been reset by the time this propagates.
    #[error(transparent)]
    Actor(#[from] ActorError),

    /// An outbound sidecar call failed; propagated verbatim.
    #[error(transparent)]
    Sidecar(#[from] SidecarError),

    /// A request or response body refused to round-trip through the
    /// serializer.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RuntimeError {
    /// Whether this error names a condition the caller can repair by
    /// registering or activating first (as opposed to a failure inside the
    /// dispatched call).
    pub fn is_routing_error(&self) -> bool {
        matches!(
            self,
            RuntimeError::UnknownActorType(_)
                | RuntimeError::NotActivated { .. }
                | RuntimeError::NotRemindable(_)
                | RuntimeError::NoSuchMethod { .. }
        )
    }
}
