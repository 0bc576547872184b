//! Errors surfaced by sidecar client implementations.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
// (none)

/// Failure reported by a [`SidecarClient`](super::SidecarClient)
/// implementation.
///
/// The runtime never retries on its own; sidecar errors propagate verbatim
/// to the caller, which decides retry policy.
#[derive(Debug, Clone, Error)]
pub enum SidecarError {
    /// The request never produced a response (connection refused, broken
    /// pipe, deadline exceeded, ...).
    #[error("sidecar transport failure: {0}")]
    Transport(String),

    /// The sidecar answered with a non-success status.
    #[error("sidecar returned status {code}: {message}")]
    Status { code: u16, message: String },
}

impl SidecarError {
    /// Shorthand for a transport-level failure.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Shorthand for a status-level failure.
    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self::Status {
            code,
            message: message.into(),
        }
    }
}
