//! Outbound sidecar surface used by the actor runtime.
//!
//! The runtime never talks to the network itself; every outbound call goes
//! through the [`SidecarClient`] trait so transports (HTTP, gRPC, in-memory
//! fakes) stay swappable. Implementations must be safe for concurrent use:
//! one client instance is shared by every actor manager in the process.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use super::error::SidecarError;
use crate::util::ActorId;

/// Header carrying the reentrancy id on actor-to-actor invocations.
///
/// HTTP transports send it verbatim; gRPC transports carry the same value as
/// request metadata under the lowercased name.
pub const REENTRANCY_ID_HEADER: &str = "Dapr-Reentrancy-Id";

/// Outbound calls the runtime makes against the sidecar.
///
/// Retry, backoff, and deadlines are the implementation's concern; the
/// runtime propagates any [`SidecarError`] to its caller unchanged.
#[async_trait]
pub trait SidecarClient: Send + Sync + 'static {
    /// Invoke a method on another actor.
    ///
    /// When `reentrancy_id` is `Some`, the request must carry it under
    /// [`REENTRANCY_ID_HEADER`]; when `None`, no such header is sent.
    async fn invoke_actor_method(
        &self,
        reentrancy_id: Option<&str>,
        actor_type: &str,
        actor_id: &ActorId,
        method: &str,
        data: Vec<u8>,
    ) -> Result<Vec<u8>, SidecarError>;

    /// Read one state key. `None` (or an empty payload) means the key does
    /// not exist.
    async fn get_state(
        &self,
        actor_type: &str,
        actor_id: &ActorId,
        key: &str,
    ) -> Result<Option<Vec<u8>>, SidecarError>;

    /// Commit a transactional state batch. `body` is the JSON array of
    /// upsert/delete operations built by the state provider.
    async fn save_state_transactionally(
        &self,
        actor_type: &str,
        actor_id: &ActorId,
        body: Vec<u8>,
    ) -> Result<(), SidecarError>;

    /// Register a durable reminder with the sidecar.
    async fn register_reminder(
        &self,
        actor_type: &str,
        actor_id: &ActorId,
        name: &str,
        body: Vec<u8>,
    ) -> Result<(), SidecarError>;

    /// Remove a reminder previously registered under `name`.
    async fn unregister_reminder(
        &self,
        actor_type: &str,
        actor_id: &ActorId,
        name: &str,
    ) -> Result<(), SidecarError>;

    /// Register a timer with the sidecar. The callback stays in-process;
    /// only the schedule is advertised.
    async fn register_timer(
        &self,
        actor_type: &str,
        actor_id: &ActorId,
        name: &str,
        body: Vec<u8>,
    ) -> Result<(), SidecarError>;

    /// Remove a timer previously registered under `name`.
    async fn unregister_timer(
        &self,
        actor_type: &str,
        actor_id: &ActorId,
        name: &str,
    ) -> Result<(), SidecarError>;
}
