//! Call-scoped reentrancy id.
//!
//! The sidecar tags reentrant call chains with an id (the
//! `Dapr-Reentrancy-Id` header on HTTP). The runtime installs that id as a
//! task-local for the span of one dispatch; everything awaited inside the
//! dispatch observes it, and unrelated dispatches never do. Outbound
//! actor-to-actor invocations read the ambient value and pass it to the
//! [`SidecarClient`](crate::client::SidecarClient) explicitly, so
//! propagation is part of the client contract rather than a hidden effect.

// Layer 1: Standard library imports
use std::future::Future;

// Layer 2: Third-party crate imports
use tokio::task_local;

// Layer 3: Internal module imports
// (none)

task_local! {
    static REENTRANCY_ID: Option<String>;
}

/// Run `future` with `reentrancy_id` as the ambient reentrancy id.
///
/// Passing `None` still establishes a scope, shadowing any id an enclosing
/// scope may carry.
pub async fn scope<F>(reentrancy_id: Option<String>, future: F) -> F::Output
where
    F: Future,
{
    REENTRANCY_ID.scope(reentrancy_id, future).await
}

/// The reentrancy id of the current dispatch, if one is in scope.
pub fn current_reentrancy_id() -> Option<String> {
    REENTRANCY_ID
        .try_with(|id| id.clone())
        .unwrap_or_default()
}
