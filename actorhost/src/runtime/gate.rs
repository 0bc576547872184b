//! Per-instance serialization gate with reentrancy-aware admission.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::Mutex;
use tokio::sync::Notify;

// Layer 3: Internal module imports
use super::errors::RuntimeError;

/// Serializes method bodies on one `(actor type, id)` pair.
///
/// A free gate admits any caller. A held gate admits only callers carrying
/// the holder's (non-empty) reentrancy id, up to `max_depth` concurrent
/// frames; everyone else waits. Frames of a reentrant chain arrive as
/// separate sidecar callbacks, so admission is tracked by depth count
/// rather than task identity.
#[derive(Debug)]
pub(crate) struct AccessGate {
    state: Mutex<GateState>,
    notify: Notify,
}

#[derive(Default, Debug)]
struct GateState {
    holder: Option<String>,
    depth: u32,
    waiters: u32,
}

impl AccessGate {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(GateState::default()),
            notify: Notify::new(),
        }
    }

    /// Wait for admission. Fails with `ReentrancyDepthExceeded` when the
    /// caller is part of the holding chain but the chain is already
    /// `max_depth` frames deep.
    pub(crate) async fn acquire(
        gate: Arc<Self>,
        reentrancy_id: Option<&str>,
        max_depth: u32,
    ) -> Result<GateGuard, RuntimeError> {
        enum Admission {
            Granted { outermost: bool },
            Wait,
        }

        loop {
            let admission = {
                let mut state = gate.state.lock();
                if state.depth == 0 {
                    state.holder = reentrancy_id.map(str::to_string);
                    state.depth = 1;
                    Admission::Granted { outermost: true }
                } else if reentrancy_id.is_some() && reentrancy_id == state.holder.as_deref() {
                    if state.depth >= max_depth {
                        return Err(RuntimeError::ReentrancyDepthExceeded { max: max_depth });
                    }
                    state.depth += 1;
                    Admission::Granted { outermost: false }
                } else {
                    state.waiters += 1;
                    Admission::Wait
                }
            };
            match admission {
                Admission::Granted { outermost } => return Ok(GateGuard { gate, outermost }),
                Admission::Wait => {
                    // Decrement survives cancellation while parked.
                    let waiting = WaiterGuard(&gate);
                    gate.notify.notified().await;
                    drop(waiting);
                }
            }
        }
    }

    /// Whether nothing holds or waits on the gate. Used to decide whether
    /// the gate entry can be garbage-collected on deactivation.
    pub(crate) fn is_idle(&self) -> bool {
        let state = self.state.lock();
        state.depth == 0 && state.waiters == 0
    }
}

struct WaiterGuard<'a>(&'a AccessGate);

impl Drop for WaiterGuard<'_> {
    fn drop(&mut self) {
        self.0.state.lock().waiters -= 1;
    }
}

/// Admission token; releasing the last frame frees the gate and wakes one
/// waiter.
#[derive(Debug)]
pub(crate) struct GateGuard {
    gate: Arc<AccessGate>,
    outermost: bool,
}

impl GateGuard {
    /// Whether this frame opened the chain (depth went 0 → 1).
    pub(crate) fn is_outermost(&self) -> bool {
        self.outermost
    }
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        let mut state = self.gate.state.lock();
        state.depth -= 1;
        if state.depth == 0 {
            state.holder = None;
            drop(state);
            self.gate.notify.notify_one();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    fn gate() -> Arc<AccessGate> {
        Arc::new(AccessGate::new())
    }

    async fn acquire(
        gate: &Arc<AccessGate>,
        reentrancy_id: Option<&str>,
        max_depth: u32,
    ) -> Result<GateGuard, RuntimeError> {
        AccessGate::acquire(Arc::clone(gate), reentrancy_id, max_depth).await
    }

    #[tokio::test]
    async fn test_free_gate_admits_anyone() {
        let gate = gate();
        let guard = acquire(&gate, None, 32).await.expect("acquire");
        assert!(guard.is_outermost());
    }

    #[tokio::test]
    async fn test_release_readmits() {
        let gate = gate();
        let guard = acquire(&gate, None, 32).await.expect("acquire");
        drop(guard);
        let guard = acquire(&gate, None, 32).await.expect("acquire");
        assert!(guard.is_outermost());
    }

    #[tokio::test]
    async fn test_held_gate_blocks_unrelated_caller() {
        let gate = gate();
        let _guard = acquire(&gate, None, 32).await.expect("acquire");
        let blocked = timeout(Duration::from_millis(20), acquire(&gate, None, 32)).await;
        assert!(blocked.is_err());
        assert!(!gate.is_idle());
    }

    #[tokio::test]
    async fn test_same_reentrancy_id_is_admitted_nested() {
        let gate = gate();
        let outer = acquire(&gate, Some("chain"), 32).await.expect("outer");
        let inner = acquire(&gate, Some("chain"), 32).await.expect("inner");
        assert!(outer.is_outermost());
        assert!(!inner.is_outermost());
    }

    #[tokio::test]
    async fn test_different_reentrancy_id_waits() {
        let gate = gate();
        let _held = acquire(&gate, Some("chain-a"), 32).await.expect("acquire");
        let blocked = timeout(Duration::from_millis(20), acquire(&gate, Some("chain-b"), 32)).await;
        assert!(blocked.is_err());
    }

    #[tokio::test]
    async fn test_depth_limit_is_enforced() {
        let gate = gate();
        let _f1 = acquire(&gate, Some("chain"), 2).await.expect("frame 1");
        let _f2 = acquire(&gate, Some("chain"), 2).await.expect("frame 2");
        let err = acquire(&gate, Some("chain"), 2).await.expect_err("frame 3");
        assert!(matches!(
            err,
            RuntimeError::ReentrancyDepthExceeded { max: 2 }
        ));
    }

    #[tokio::test]
    async fn test_waiter_proceeds_after_release() {
        let gate = gate();
        let guard = acquire(&gate, None, 32).await.expect("acquire");
        let contender = {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move { acquire(&gate, None, 32).await.map(|g| g.is_outermost()) })
        };
        tokio::task::yield_now().await;
        drop(guard);
        let outermost = contender.await.expect("join").expect("acquire");
        assert!(outermost);
    }

    #[tokio::test]
    async fn test_chain_frees_gate_when_all_frames_exit() {
        let gate = gate();
        let outer = acquire(&gate, Some("chain"), 32).await.expect("outer");
        let inner = acquire(&gate, Some("chain"), 32).await.expect("inner");
        drop(inner);
        assert!(!gate.is_idle());
        drop(outer);
        assert!(gate.is_idle());
    }
}
