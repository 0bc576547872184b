//! In-memory sidecar client used by unit tests.

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use parking_lot::Mutex;

// Layer 3: Internal module imports
use super::error::SidecarError;
use super::traits::SidecarClient;
use crate::util::ActorId;

/// One recorded `invoke_actor_method` call.
#[derive(Debug, Clone)]
pub(crate) struct RecordedInvocation {
    pub reentrancy_id: Option<String>,
    pub actor_type: String,
    pub actor_id: String,
    pub method: String,
    pub data: Vec<u8>,
}

/// Records every outbound call and serves state reads from a seeded map.
#[derive(Default)]
pub(crate) struct FakeSidecarClient {
    pub state: Mutex<HashMap<String, Vec<u8>>>,
    pub saved: Mutex<Vec<Vec<u8>>>,
    pub reminders: Mutex<Vec<(String, Vec<u8>)>>,
    pub unregistered_reminders: Mutex<Vec<String>>,
    pub timers: Mutex<Vec<(String, Vec<u8>)>>,
    pub unregistered_timers: Mutex<Vec<String>>,
    pub invocations: Mutex<Vec<RecordedInvocation>>,
    pub fail_saves: AtomicBool,
}

impl FakeSidecarClient {
    pub fn seed_state(&self, key: &str, payload: &[u8]) {
        self.state.lock().insert(key.to_string(), payload.to_vec());
    }

    pub fn fail_next_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl SidecarClient for FakeSidecarClient {
    async fn invoke_actor_method(
        &self,
        reentrancy_id: Option<&str>,
        actor_type: &str,
        actor_id: &ActorId,
        method: &str,
        data: Vec<u8>,
    ) -> Result<Vec<u8>, SidecarError> {
        self.invocations.lock().push(RecordedInvocation {
            reentrancy_id: reentrancy_id.map(str::to_string),
            actor_type: actor_type.to_string(),
            actor_id: actor_id.to_string(),
            method: method.to_string(),
            data,
        });
        Ok(Vec::new())
    }

    async fn get_state(
        &self,
        _actor_type: &str,
        _actor_id: &ActorId,
        key: &str,
    ) -> Result<Option<Vec<u8>>, SidecarError> {
        Ok(self.state.lock().get(key).cloned())
    }

    async fn save_state_transactionally(
        &self,
        _actor_type: &str,
        _actor_id: &ActorId,
        body: Vec<u8>,
    ) -> Result<(), SidecarError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(SidecarError::status(500, "state store unavailable"));
        }
        self.saved.lock().push(body);
        Ok(())
    }

    async fn register_reminder(
        &self,
        _actor_type: &str,
        _actor_id: &ActorId,
        name: &str,
        body: Vec<u8>,
    ) -> Result<(), SidecarError> {
        self.reminders.lock().push((name.to_string(), body));
        Ok(())
    }

    async fn unregister_reminder(
        &self,
        _actor_type: &str,
        _actor_id: &ActorId,
        name: &str,
    ) -> Result<(), SidecarError> {
        self.unregistered_reminders.lock().push(name.to_string());
        Ok(())
    }

    async fn register_timer(
        &self,
        _actor_type: &str,
        _actor_id: &ActorId,
        name: &str,
        body: Vec<u8>,
    ) -> Result<(), SidecarError> {
        self.timers.lock().push((name.to_string(), body));
        Ok(())
    }

    async fn unregister_timer(
        &self,
        _actor_type: &str,
        _actor_id: &ActorId,
        name: &str,
    ) -> Result<(), SidecarError> {
        self.unregistered_timers.lock().push(name.to_string());
        Ok(())
    }
}
