//! Per-instance runtime context handed to actor implementations.

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

// Layer 3: Internal module imports
use super::error::ActorError;
use super::reminder::ActorReminderData;
use super::timer::ActorTimerData;
use crate::client::SidecarClient;
use crate::registry::ActorTypeInfo;
use crate::runtime::reentrancy;
use crate::state::ActorStateManager;
use crate::util::ActorId;

/// Handle tying one actor instance to its runtime facilities.
///
/// The registration factory receives an `ActorContext` and typically stores
/// it in the actor struct. It is a cheap-clone handle: every clone shares
/// the same state manager and timer table. Through it the actor reaches its
/// staged state, registers timers and reminders, and invokes other actors
/// (with the ambient reentrancy id stamped on the outbound call).
#[derive(Clone)]
pub struct ActorContext {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    id: ActorId,
    type_info: Arc<ActorTypeInfo>,
    client: Arc<dyn SidecarClient>,
    state: ActorStateManager,
    // Orders the table insert against the sidecar call; held across the
    // await so a successful register is visible in the table afterwards.
    timers: Mutex<HashMap<String, ActorTimerData>>,
    activated_at: DateTime<Utc>,
}

impl ActorContext {
    pub(crate) fn new(
        id: ActorId,
        type_info: Arc<ActorTypeInfo>,
        client: Arc<dyn SidecarClient>,
    ) -> Self {
        let state = ActorStateManager::new(type_info.type_name(), id.clone(), Arc::clone(&client));
        Self {
            inner: Arc::new(ContextInner {
                id,
                type_info,
                client,
                state,
                timers: Mutex::new(HashMap::new()),
                activated_at: Utc::now(),
            }),
        }
    }

    /// This instance's id.
    pub fn id(&self) -> &ActorId {
        &self.inner.id
    }

    /// The actor type name this instance belongs to.
    pub fn actor_type(&self) -> &str {
        self.inner.type_info.type_name()
    }

    /// Registration-time description of the actor type.
    pub fn type_info(&self) -> &ActorTypeInfo {
        &self.inner.type_info
    }

    /// The staged-state manager for this instance.
    pub fn state(&self) -> &ActorStateManager {
        &self.inner.state
    }

    /// When this instance was created (§3.2).
    pub fn activated_at(&self) -> DateTime<Utc> {
        self.inner.activated_at
    }

    /// Invoke a method on another actor through the sidecar.
    ///
    /// If the current dispatch carries a reentrancy id, the outbound call
    /// carries it too; user code never handles the id itself.
    pub async fn invoke_actor_method(
        &self,
        actor_type: &str,
        actor_id: &ActorId,
        method: &str,
        data: Vec<u8>,
    ) -> Result<Vec<u8>, ActorError> {
        let reentrancy_id = reentrancy::current_reentrancy_id();
        let response = self
            .inner
            .client
            .invoke_actor_method(
                reentrancy_id.as_deref(),
                actor_type,
                actor_id,
                method,
                data,
            )
            .await?;
        Ok(response)
    }

    /// Register a durable reminder for this actor.
    pub async fn register_reminder(
        &self,
        name: &str,
        state: &[u8],
        due_time: Duration,
        period: Duration,
        ttl: Option<Duration>,
    ) -> Result<(), ActorError> {
        let reminder = ActorReminderData::new(name, state.to_vec(), due_time, period, ttl);
        let body = serde_json::to_vec(&reminder)?;
        self.inner
            .client
            .register_reminder(self.actor_type(), &self.inner.id, name, body)
            .await?;
        Ok(())
    }

    /// Remove a reminder previously registered under `name`.
    pub async fn unregister_reminder(&self, name: &str) -> Result<(), ActorError> {
        self.inner
            .client
            .unregister_reminder(self.actor_type(), &self.inner.id, name)
            .await?;
        Ok(())
    }

    /// Register a timer for this actor.
    ///
    /// `callback` names a timer callback registered for the actor type;
    /// `state` is handed back to it on every fire. A blank `name` gets an
    /// auto-generated `"{id}_Timer_{n}"` name; re-registering an existing
    /// name overwrites the prior timer. Returns the effective name.
    pub async fn register_timer<S: Serialize>(
        &self,
        name: Option<&str>,
        callback: &str,
        state: &S,
        due_time: Duration,
        period: Duration,
        ttl: Option<Duration>,
    ) -> Result<String, ActorError> {
        let state = serde_json::to_value(state)?;
        let mut timers = self.inner.timers.lock().await;
        let name = match name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("{}_Timer_{}", self.inner.id, timers.len() + 1),
        };
        let timer = ActorTimerData::new(&name, callback, state, due_time, period, ttl);
        let body = serde_json::to_vec(&timer)?;
        timers.insert(name.clone(), timer);
        self.inner
            .client
            .register_timer(self.actor_type(), &self.inner.id, &name, body)
            .await?;
        Ok(name)
    }

    /// Remove a timer previously registered under `name`.
    pub async fn unregister_timer(&self, name: &str) -> Result<(), ActorError> {
        self.inner
            .client
            .unregister_timer(self.actor_type(), &self.inner.id, name)
            .await?;
        self.inner.timers.lock().await.remove(name);
        Ok(())
    }

    /// Look up a registered timer by name.
    pub(crate) async fn timer(&self, name: &str) -> Option<ActorTimerData> {
        self.inner.timers.lock().await.get(name).cloned()
    }
}
