//! Per-type actor manager: activation, deactivation, and serialized
//! dispatch.

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, trace, warn};
use uuid::Uuid;

// Layer 3: Internal module imports
use super::config::ActorRuntimeConfig;
use super::errors::RuntimeError;
use super::gate::AccessGate;
use super::reentrancy;
use crate::actor::timer::TimerFireBody;
use crate::actor::{
    Actor, ActorContext, ActorError, ActorInstance, ActorMethodContext, ActorReminderData,
    REMINDER_METHOD_NAME, TIMER_METHOD_NAME,
};
use crate::client::SidecarClient;
use crate::registry::builder::{ActorFactory, ReminderHandler};
use crate::registry::dispatcher::TimerHandler;
use crate::registry::{ActorRegistration, ActorTypeInfo, MethodDispatcher};
use crate::util::ActorId;

/// Owns every live instance of one actor type.
///
/// All sidecar callbacks for the type funnel through here: activation on
/// first use, the serialized invocation pipeline (pre hook → action → post
/// hook → state commit), timer and reminder fires, and deactivation.
/// Per-id [`AccessGate`]s enforce that at most one method body runs per
/// instance, relaxed only for frames of a reentrant chain.
pub struct ActorManager<A: Actor> {
    type_info: Arc<ActorTypeInfo>,
    factory: ActorFactory<A>,
    dispatcher: MethodDispatcher<A>,
    timer_callbacks: HashMap<String, TimerHandler<A>>,
    reminder_handler: Option<ReminderHandler<A>>,
    client: Arc<dyn SidecarClient>,
    config: Arc<RwLock<ActorRuntimeConfig>>,
    active: RwLock<HashMap<String, ActorInstance<A>>>,
    gates: DashMap<String, Arc<AccessGate>>,
    timer_method_context: ActorMethodContext,
    reminder_method_context: ActorMethodContext,
}

impl<A: Actor> ActorManager<A> {
    /// Build a manager from a finished registration.
    pub(crate) fn new(
        registration: ActorRegistration<A>,
        client: Arc<dyn SidecarClient>,
        config: Arc<RwLock<ActorRuntimeConfig>>,
    ) -> Result<Self, RuntimeError> {
        let parts = registration.into_parts()?;
        Ok(Self {
            type_info: parts.type_info,
            factory: parts.factory,
            dispatcher: parts.dispatcher,
            timer_callbacks: parts.timer_callbacks,
            reminder_handler: parts.reminder_handler,
            client,
            config,
            active: RwLock::new(HashMap::new()),
            gates: DashMap::new(),
            timer_method_context: ActorMethodContext::create_for_timer(TIMER_METHOD_NAME),
            reminder_method_context: ActorMethodContext::create_for_reminder(REMINDER_METHOD_NAME),
        })
    }

    /// The type this manager hosts.
    pub fn type_info(&self) -> &ActorTypeInfo {
        &self.type_info
    }

    /// Whether `actor_id` is currently in the active table.
    pub fn is_active(&self, actor_id: &ActorId) -> bool {
        self.active.read().contains_key(actor_id.as_str())
    }

    /// Create and install an instance for `actor_id`.
    ///
    /// The activation pipeline runs before the instance joins the table;
    /// activating an already-active id rebuilds the instance and overwrites
    /// the table entry.
    pub async fn activate(&self, actor_id: &ActorId) -> Result<(), RuntimeError> {
        let ctx = ActorContext::new(
            actor_id.clone(),
            Arc::clone(&self.type_info),
            Arc::clone(&self.client),
        );
        let user = Arc::new((self.factory)(ctx.clone()));
        let instance = ActorInstance::new(ctx, user);
        instance.on_activate_internal().await?;
        self.active
            .write()
            .insert(actor_id.as_str().to_string(), instance);
        Ok(())
    }

    /// Remove the instance for `actor_id` and run its deactivation
    /// pipeline.
    pub async fn deactivate(&self, actor_id: &ActorId) -> Result<(), RuntimeError> {
        let removed = self.active.write().remove(actor_id.as_str());
        let Some(instance) = removed else {
            return Err(self.not_activated(actor_id));
        };
        instance.on_deactivate_internal().await?;
        self.gates
            .remove_if(actor_id.as_str(), |_, gate| gate.is_idle());
        Ok(())
    }

    /// Invoke `method` with the raw request body; returns the serialized
    /// return value.
    pub async fn dispatch(
        &self,
        actor_id: &ActorId,
        method: &str,
        body: &[u8],
    ) -> Result<Vec<u8>, RuntimeError> {
        // Unknown methods fail before any activation work happens.
        let _ = self.dispatcher.expects_arg(method)?;
        let method_context = ActorMethodContext::create_for_actor(method);
        let method = method.to_string();
        let body = body.to_vec();
        self.dispatch_internal(actor_id, &method_context, move |instance| async move {
            self.dispatcher
                .dispatch(Arc::clone(instance.user()), &method, body)
                .await
        })
        .await
    }

    /// Deliver a timer fire: look up the named timer and invoke its stored
    /// callback with its stored state.
    pub async fn fire_timer(
        &self,
        actor_id: &ActorId,
        timer_name: &str,
        body: &[u8],
    ) -> Result<(), RuntimeError> {
        let fire: TimerFireBody = serde_json::from_slice(body)?;
        trace!(
            actor_type = self.type_info.type_name(),
            actor_id = %actor_id,
            timer_name,
            callback = fire.callback.as_deref().unwrap_or_default(),
            "timer fired"
        );
        let timer_name = timer_name.to_string();
        self.dispatch_internal(actor_id, &self.timer_method_context, move |instance| async move {
            let timer = instance.ctx().timer(&timer_name).await.ok_or_else(|| {
                RuntimeError::Actor(ActorError::TimerNotFound(timer_name.clone()))
            })?;
            let handler = self.timer_callbacks.get(timer.callback()).ok_or_else(|| {
                RuntimeError::NoSuchMethod {
                    actor_type: self.type_info.type_name().to_string(),
                    method: timer.callback().to_string(),
                }
            })?;
            handler(Arc::clone(instance.user()), timer.data().clone()).await?;
            Ok(Vec::new())
        })
        .await
        .map(|_| ())
    }

    /// Deliver a reminder fire to the type's `receive_reminder`.
    ///
    /// A body that is not a JSON object is silently ignored; a fire on a
    /// type registered without reminder support fails `NotRemindable`.
    pub async fn fire_reminder(
        &self,
        actor_id: &ActorId,
        reminder_name: &str,
        body: &[u8],
    ) -> Result<(), RuntimeError> {
        let handler = match (self.type_info.is_remindable(), &self.reminder_handler) {
            (true, Some(handler)) => Arc::clone(handler),
            _ => {
                return Err(RuntimeError::NotRemindable(
                    self.type_info.type_name().to_string(),
                ))
            }
        };
        let request: Value = serde_json::from_slice(body)?;
        let Some(object) = request.as_object() else {
            debug!(
                actor_type = self.type_info.type_name(),
                actor_id = %actor_id,
                reminder_name,
                "reminder body is not an object, ignoring fire"
            );
            return Ok(());
        };
        let reminder = ActorReminderData::from_fire_body(reminder_name, object);
        self.dispatch_internal(actor_id, &self.reminder_method_context, move |instance| {
            async move {
                handler(Arc::clone(instance.user()), reminder).await?;
                Ok(Vec::new())
            }
        })
        .await
        .map(|_| ())
    }

    /// The invocation envelope shared by methods, timers, and reminders.
    ///
    /// Admission through the per-id gate, activation on first use, the
    /// pre/action/post pipeline, tracker reset on failure, and the
    /// per-chain state scope for reentrant calls.
    async fn dispatch_internal<F, Fut>(
        &self,
        actor_id: &ActorId,
        method_context: &ActorMethodContext,
        action: F,
    ) -> Result<Vec<u8>, RuntimeError>
    where
        F: FnOnce(ActorInstance<A>) -> Fut,
        Fut: Future<Output = Result<Vec<u8>, RuntimeError>> + Send,
    {
        let (reentrancy_enabled, max_depth) = {
            self.config
                .read()
                .reentrancy_for(self.type_info.type_name())
        };
        let reentrancy_id = if reentrancy_enabled {
            reentrancy::current_reentrancy_id()
        } else {
            None
        };

        let gate = Arc::clone(
            self.gates
                .entry(actor_id.as_str().to_string())
                .or_insert_with(|| Arc::new(AccessGate::new()))
                .value(),
        );
        let guard = AccessGate::acquire(gate, reentrancy_id.as_deref(), max_depth).await?;

        if !self.is_active(actor_id) {
            self.activate(actor_id).await?;
        }
        let instance = self
            .active
            .read()
            .get(actor_id.as_str())
            .cloned()
            .ok_or_else(|| self.not_activated(actor_id))?;

        // One state scope per reentrant chain, installed at the outermost
        // frame so inner frames share the outer tracker.
        let scoped_state = reentrancy_id.is_some() && guard.is_outermost();
        if scoped_state {
            instance
                .ctx()
                .state()
                .set_state_context(Some(Uuid::new_v4().to_string()));
        }

        let result = async {
            instance.on_pre_actor_method_internal(method_context).await?;
            let value = action(instance.clone()).await?;
            instance
                .on_post_actor_method_internal(method_context)
                .await?;
            Ok::<_, RuntimeError>(value)
        }
        .await;

        let result = match result {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(
                    actor_type = self.type_info.type_name(),
                    actor_id = %actor_id,
                    method = method_context.method_name(),
                    error = %err,
                    "actor invocation failed, resetting staged state"
                );
                instance.on_invoke_failed_internal().await;
                Err(err)
            }
        };

        if scoped_state {
            instance.ctx().state().set_state_context(None);
        }
        drop(guard);
        result
    }

    fn not_activated(&self, actor_id: &ActorId) -> RuntimeError {
        RuntimeError::NotActivated {
            actor_type: self.type_info.type_name().to_string(),
            actor_id: actor_id.as_str().to_string(),
        }
    }
}

/// Object-safe view of a manager, keyed into the runtime's registry.
#[async_trait]
pub(crate) trait ManagedActorType: Send + Sync + 'static {
    async fn activate(&self, actor_id: &ActorId) -> Result<(), RuntimeError>;
    async fn deactivate(&self, actor_id: &ActorId) -> Result<(), RuntimeError>;
    async fn dispatch(
        &self,
        actor_id: &ActorId,
        method: &str,
        body: &[u8],
    ) -> Result<Vec<u8>, RuntimeError>;
    async fn fire_timer(
        &self,
        actor_id: &ActorId,
        timer_name: &str,
        body: &[u8],
    ) -> Result<(), RuntimeError>;
    async fn fire_reminder(
        &self,
        actor_id: &ActorId,
        reminder_name: &str,
        body: &[u8],
    ) -> Result<(), RuntimeError>;
}

#[async_trait]
impl<A: Actor> ManagedActorType for ActorManager<A> {
    async fn activate(&self, actor_id: &ActorId) -> Result<(), RuntimeError> {
        ActorManager::activate(self, actor_id).await
    }

    async fn deactivate(&self, actor_id: &ActorId) -> Result<(), RuntimeError> {
        ActorManager::deactivate(self, actor_id).await
    }

    async fn dispatch(
        &self,
        actor_id: &ActorId,
        method: &str,
        body: &[u8],
    ) -> Result<Vec<u8>, RuntimeError> {
        ActorManager::dispatch(self, actor_id, method, body).await
    }

    async fn fire_timer(
        &self,
        actor_id: &ActorId,
        timer_name: &str,
        body: &[u8],
    ) -> Result<(), RuntimeError> {
        ActorManager::fire_timer(self, actor_id, timer_name, body).await
    }

    async fn fire_reminder(
        &self,
        actor_id: &ActorId,
        reminder_name: &str,
        body: &[u8],
    ) -> Result<(), RuntimeError> {
        ActorManager::fire_reminder(self, actor_id, reminder_name, body).await
    }
}
