//! Process-wide actor runtime: the callback surface the sidecar drives.

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::RwLock;
use tracing::debug;

// Layer 3: Internal module imports
use super::config::ActorRuntimeConfig;
use super::errors::RuntimeError;
use super::manager::{ActorManager, ManagedActorType};
use super::reentrancy;
use crate::actor::Actor;
use crate::client::SidecarClient;
use crate::registry::ActorRegistration;
use crate::util::ActorId;

/// Registry of actor managers keyed by type name, plus the configuration
/// the sidecar probes for.
///
/// One `ActorRuntime` is owned by the transport layer of the hosting
/// process; its five entry points (`activate`, `deactivate`, `dispatch`,
/// `fire_timer`, `fire_reminder`) map one-to-one onto the sidecar's HTTP or
/// gRPC callbacks, and `serialized_config` answers the configuration
/// probe.
///
/// # Example
/// ```rust,ignore
/// let runtime = ActorRuntime::new(client);
/// runtime.register_actor(
///     ActorRegistration::new(|ctx| CounterActor { ctx }).method("Increment", CounterActor::increment),
/// )?;
///
/// // Sidecar callback: PUT /actors/CounterActor/7/method/Increment
/// let response = runtime
///     .dispatch("CounterActor", "7", "Increment", b"3", None)
///     .await?;
/// ```
pub struct ActorRuntime {
    client: Arc<dyn SidecarClient>,
    managers: RwLock<HashMap<String, Arc<dyn ManagedActorType>>>,
    config: Arc<RwLock<ActorRuntimeConfig>>,
}

impl ActorRuntime {
    /// Create a runtime with the default configuration.
    pub fn new(client: Arc<dyn SidecarClient>) -> Self {
        Self::with_config(client, ActorRuntimeConfig::default())
    }

    /// Create a runtime with an explicit configuration.
    pub fn with_config(client: Arc<dyn SidecarClient>, config: ActorRuntimeConfig) -> Self {
        Self {
            client,
            managers: RwLock::new(HashMap::new()),
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// Register an actor type. Registering the same type again replaces its
    /// manager; the type name joins the advertised entities exactly once.
    pub fn register_actor<A: Actor>(
        &self,
        registration: ActorRegistration<A>,
    ) -> Result<(), RuntimeError> {
        let type_name = registration.type_name().to_string();
        let manager = ActorManager::new(
            registration,
            Arc::clone(&self.client),
            Arc::clone(&self.config),
        )?;
        self.managers
            .write()
            .insert(type_name.clone(), Arc::new(manager));
        self.config.write().add_entity(&type_name);
        debug!(actor_type = %type_name, "actor type registered");
        Ok(())
    }

    /// Names of every registered actor type.
    pub fn registered_actor_types(&self) -> Vec<String> {
        self.managers.read().keys().cloned().collect()
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> ActorRuntimeConfig {
        self.config.read().clone()
    }

    /// Replace the configuration. Registered type names are re-asserted
    /// into the advertised entities.
    pub fn set_config(&self, config: ActorRuntimeConfig) {
        let registered = self.registered_actor_types();
        let mut guard = self.config.write();
        *guard = config;
        guard.update_entities(registered);
    }

    /// The configuration probe body: the current configuration as JSON.
    pub fn serialized_config(&self) -> Result<Vec<u8>, RuntimeError> {
        Ok(serde_json::to_vec(&*self.config.read())?)
    }

    /// Sidecar callback: activate `actor_type`/`actor_id`.
    pub async fn activate(&self, actor_type: &str, actor_id: &str) -> Result<(), RuntimeError> {
        self.manager(actor_type)?
            .activate(&ActorId::new(actor_id))
            .await
    }

    /// Sidecar callback: deactivate `actor_type`/`actor_id`.
    pub async fn deactivate(&self, actor_type: &str, actor_id: &str) -> Result<(), RuntimeError> {
        self.manager(actor_type)?
            .deactivate(&ActorId::new(actor_id))
            .await
    }

    /// Sidecar callback: invoke `method` on `actor_type`/`actor_id`.
    ///
    /// `reentrancy_id` is the value of the `Dapr-Reentrancy-Id` header when
    /// present; it becomes the ambient reentrancy id for the span of this
    /// call when the type has reentrancy enabled.
    pub async fn dispatch(
        &self,
        actor_type: &str,
        actor_id: &str,
        method: &str,
        body: &[u8],
        reentrancy_id: Option<String>,
    ) -> Result<Vec<u8>, RuntimeError> {
        let manager = self.manager(actor_type)?;
        let (reentrancy_enabled, _) = self.config.read().reentrancy_for(actor_type);
        let ambient = reentrancy_id.filter(|_| reentrancy_enabled);
        let actor_id = ActorId::new(actor_id);
        reentrancy::scope(ambient, async move {
            manager.dispatch(&actor_id, method, body).await
        })
        .await
    }

    /// Sidecar callback: fire the timer `timer_name`.
    pub async fn fire_timer(
        &self,
        actor_type: &str,
        actor_id: &str,
        timer_name: &str,
        body: &[u8],
    ) -> Result<(), RuntimeError> {
        self.manager(actor_type)?
            .fire_timer(&ActorId::new(actor_id), timer_name, body)
            .await
    }

    /// Sidecar callback: fire the reminder `reminder_name`.
    pub async fn fire_reminder(
        &self,
        actor_type: &str,
        actor_id: &str,
        reminder_name: &str,
        body: &[u8],
    ) -> Result<(), RuntimeError> {
        self.manager(actor_type)?
            .fire_reminder(&ActorId::new(actor_id), reminder_name, body)
            .await
    }

    fn manager(&self, actor_type: &str) -> Result<Arc<dyn ManagedActorType>, RuntimeError> {
        self.managers
            .read()
            .get(actor_type)
            .map(Arc::clone)
            .ok_or_else(|| RuntimeError::UnknownActorType(actor_type.to_string()))
    }
}
