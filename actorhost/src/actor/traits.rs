//! User-facing actor traits.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use async_trait::async_trait;

// Layer 3: Internal module imports
use super::error::ActorError;
use super::method_context::ActorMethodContext;
use super::reminder::ActorReminderData;

/// A stateful entity hosted on behalf of the sidecar.
///
/// Implementations hold whatever the type needs (typically the
/// [`ActorContext`](super::ActorContext) handed to the registration
/// factory); durable data belongs in the actor's state manager, not in
/// fields. Methods are wired up explicitly through
/// [`ActorRegistration`](crate::registry::ActorRegistration); the trait
/// itself carries the type name and the lifecycle hooks.
///
/// All hooks default to no-ops.
///
/// # Example
/// ```rust,ignore
/// use std::sync::Arc;
///
/// use async_trait::async_trait;
///
/// use actorhost::{Actor, ActorContext, ActorError, ActorRegistration};
///
/// struct CounterActor {
///     ctx: ActorContext,
/// }
///
/// #[async_trait]
/// impl Actor for CounterActor {
///     fn actor_type() -> &'static str {
///         "CounterActor"
///     }
///
///     async fn on_activate(&self) -> Result<(), ActorError> {
///         self.ctx.state().try_add_state("count", 0_i64).await?;
///         Ok(())
///     }
/// }
///
/// impl CounterActor {
///     async fn increment(self: Arc<Self>, by: i64) -> Result<i64, ActorError> {
///         self.ctx
///             .state()
///             .add_or_update_state("count", by, |_, current| current + by)
///             .await
///     }
/// }
///
/// let registration =
///     ActorRegistration::new(|ctx| CounterActor { ctx }).method("Increment", CounterActor::increment);
/// ```
#[async_trait]
pub trait Actor: Send + Sync + 'static {
    /// The type name this actor registers and is addressed under.
    fn actor_type() -> &'static str
    where
        Self: Sized;

    /// Called right after the instance is created, before any method,
    /// timer, or reminder is dispatched on it. State staged here is
    /// committed before the instance joins the active table.
    async fn on_activate(&self) -> Result<(), ActorError> {
        Ok(())
    }

    /// Called when the sidecar deactivates the instance. State operations
    /// do not belong here; the cache has already been dropped.
    async fn on_deactivate(&self) -> Result<(), ActorError> {
        Ok(())
    }

    /// Called before every method, timer, and reminder invocation.
    async fn on_pre_actor_method(&self, _context: &ActorMethodContext) -> Result<(), ActorError> {
        Ok(())
    }

    /// Called after every successful method, timer, and reminder
    /// invocation, right before the staged state is committed.
    async fn on_post_actor_method(&self, _context: &ActorMethodContext) -> Result<(), ActorError> {
        Ok(())
    }
}

/// Reminder consumption, opted into per type via
/// [`ActorRegistration::with_reminders`](crate::registry::ActorRegistration::with_reminders).
///
/// Reminders are durable: the sidecar persists them and fires them even
/// across activations, so only types that implement this trait may register
/// them.
#[async_trait]
pub trait Remindable: Actor {
    /// Called when a reminder registered by this actor fires.
    async fn receive_reminder(&self, reminder: ActorReminderData) -> Result<(), ActorError>;
}
