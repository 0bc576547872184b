//! A live actor instance and its internal lifecycle pipeline.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use tracing::debug;

// Layer 3: Internal module imports
use super::context::ActorContext;
use super::error::ActorError;
use super::method_context::ActorMethodContext;
use super::traits::Actor;

/// One activated actor: the user value plus its runtime context.
///
/// Cheap to clone; clones share the user value and the context. The
/// `*_internal` hooks are the pipeline the manager drives around every
/// invocation — they wrap the user-overridable hooks with the cache and
/// commit discipline.
pub struct ActorInstance<A: Actor> {
    ctx: ActorContext,
    user: Arc<A>,
}

impl<A: Actor> Clone for ActorInstance<A> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            user: Arc::clone(&self.user),
        }
    }
}

impl<A: Actor> ActorInstance<A> {
    pub(crate) fn new(ctx: ActorContext, user: Arc<A>) -> Self {
        Self { ctx, user }
    }

    /// The instance's runtime context.
    pub fn ctx(&self) -> &ActorContext {
        &self.ctx
    }

    /// The user actor value.
    pub fn user(&self) -> &Arc<A> {
        &self.user
    }

    /// Activation pipeline: drop any stale cache, run the user hook, commit
    /// whatever it staged.
    pub(crate) async fn on_activate_internal(&self) -> Result<(), ActorError> {
        self.ctx.state().clear_cache();
        self.user.on_activate().await?;
        self.ctx.state().save_state().await?;
        debug!(
            actor_type = self.ctx.actor_type(),
            actor_id = %self.ctx.id(),
            "actor activated"
        );
        Ok(())
    }

    /// Deactivation pipeline: drop the cache, then run the user hook.
    pub(crate) async fn on_deactivate_internal(&self) -> Result<(), ActorError> {
        self.ctx.state().clear_cache();
        self.user.on_deactivate().await?;
        debug!(
            actor_type = self.ctx.actor_type(),
            actor_id = %self.ctx.id(),
            "actor deactivated"
        );
        Ok(())
    }

    pub(crate) async fn on_pre_actor_method_internal(
        &self,
        method_context: &ActorMethodContext,
    ) -> Result<(), ActorError> {
        self.user.on_pre_actor_method(method_context).await
    }

    /// Post hook plus the commit of everything the invocation staged.
    pub(crate) async fn on_post_actor_method_internal(
        &self,
        method_context: &ActorMethodContext,
    ) -> Result<(), ActorError> {
        self.user.on_post_actor_method(method_context).await?;
        self.ctx.state().save_state().await
    }

    /// Failure path: the invocation raised, so staged changes must not leak
    /// into the next call.
    pub(crate) async fn on_invoke_failed_internal(&self) {
        self.ctx.state().clear_cache();
    }
}
