//! # actorhost - Sidecar-Hosted Virtual Actor Runtime
//!
//! In-process machinery for hosting stateful, addressable, single-threaded
//! actors on behalf of an external sidecar. The sidecar owns placement,
//! idle-actor reaping, reminder durability, and retry policy; this crate
//! owns everything that happens once a callback lands in the process:
//! activation on demand, typed method dispatch, per-instance serialization
//! with reentrancy-aware admission, staged state with transactional commit,
//! and timer/reminder lifecycle.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use actorhost::{Actor, ActorContext, ActorError, ActorRegistration, ActorRuntime};
//!
//! struct CounterActor {
//!     ctx: ActorContext,
//! }
//!
//! impl Actor for CounterActor {
//!     fn actor_type() -> &'static str {
//!         "CounterActor"
//!     }
//! }
//!
//! impl CounterActor {
//!     async fn increment(self: Arc<Self>, by: i64) -> Result<i64, ActorError> {
//!         self.ctx
//!             .state()
//!             .add_or_update_state("count", by, |_, current| current + by)
//!             .await
//!     }
//! }
//!
//! # async fn host(client: Arc<dyn actorhost::SidecarClient>) -> Result<(), actorhost::RuntimeError> {
//! let runtime = ActorRuntime::new(client);
//! runtime.register_actor(
//!     ActorRegistration::new(|ctx| CounterActor { ctx })
//!         .method("Increment", CounterActor::increment),
//! )?;
//!
//! // Sidecar callback: PUT /actors/CounterActor/42/method/Increment
//! let response = runtime
//!     .dispatch("CounterActor", "42", "Increment", b"3", None)
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Core Guarantees
//!
//! - **Per-instance serialization**: at most one method body runs per
//!   `(type, id)` at any instant. With reentrancy enabled, frames carrying
//!   the holder's reentrancy id are admitted up to the configured stack
//!   depth; everyone else waits.
//! - **Transactional state**: every state operation stages an intent; a
//!   successful invocation commits all staged intents as one batch, a
//!   failed one resets the tracker so nothing leaks into the next call.
//! - **Reentrancy propagation**: the id arriving on a dispatch flows to
//!   every outbound actor-to-actor invocation made during that dispatch,
//!   and never crosses into unrelated dispatches.
//!
//! # Module Organization
//!
//! - [`actor`] - Actor/Remindable traits, per-instance context, timer and
//!   reminder records
//! - [`registry`] - explicit method registration and type-erased dispatch
//! - [`state`] - staged state manager and the transactional batch provider
//! - [`runtime`] - per-type managers, the process-wide runtime, config,
//!   reentrancy
//! - [`client`] - the abstract sidecar client the runtime calls out through
//! - [`util`] - actor ids and the sidecar duration wire format
//!
//! # Collaborator Boundaries
//!
//! The crate never opens a socket. Inbound, the host's transport layer maps
//! the sidecar's callbacks onto [`ActorRuntime`]'s entry points; outbound,
//! every call goes through the [`SidecarClient`] trait. Values round-trip
//! through `serde`; the wire codec is JSON.

pub mod actor;
pub mod client;
pub mod registry;
pub mod runtime;
pub mod state;
pub mod util;

// Re-export commonly used types
pub use actor::{
    Actor, ActorCallType, ActorContext, ActorError, ActorInstance, ActorMethodContext,
    ActorReminderData, ActorTimerData, Remindable,
};
pub use client::{SidecarClient, SidecarError, REENTRANCY_ID_HEADER};
pub use registry::{ActorFactory, ActorRegistration, ActorTypeInfo, MethodDispatcher};
pub use runtime::{
    current_reentrancy_id, ActorReentrancyConfig, ActorRuntime, ActorRuntimeConfig,
    ActorTypeConfig, RuntimeError,
};
pub use state::{ActorStateManager, StateChangeKind};
pub use util::ActorId;
