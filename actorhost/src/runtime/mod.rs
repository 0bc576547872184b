//! The runtime core: per-type managers, the process-wide registry, the
//! advertised configuration, and the reentrancy machinery.
//!
//! # Module Organization (§4.3)
//!
//! This mod.rs file contains ONLY module declarations and re-exports.
//!
//! - `runtime.rs` - ActorRuntime, the sidecar callback surface
//! - `manager.rs` - ActorManager, one per registered type
//! - `gate.rs` - reentrancy-aware per-instance serialization gate
//! - `config.rs` - ActorRuntimeConfig and per-type overrides
//! - `reentrancy.rs` - call-scoped reentrancy id
//! - `errors.rs` - RuntimeError

pub mod config;
pub mod errors;
pub(crate) mod gate;
pub mod manager;
pub mod reentrancy;
#[allow(clippy::module_inception)]
pub mod runtime;

pub use config::{
    ActorReentrancyConfig, ActorRuntimeConfig, ActorRuntimeConfigBuilder, ActorTypeConfig,
    DEFAULT_ACTOR_IDLE_TIMEOUT, DEFAULT_ACTOR_SCAN_INTERVAL, DEFAULT_DRAIN_ONGOING_CALL_TIMEOUT,
    DEFAULT_MAX_STACK_DEPTH,
};
pub use errors::RuntimeError;
pub use manager::ActorManager;
pub use reentrancy::current_reentrancy_id;
pub use runtime::ActorRuntime;
