//! Staged actor state with transactional commit.
//!
//! Writes never hit the sidecar directly: each operation stages an intent
//! in a per-instance tracker, and the runtime flushes the tracker as one
//! transactional batch after every successful invocation.
//!
//! # Module Organization (§4.3)
//!
//! This mod.rs file contains ONLY module declarations and re-exports.
//!
//! - `change.rs` - change kinds, tracker entries, and the insertion-ordered tracker
//! - `provider.rs` - sidecar adapter building the transactional batch body
//! - `manager.rs` - the per-instance state manager

pub mod change;
pub mod manager;
pub mod provider;

pub use change::{ActorStateChange, StateChangeKind, StateMetadata};
pub use manager::ActorStateManager;
pub use provider::StateProvider;
