//! Actor type registration and method dispatch tables.
//!
//! Dispatch is driven by explicit registration rather than reflection: each
//! actor type declares its callable surface through
//! [`ActorRegistration`], which bakes argument decoding and return encoding
//! into a type-erased table consumed by the per-type manager.
//!
//! # Module Organization (§4.3)
//!
//! This mod.rs file contains ONLY module declarations and re-exports.
//!
//! - `builder.rs` - ActorRegistration builder and the actor factory
//! - `dispatcher.rs` - DispatchEntry and MethodDispatcher
//! - `type_info.rs` - ActorTypeInfo

pub mod builder;
pub mod dispatcher;
pub mod type_info;

pub use builder::{ActorFactory, ActorRegistration};
pub use dispatcher::{DispatchEntry, MethodDispatcher};
pub use type_info::ActorTypeInfo;
