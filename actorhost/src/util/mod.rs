//! Shared utilities: actor identity and the sidecar duration wire format.
//!
//! # Module Organization (§4.3)
//!
//! This mod.rs file contains ONLY module declarations and re-exports.
//!
//! - `ids.rs` - ActorId value object
//! - `duration.rs` - Go-style duration rendering/parsing and serde adapters

pub mod duration;
pub mod ids;

pub use duration::{
    from_sidecar_duration, sidecar_duration, sidecar_duration_opt, to_sidecar_duration,
    InvalidDuration,
};
pub use ids::ActorId;
