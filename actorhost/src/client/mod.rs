//! Abstract sidecar client.
//!
//! # Module Organization (§4.3)
//!
//! This mod.rs file contains ONLY module declarations and re-exports.
//!
//! - `traits.rs` - SidecarClient trait and the reentrancy header constant
//! - `error.rs` - SidecarError

pub mod error;
pub mod traits;

#[cfg(test)]
pub(crate) mod fake;

pub use error::SidecarError;
pub use traits::{SidecarClient, REENTRANCY_ID_HEADER};
