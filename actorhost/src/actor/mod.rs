//! Actor base: traits, per-instance context, and the wire records for
//! timers and reminders.
//!
//! # Module Organization (§4.3)
//!
//! This mod.rs file contains ONLY module declarations and re-exports.
//!
//! - `traits.rs` - Actor and Remindable traits (lifecycle hooks)
//! - `context.rs` - ActorContext, the per-instance runtime handle
//! - `instance.rs` - ActorInstance and the internal lifecycle pipeline
//! - `method_context.rs` - ActorMethodContext / ActorCallType
//! - `timer.rs` - ActorTimerData
//! - `reminder.rs` - ActorReminderData
//! - `error.rs` - ActorError

pub mod context;
pub mod error;
pub mod instance;
pub mod method_context;
pub mod reminder;
pub mod timer;
pub mod traits;

pub use context::ActorContext;
pub use error::ActorError;
pub use instance::ActorInstance;
pub use method_context::{
    ActorCallType, ActorMethodContext, REMINDER_METHOD_NAME, TIMER_METHOD_NAME,
};
pub use reminder::ActorReminderData;
pub use timer::ActorTimerData;
pub use traits::{Actor, Remindable};
