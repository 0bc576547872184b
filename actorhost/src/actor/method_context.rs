//! Method invocation metadata passed to the pre/post actor hooks.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
// (none)

/// Method name the manager dispatches timer fires under.
pub const TIMER_METHOD_NAME: &str = "fire_timer";

/// Method name the manager dispatches reminder fires under.
pub const REMINDER_METHOD_NAME: &str = "receive_reminder";

/// The kind of call a dispatch originated from.
///
/// Passed to [`Actor::on_pre_actor_method`](crate::actor::Actor::on_pre_actor_method)
/// and [`Actor::on_post_actor_method`](crate::actor::Actor::on_post_actor_method)
/// so hooks can distinguish client requests from timer and reminder fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorCallType {
    /// A client request routed by the sidecar to an interface method.
    ActorInterfaceMethod,
    /// A timer callback firing.
    TimerMethod,
    /// A reminder delivery firing.
    ReminderMethod,
}

/// Context describing the method a dispatch is about to run (or just ran).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorMethodContext {
    method_name: String,
    call_type: ActorCallType,
}

impl ActorMethodContext {
    /// Context for a client-requested interface method.
    pub fn create_for_actor(method_name: impl Into<String>) -> Self {
        Self {
            method_name: method_name.into(),
            call_type: ActorCallType::ActorInterfaceMethod,
        }
    }

    /// Context for a timer fire.
    pub fn create_for_timer(method_name: impl Into<String>) -> Self {
        Self {
            method_name: method_name.into(),
            call_type: ActorCallType::TimerMethod,
        }
    }

    /// Context for a reminder fire.
    pub fn create_for_reminder(method_name: impl Into<String>) -> Self {
        Self {
            method_name: method_name.into(),
            call_type: ActorCallType::ReminderMethod,
        }
    }

    /// The dispatched method name.
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// The call kind.
    pub fn call_type(&self) -> ActorCallType {
        self.call_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_for_actor() {
        let ctx = ActorMethodContext::create_for_actor("GetCount");
        assert_eq!(ctx.method_name(), "GetCount");
        assert_eq!(ctx.call_type(), ActorCallType::ActorInterfaceMethod);
    }

    #[test]
    fn test_create_for_timer() {
        let ctx = ActorMethodContext::create_for_timer(TIMER_METHOD_NAME);
        assert_eq!(ctx.method_name(), "fire_timer");
        assert_eq!(ctx.call_type(), ActorCallType::TimerMethod);
    }

    #[test]
    fn test_create_for_reminder() {
        let ctx = ActorMethodContext::create_for_reminder(REMINDER_METHOD_NAME);
        assert_eq!(ctx.method_name(), "receive_reminder");
        assert_eq!(ctx.call_type(), ActorCallType::ReminderMethod);
    }
}
