//! Explicit interface registration for actor types.

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;

// Layer 3: Internal module imports
use super::dispatcher::{erase_timer_callback, DispatchEntry, MethodDispatcher, TimerHandler};
use super::type_info::ActorTypeInfo;
use crate::actor::{Actor, ActorContext, ActorError, ActorReminderData, Remindable};
use crate::runtime::RuntimeError;

/// Constructs a user actor from its per-instance context.
pub type ActorFactory<A> = Arc<dyn Fn(ActorContext) -> A + Send + Sync>;

/// Erased reminder delivery shim installed by
/// [`ActorRegistration::with_reminders`].
pub(crate) type ReminderHandler<A> = Arc<
    dyn Fn(Arc<A>, ActorReminderData) -> BoxFuture<'static, Result<(), RuntimeError>> + Send + Sync,
>;

/// Builder declaring the callable surface of one actor type.
///
/// Where a reflective runtime would walk the type for dispatchable methods,
/// here the type registers them explicitly: each entry binds an actor
/// method name to a handler together with its argument decoding and return
/// encoding. The registration is consumed by
/// [`ActorRuntime::register_actor`](crate::runtime::ActorRuntime::register_actor).
///
/// # Example
/// ```rust,ignore
/// let registration = ActorRegistration::new(|ctx| CounterActor { ctx })
///     .method("Increment", CounterActor::increment)
///     .method_no_arg("Read", CounterActor::read)
///     .timer_callback("on_tick", CounterActor::on_tick);
/// ```
pub struct ActorRegistration<A: Actor> {
    type_name: String,
    remindable: bool,
    factory: ActorFactory<A>,
    entries: Vec<DispatchEntry<A>>,
    timer_callbacks: HashMap<String, TimerHandler<A>>,
    reminder_handler: Option<ReminderHandler<A>>,
}

impl<A: Actor> ActorRegistration<A> {
    /// Start a registration for `A`, constructed by `factory` on
    /// activation.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(ActorContext) -> A + Send + Sync + 'static,
    {
        Self {
            type_name: A::actor_type().to_string(),
            remindable: false,
            factory: Arc::new(factory),
            entries: Vec::new(),
            timer_callbacks: HashMap::new(),
            reminder_handler: None,
        }
    }

    /// Register a method taking one deserialized argument. Registering the
    /// same name again replaces the earlier entry.
    pub fn method<Arg, R, F, Fut>(mut self, name: impl Into<String>, method: F) -> Self
    where
        Arg: DeserializeOwned + Send + 'static,
        R: Serialize + Send + 'static,
        F: Fn(Arc<A>, Arg) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, ActorError>> + Send + 'static,
    {
        self.push_entry(DispatchEntry::from_method(name, method));
        self
    }

    /// Register a method taking no argument.
    pub fn method_no_arg<R, F, Fut>(mut self, name: impl Into<String>, method: F) -> Self
    where
        R: Serialize + Send + 'static,
        F: Fn(Arc<A>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, ActorError>> + Send + 'static,
    {
        self.push_entry(DispatchEntry::from_method_no_arg(name, method));
        self
    }

    /// Register a timer callback. Timers registered through
    /// [`ActorContext::register_timer`](crate::actor::ActorContext::register_timer)
    /// name one of these; the stored timer state is delivered on every
    /// fire.
    pub fn timer_callback<S, F, Fut>(mut self, name: impl Into<String>, callback: F) -> Self
    where
        S: DeserializeOwned + Send + 'static,
        F: Fn(Arc<A>, S) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ActorError>> + Send + 'static,
    {
        self.timer_callbacks
            .insert(name.into(), erase_timer_callback(callback));
        self
    }

    /// Mark the type reminder-capable and route reminder fires to
    /// [`Remindable::receive_reminder`].
    pub fn with_reminders(mut self) -> Self
    where
        A: Remindable,
    {
        self.remindable = true;
        self.reminder_handler = Some(Arc::new(|actor: Arc<A>, reminder| {
            Box::pin(async move {
                actor
                    .receive_reminder(reminder)
                    .await
                    .map_err(RuntimeError::Actor)
            })
        }));
        self
    }

    /// The type name this registration declares.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    fn push_entry(&mut self, entry: DispatchEntry<A>) {
        self.entries.retain(|existing| existing.name() != entry.name());
        self.entries.push(entry);
    }

    /// Finalize into the pieces a manager is built from. Fails when no
    /// methods were registered.
    pub(crate) fn into_parts(self) -> Result<RegistrationParts<A>, RuntimeError> {
        if self.entries.is_empty() {
            return Err(RuntimeError::NoMethodsRegistered(self.type_name));
        }
        let type_info = Arc::new(ActorTypeInfo::new(&self.type_name, self.remindable));
        let dispatcher = MethodDispatcher::new(&self.type_name, self.entries);
        Ok(RegistrationParts {
            type_info,
            factory: self.factory,
            dispatcher,
            timer_callbacks: self.timer_callbacks,
            reminder_handler: self.reminder_handler,
        })
    }
}

pub(crate) struct RegistrationParts<A: Actor> {
    pub type_info: Arc<ActorTypeInfo>,
    pub factory: ActorFactory<A>,
    pub dispatcher: MethodDispatcher<A>,
    pub timer_callbacks: HashMap<String, TimerHandler<A>>,
    pub reminder_handler: Option<ReminderHandler<A>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct FakeActor;

    impl Actor for FakeActor {
        fn actor_type() -> &'static str {
            "FakeActor"
        }
    }

    #[async_trait]
    impl Remindable for FakeActor {
        async fn receive_reminder(&self, _reminder: ActorReminderData) -> Result<(), ActorError> {
            Ok(())
        }
    }

    impl FakeActor {
        async fn noop(self: Arc<Self>, _arg: Value) -> Result<Value, ActorError> {
            Ok(json!(null))
        }
    }

    #[test]
    fn test_type_name_comes_from_the_actor_trait() {
        let registration = ActorRegistration::new(|_| FakeActor);
        assert_eq!(registration.type_name(), "FakeActor");
    }

    #[test]
    fn test_empty_registration_is_rejected() {
        let err = ActorRegistration::new(|_| FakeActor)
            .into_parts()
            .err()
            .expect("no methods");
        assert!(matches!(err, RuntimeError::NoMethodsRegistered(_)));
    }

    #[test]
    fn test_registration_collects_methods() {
        let parts = ActorRegistration::new(|_| FakeActor)
            .method("Noop", FakeActor::noop)
            .into_parts()
            .expect("parts");
        assert!(parts.dispatcher.contains("Noop"));
        assert!(!parts.type_info.is_remindable());
        assert!(parts.reminder_handler.is_none());
    }

    #[test]
    fn test_reregistering_a_method_replaces_it() {
        let parts = ActorRegistration::new(|_| FakeActor)
            .method("Noop", FakeActor::noop)
            .method("Noop", FakeActor::noop)
            .into_parts()
            .expect("parts");
        assert_eq!(parts.dispatcher.method_names(), ["Noop"]);
    }

    #[test]
    fn test_with_reminders_marks_type_remindable() {
        let parts = ActorRegistration::new(|_| FakeActor)
            .method("Noop", FakeActor::noop)
            .with_reminders()
            .into_parts()
            .expect("parts");
        assert!(parts.type_info.is_remindable());
        assert!(parts.reminder_handler.is_some());
    }

    #[test]
    fn test_timer_callbacks_are_collected() {
        let parts = ActorRegistration::new(|_| FakeActor)
            .method("Noop", FakeActor::noop)
            .timer_callback("on_tick", |_actor: Arc<FakeActor>, _state: Value| async {
                Ok(())
            })
            .into_parts()
            .expect("parts");
        assert!(parts.timer_callbacks.contains_key("on_tick"));
    }
}
