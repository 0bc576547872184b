//! Type-erased method dispatch for one actor type.

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

// Layer 3: Internal module imports
use crate::actor::{Actor, ActorError};
use crate::runtime::RuntimeError;

/// Erased method handler: body bytes in, response bytes out. Argument
/// decoding and return encoding are baked in at registration time, so the
/// dispatch path needs no type information.
pub(crate) type MethodHandler<A> =
    Arc<dyn Fn(Arc<A>, Vec<u8>) -> BoxFuture<'static, Result<Vec<u8>, RuntimeError>> + Send + Sync>;

/// Erased timer callback: the stored timer state in, nothing out.
pub(crate) type TimerHandler<A> =
    Arc<dyn Fn(Arc<A>, Value) -> BoxFuture<'static, Result<(), RuntimeError>> + Send + Sync>;

/// One dispatchable method of an actor type.
pub struct DispatchEntry<A: Actor> {
    name: String,
    expects_arg: bool,
    handler: MethodHandler<A>,
}

impl<A: Actor> Clone for DispatchEntry<A> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            expects_arg: self.expects_arg,
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<A: Actor> DispatchEntry<A> {
    /// Wrap a single-argument method. The body deserializes as `Arg`; the
    /// return value serializes back to bytes.
    pub(crate) fn from_method<Arg, R, F, Fut>(name: impl Into<String>, method: F) -> Self
    where
        Arg: DeserializeOwned + Send + 'static,
        R: Serialize + Send + 'static,
        F: Fn(Arc<A>, Arg) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, ActorError>> + Send + 'static,
    {
        let handler: MethodHandler<A> = Arc::new(move |actor, body| {
            let decoded = serde_json::from_slice::<Arg>(&body)
                .map(|arg| method(actor, arg))
                .map_err(RuntimeError::Serialization);
            Box::pin(async move {
                let value = decoded?.await.map_err(RuntimeError::Actor)?;
                serde_json::to_vec(&value).map_err(RuntimeError::Serialization)
            })
        });
        Self {
            name: name.into(),
            expects_arg: true,
            handler,
        }
    }

    /// Wrap a no-argument method; the request body is ignored.
    pub(crate) fn from_method_no_arg<R, F, Fut>(name: impl Into<String>, method: F) -> Self
    where
        R: Serialize + Send + 'static,
        F: Fn(Arc<A>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, ActorError>> + Send + 'static,
    {
        let handler: MethodHandler<A> = Arc::new(move |actor, _body| {
            let invocation = method(actor);
            Box::pin(async move {
                let value = invocation.await.map_err(RuntimeError::Actor)?;
                serde_json::to_vec(&value).map_err(RuntimeError::Serialization)
            })
        });
        Self {
            name: name.into(),
            expects_arg: false,
            handler,
        }
    }

    /// The actor method name this entry answers to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the method takes a deserialized argument.
    pub fn expects_arg(&self) -> bool {
        self.expects_arg
    }
}

/// Wrap a typed timer callback into its erased form.
pub(crate) fn erase_timer_callback<A, S, F, Fut>(callback: F) -> TimerHandler<A>
where
    A: Actor,
    S: DeserializeOwned + Send + 'static,
    F: Fn(Arc<A>, S) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ActorError>> + Send + 'static,
{
    Arc::new(move |actor, state| {
        let decoded = serde_json::from_value::<S>(state)
            .map(|state| callback(actor, state))
            .map_err(RuntimeError::Serialization);
        Box::pin(async move { decoded?.await.map_err(RuntimeError::Actor) })
    })
}

/// Immutable dispatch table for one actor type.
///
/// Built once at registration; lookups never allocate on the dispatch
/// path beyond the response buffer.
pub struct MethodDispatcher<A: Actor> {
    type_name: String,
    entries: HashMap<String, DispatchEntry<A>>,
}

impl<A: Actor> MethodDispatcher<A> {
    pub(crate) fn new(type_name: impl Into<String>, entries: Vec<DispatchEntry<A>>) -> Self {
        Self {
            type_name: type_name.into(),
            entries: entries
                .into_iter()
                .map(|entry| (entry.name.clone(), entry))
                .collect(),
        }
    }

    /// Whether `name` is dispatchable.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered actor method names.
    pub fn method_names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Whether `name` takes an argument; fails for unknown names.
    pub fn expects_arg(&self, name: &str) -> Result<bool, RuntimeError> {
        self.entry(name).map(DispatchEntry::expects_arg)
    }

    /// Invoke `name` on `actor` with the raw request body; returns the
    /// serialized return value.
    pub async fn dispatch(
        &self,
        actor: Arc<A>,
        name: &str,
        body: Vec<u8>,
    ) -> Result<Vec<u8>, RuntimeError> {
        let entry = self.entry(name)?;
        (entry.handler)(actor, body).await
    }

    fn entry(&self, name: &str) -> Result<&DispatchEntry<A>, RuntimeError> {
        self.entries.get(name).ok_or_else(|| RuntimeError::NoSuchMethod {
            actor_type: self.type_name.clone(),
            method: name.to_string(),
        })
    }
}
