//! Shared fixtures for the integration tests: a recording sidecar client
//! and a handful of registered fake actor types.
#![allow(dead_code)]

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

// Layer 3: Internal module imports
use actorhost::{
    current_reentrancy_id, Actor, ActorContext, ActorError, ActorId, ActorRegistration,
    ActorReminderData, Remindable, SidecarClient, SidecarError,
};

/// One recorded `invoke_actor_method` call.
#[derive(Debug, Clone)]
pub struct RecordedInvocation {
    pub reentrancy_id: Option<String>,
    pub actor_type: String,
    pub actor_id: String,
    pub method: String,
    pub data: Vec<u8>,
}

/// Records every outbound call and serves state reads from a seeded map.
#[derive(Default)]
pub struct MockSidecarClient {
    pub state: Mutex<HashMap<String, Vec<u8>>>,
    pub saved: Mutex<Vec<Vec<u8>>>,
    pub reminders: Mutex<Vec<(String, Vec<u8>)>>,
    pub unregistered_reminders: Mutex<Vec<String>>,
    pub timers: Mutex<Vec<(String, Vec<u8>)>>,
    pub unregistered_timers: Mutex<Vec<String>>,
    pub invocations: Mutex<Vec<RecordedInvocation>>,
}

impl MockSidecarClient {
    pub fn seed_state(&self, key: &str, payload: &[u8]) {
        self.state.lock().insert(key.to_string(), payload.to_vec());
    }

    pub fn saved_bodies(&self) -> Vec<String> {
        self.saved
            .lock()
            .iter()
            .map(|body| String::from_utf8_lossy(body).into_owned())
            .collect()
    }
}

#[async_trait]
impl SidecarClient for MockSidecarClient {
    async fn invoke_actor_method(
        &self,
        reentrancy_id: Option<&str>,
        actor_type: &str,
        actor_id: &ActorId,
        method: &str,
        data: Vec<u8>,
    ) -> Result<Vec<u8>, SidecarError> {
        self.invocations.lock().push(RecordedInvocation {
            reentrancy_id: reentrancy_id.map(str::to_string),
            actor_type: actor_type.to_string(),
            actor_id: actor_id.to_string(),
            method: method.to_string(),
            data,
        });
        Ok(Vec::new())
    }

    async fn get_state(
        &self,
        _actor_type: &str,
        _actor_id: &ActorId,
        key: &str,
    ) -> Result<Option<Vec<u8>>, SidecarError> {
        Ok(self.state.lock().get(key).cloned())
    }

    async fn save_state_transactionally(
        &self,
        _actor_type: &str,
        _actor_id: &ActorId,
        body: Vec<u8>,
    ) -> Result<(), SidecarError> {
        self.saved.lock().push(body);
        Ok(())
    }

    async fn register_reminder(
        &self,
        _actor_type: &str,
        _actor_id: &ActorId,
        name: &str,
        body: Vec<u8>,
    ) -> Result<(), SidecarError> {
        self.reminders.lock().push((name.to_string(), body));
        Ok(())
    }

    async fn unregister_reminder(
        &self,
        _actor_type: &str,
        _actor_id: &ActorId,
        name: &str,
    ) -> Result<(), SidecarError> {
        self.unregistered_reminders.lock().push(name.to_string());
        Ok(())
    }

    async fn register_timer(
        &self,
        _actor_type: &str,
        _actor_id: &ActorId,
        name: &str,
        body: Vec<u8>,
    ) -> Result<(), SidecarError> {
        self.timers.lock().push((name.to_string(), body));
        Ok(())
    }

    async fn unregister_timer(
        &self,
        _actor_type: &str,
        _actor_id: &ActorId,
        name: &str,
    ) -> Result<(), SidecarError> {
        self.unregistered_timers.lock().push(name.to_string());
        Ok(())
    }
}

/// Plain actor with one typed method, one action pair, and a reminder
/// registration helper.
pub struct FakeSimpleActor {
    pub ctx: ActorContext,
}

impl Actor for FakeSimpleActor {
    fn actor_type() -> &'static str {
        "FakeSimpleActor"
    }
}

impl FakeSimpleActor {
    pub async fn actor_method(self: Arc<Self>, _arg: i64) -> Result<Value, ActorError> {
        Ok(json!({"name": "actor_method"}))
    }

    pub async fn action(self: Arc<Self>, _data: Value) -> Result<String, ActorError> {
        Ok("processed".to_string())
    }

    pub async fn action_no_arg(self: Arc<Self>) -> Result<String, ActorError> {
        Ok("processed_no_arg".to_string())
    }

    pub async fn register_test_reminder(self: Arc<Self>) -> Result<Value, ActorError> {
        self.ctx
            .register_reminder(
                "test_reminder",
                b"reminder_message",
                Duration::from_secs(1),
                Duration::from_secs(1),
                None,
            )
            .await?;
        Ok(Value::Null)
    }

    pub async fn save_some_state(self: Arc<Self>, value: Value) -> Result<Value, ActorError> {
        self.ctx.state().set_state("payload", value).await?;
        Ok(Value::Null)
    }

    pub async fn fail(self: Arc<Self>, _arg: Value) -> Result<Value, ActorError> {
        self.ctx.state().set_state("leak", "staged").await?;
        Err(ActorError::method_failed("intentional failure"))
    }
}

pub fn fake_simple_registration() -> ActorRegistration<FakeSimpleActor> {
    ActorRegistration::new(|ctx| FakeSimpleActor { ctx })
        .method("ActorMethod", FakeSimpleActor::actor_method)
        .method("ActionMethod", FakeSimpleActor::action)
        .method_no_arg("ActionMethodWithoutArg", FakeSimpleActor::action_no_arg)
        .method_no_arg("RegisterReminder", FakeSimpleActor::register_test_reminder)
        .method("SaveSomeState", FakeSimpleActor::save_some_state)
        .method("FailMethod", FakeSimpleActor::fail)
}

/// Actor whose methods report the reentrancy id they ran under.
pub struct FakeReentrantActor {
    pub ctx: ActorContext,
}

impl Actor for FakeReentrantActor {
    fn actor_type() -> &'static str {
        "FakeReentrantActor"
    }
}

impl FakeReentrantActor {
    pub async fn reentrant_method(self: Arc<Self>, _data: Value) -> Result<Option<String>, ActorError> {
        Ok(current_reentrancy_id())
    }

    pub async fn reentrant_passthrough(
        self: Arc<Self>,
        _data: Value,
    ) -> Result<Option<String>, ActorError> {
        self.ctx
            .invoke_actor_method(
                "FakeSlowReentrantActor",
                &ActorId::new("test-id"),
                "ReentrantMethod",
                b"{}".to_vec(),
            )
            .await?;
        Ok(current_reentrancy_id())
    }
}

pub fn fake_reentrant_registration() -> ActorRegistration<FakeReentrantActor> {
    ActorRegistration::new(|ctx| FakeReentrantActor { ctx })
        .method("ReentrantMethod", FakeReentrantActor::reentrant_method)
        .method(
            "ReentrantMethodWithPassthrough",
            FakeReentrantActor::reentrant_passthrough,
        )
}

/// Second reentrant type, used for the interleaving scenario.
pub struct FakeSlowReentrantActor {
    pub ctx: ActorContext,
}

impl Actor for FakeSlowReentrantActor {
    fn actor_type() -> &'static str {
        "FakeSlowReentrantActor"
    }
}

impl FakeSlowReentrantActor {
    pub async fn reentrant_method(
        self: Arc<Self>,
        _data: Value,
    ) -> Result<Option<String>, ActorError> {
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok(current_reentrancy_id())
    }
}

pub fn fake_slow_reentrant_registration() -> ActorRegistration<FakeSlowReentrantActor> {
    ActorRegistration::new(|ctx| FakeSlowReentrantActor { ctx })
        .method("ReentrantMethod", FakeSlowReentrantActor::reentrant_method)
}

/// Reminder-capable actor that records every delivery.
pub struct FakeReminderActor {
    pub ctx: ActorContext,
    pub received: Arc<Mutex<Vec<ActorReminderData>>>,
}

impl Actor for FakeReminderActor {
    fn actor_type() -> &'static str {
        "FakeReminderActor"
    }
}

#[async_trait]
impl Remindable for FakeReminderActor {
    async fn receive_reminder(&self, reminder: ActorReminderData) -> Result<(), ActorError> {
        self.received.lock().push(reminder);
        Ok(())
    }
}

impl FakeReminderActor {
    pub async fn actor_method(self: Arc<Self>, _arg: i64) -> Result<Value, ActorError> {
        Ok(json!({"name": "actor_method"}))
    }
}

pub fn fake_reminder_registration(
    received: Arc<Mutex<Vec<ActorReminderData>>>,
) -> ActorRegistration<FakeReminderActor> {
    ActorRegistration::new(move |ctx| FakeReminderActor {
        ctx,
        received: Arc::clone(&received),
    })
    .method("ActorMethod", FakeReminderActor::actor_method)
    .with_reminders()
}

/// Actor that detects overlapping method bodies on one instance.
pub struct SerialProbeActor {
    pub ctx: ActorContext,
    pub in_flight: AtomicBool,
    pub violations: Arc<AtomicU32>,
}

impl Actor for SerialProbeActor {
    fn actor_type() -> &'static str {
        "SerialProbeActor"
    }
}

impl SerialProbeActor {
    pub async fn work(self: Arc<Self>, _arg: i64) -> Result<i64, ActorError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            self.violations.fetch_add(1, Ordering::SeqCst);
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
        self.in_flight.store(false, Ordering::SeqCst);
        Ok(0)
    }
}

pub fn serial_probe_registration(
    violations: Arc<AtomicU32>,
) -> ActorRegistration<SerialProbeActor> {
    ActorRegistration::new(move |ctx| SerialProbeActor {
        ctx,
        in_flight: AtomicBool::new(false),
        violations: Arc::clone(&violations),
    })
    .method("Work", SerialProbeActor::work)
}

/// Actor whose method parks on a semaphore until the test releases it.
pub struct BlockingActor {
    pub ctx: ActorContext,
    pub parked: Arc<tokio::sync::Semaphore>,
}

impl Actor for BlockingActor {
    fn actor_type() -> &'static str {
        "BlockingActor"
    }
}

impl BlockingActor {
    pub async fn wait(self: Arc<Self>, _arg: Value) -> Result<Option<String>, ActorError> {
        let permit = self
            .parked
            .acquire()
            .await
            .map_err(|_| ActorError::method_failed("semaphore closed"))?;
        drop(permit);
        Ok(current_reentrancy_id())
    }
}

pub fn blocking_registration(
    parked: Arc<tokio::sync::Semaphore>,
) -> ActorRegistration<BlockingActor> {
    ActorRegistration::new(move |ctx| BlockingActor {
        ctx,
        parked: Arc::clone(&parked),
    })
    .method("WaitMethod", BlockingActor::wait)
}
