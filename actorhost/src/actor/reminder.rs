//! Durable reminder records.

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

// Layer 3: Internal module imports
use crate::util::{from_sidecar_duration, to_sidecar_duration};

/// A reminder persisted by the sidecar on behalf of one actor.
///
/// Unlike timers, reminders survive deactivation: the sidecar stores the
/// schedule and the opaque state bytes and delivers them back into the
/// process when the reminder fires.
///
/// Wire body sent on registration:
/// `{"reminderName": ..., "dueTime": ..., "period": ..., "data": base64, "ttl"?}`
/// with `ttl` omitted when absent.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorReminderData {
    name: String,
    state: Vec<u8>,
    due_time: Duration,
    period: Duration,
    ttl: Option<Duration>,
}

impl ActorReminderData {
    /// Create a reminder record.
    pub fn new(
        name: impl Into<String>,
        state: Vec<u8>,
        due_time: Duration,
        period: Duration,
        ttl: Option<Duration>,
    ) -> Self {
        Self {
            name: name.into(),
            state,
            due_time,
            period,
            ttl,
        }
    }

    /// Rebuild a reminder from the JSON object the sidecar delivers on fire.
    ///
    /// The sidecar is trusted here: absent or unreadable fields fall back to
    /// empty state and zero durations rather than failing the fire.
    pub(crate) fn from_fire_body(name: &str, body: &Map<String, Value>) -> Self {
        let state = body
            .get("data")
            .and_then(Value::as_str)
            .and_then(|encoded| BASE64.decode(encoded).ok())
            .unwrap_or_default();
        let parse = |key: &str| {
            body.get(key)
                .and_then(Value::as_str)
                .and_then(|literal| from_sidecar_duration(literal).ok())
        };
        Self {
            name: name.to_string(),
            state,
            due_time: parse("dueTime").unwrap_or(Duration::ZERO),
            period: parse("period").unwrap_or(Duration::ZERO),
            ttl: parse("ttl"),
        }
    }

    /// Reminder name, unique per actor.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The user state delivered on every fire.
    pub fn state(&self) -> &[u8] {
        &self.state
    }

    /// Delay before the first fire.
    pub fn due_time(&self) -> Duration {
        self.due_time
    }

    /// Interval between fires after the first.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Interval after which the sidecar stops firing the reminder.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }
}

impl Serialize for ActorReminderData {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let fields = if self.ttl.is_some() { 5 } else { 4 };
        let mut body = serializer.serialize_struct("ActorReminderData", fields)?;
        body.serialize_field("reminderName", &self.name)?;
        body.serialize_field("dueTime", &to_sidecar_duration(self.due_time))?;
        body.serialize_field("period", &to_sidecar_duration(self.period))?;
        body.serialize_field("data", &BASE64.encode(&self.state))?;
        if let Some(ttl) = self.ttl {
            body.serialize_field("ttl", &to_sidecar_duration(ttl))?;
        }
        body.end()
    }
}
