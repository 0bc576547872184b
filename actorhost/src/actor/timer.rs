//! Per-actor timer records.

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};
use serde_json::Value;

// Layer 3: Internal module imports
use crate::util::{sidecar_duration, sidecar_duration_opt};

/// A timer registered on one actor instance.
///
/// Only the schedule is advertised to the sidecar; the callback stays in
/// process as the name of a timer callback registered for the actor type.
/// Timers are not durable: deactivation drops the table.
///
/// Wire body sent on registration:
/// `{"callback": ..., "data": ..., "dueTime": ..., "period": ..., "ttl"?}`
/// with durations in the sidecar format and `ttl` omitted when absent.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActorTimerData {
    #[serde(skip)]
    name: String,
    callback: String,
    data: Value,
    #[serde(with = "sidecar_duration")]
    due_time: Duration,
    #[serde(with = "sidecar_duration")]
    period: Duration,
    #[serde(with = "sidecar_duration_opt", skip_serializing_if = "Option::is_none")]
    ttl: Option<Duration>,
}

impl ActorTimerData {
    /// Create a timer record.
    pub fn new(
        name: impl Into<String>,
        callback: impl Into<String>,
        data: Value,
        due_time: Duration,
        period: Duration,
        ttl: Option<Duration>,
    ) -> Self {
        Self {
            name: name.into(),
            callback: callback.into(),
            data,
            due_time,
            period,
            ttl,
        }
    }

    /// Timer name, unique per actor instance.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the in-process timer callback to invoke on fire.
    pub fn callback(&self) -> &str {
        &self.callback
    }

    /// The state handed to the callback on every fire.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Delay before the first fire.
    pub fn due_time(&self) -> Duration {
        self.due_time
    }

    /// Interval between fires after the first.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Interval after which the sidecar stops firing the timer.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }
}

/// Body delivered by the sidecar when a timer fires.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TimerFireBody {
    #[serde(default)]
    pub callback: Option<String>,
    #[serde(default)]
    pub data: Value,
}
