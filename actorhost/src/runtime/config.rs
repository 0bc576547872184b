//! Runtime configuration advertised to the sidecar.

// Layer 1: Standard library imports
use std::collections::BTreeSet;
use std::time::Duration;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use crate::util::{sidecar_duration, sidecar_duration_opt};

/// Default timeout before the sidecar deactivates an idle actor (1 hour)
pub const DEFAULT_ACTOR_IDLE_TIMEOUT: Duration = Duration::from_secs(3600);

/// Default interval between idle-actor scans (30 seconds)
pub const DEFAULT_ACTOR_SCAN_INTERVAL: Duration = Duration::from_secs(30);

/// Default grace period for an ongoing call before deactivation (1 minute)
pub const DEFAULT_DRAIN_ONGOING_CALL_TIMEOUT: Duration = Duration::from_secs(60);

/// Default limit on concurrent frames of one reentrant call chain
pub const DEFAULT_MAX_STACK_DEPTH: u32 = 32;

/// Reentrancy behavior for an actor type (or the whole host).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorReentrancyConfig {
    /// Whether calls carrying the chain's reentrancy id may re-enter a busy
    /// instance.
    pub enabled: bool,
    /// Concurrent frames allowed per chain; further requests are denied.
    #[serde(rename = "maxStackDepth")]
    pub max_stack_depth: u32,
}

impl ActorReentrancyConfig {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            max_stack_depth: DEFAULT_MAX_STACK_DEPTH,
        }
    }

    pub fn with_max_stack_depth(mut self, max_stack_depth: u32) -> Self {
        self.max_stack_depth = max_stack_depth;
        self
    }
}

impl Default for ActorReentrancyConfig {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Per-type overrides of the host-wide actor behavior.
///
/// Serializes in the sidecar's `entitiesConfig` element shape: the type
/// name rides in a single-element `entities` array next to whichever
/// overrides are set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorTypeConfig {
    entities: Vec<String>,
    #[serde(
        with = "sidecar_duration_opt",
        skip_serializing_if = "Option::is_none",
        default
    )]
    actor_idle_timeout: Option<Duration>,
    #[serde(
        with = "sidecar_duration_opt",
        skip_serializing_if = "Option::is_none",
        default
    )]
    actor_scan_interval: Option<Duration>,
    #[serde(
        with = "sidecar_duration_opt",
        skip_serializing_if = "Option::is_none",
        default
    )]
    drain_ongoing_call_timeout: Option<Duration>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    drain_rebalanced_actors: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    reentrancy: Option<ActorReentrancyConfig>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    reminders_storage_partitions: Option<u32>,
}

impl ActorTypeConfig {
    /// Start an override block for `actor_type` with nothing overridden.
    pub fn new(actor_type: impl Into<String>) -> Self {
        Self {
            entities: vec![actor_type.into()],
            actor_idle_timeout: None,
            actor_scan_interval: None,
            drain_ongoing_call_timeout: None,
            drain_rebalanced_actors: None,
            reentrancy: None,
            reminders_storage_partitions: None,
        }
    }

    /// The actor type this block configures.
    pub fn actor_type(&self) -> &str {
        self.entities.first().map(String::as_str).unwrap_or("")
    }

    pub fn with_actor_idle_timeout(mut self, timeout: Duration) -> Self {
        self.actor_idle_timeout = Some(timeout);
        self
    }

    pub fn with_actor_scan_interval(mut self, interval: Duration) -> Self {
        self.actor_scan_interval = Some(interval);
        self
    }

    pub fn with_drain_ongoing_call_timeout(mut self, timeout: Duration) -> Self {
        self.drain_ongoing_call_timeout = Some(timeout);
        self
    }

    pub fn with_drain_rebalanced_actors(mut self, drain: bool) -> Self {
        self.drain_rebalanced_actors = Some(drain);
        self
    }

    pub fn with_reentrancy(mut self, reentrancy: ActorReentrancyConfig) -> Self {
        self.reentrancy = Some(reentrancy);
        self
    }

    pub fn with_reminders_storage_partitions(mut self, partitions: u32) -> Self {
        self.reminders_storage_partitions = Some(partitions);
        self
    }

    /// The reentrancy override, if one is set.
    pub fn reentrancy(&self) -> Option<&ActorReentrancyConfig> {
        self.reentrancy.as_ref()
    }
}

/// Host-wide actor behavior advertised to the sidecar's configuration
/// probe.
///
/// `entities` is the union of every registered actor type name and every
/// type named by a per-type override; durations serialize in the sidecar
/// duration format.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use actorhost::runtime::{ActorReentrancyConfig, ActorRuntimeConfig};
///
/// let config = ActorRuntimeConfig::builder()
///     .with_actor_idle_timeout(Duration::from_secs(1800))
///     .with_reentrancy(ActorReentrancyConfig::new(true))
///     .build()
///     .unwrap();
/// assert!(config.reentrancy_for("AnyType").0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorRuntimeConfig {
    entities: BTreeSet<String>,
    #[serde(with = "sidecar_duration")]
    actor_idle_timeout: Duration,
    #[serde(with = "sidecar_duration")]
    actor_scan_interval: Duration,
    #[serde(with = "sidecar_duration")]
    drain_ongoing_call_timeout: Duration,
    drain_rebalanced_actors: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    reentrancy: Option<ActorReentrancyConfig>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    reminders_storage_partitions: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    entities_config: Vec<ActorTypeConfig>,
}

impl Default for ActorRuntimeConfig {
    fn default() -> Self {
        Self {
            entities: BTreeSet::new(),
            actor_idle_timeout: DEFAULT_ACTOR_IDLE_TIMEOUT,
            actor_scan_interval: DEFAULT_ACTOR_SCAN_INTERVAL,
            drain_ongoing_call_timeout: DEFAULT_DRAIN_ONGOING_CALL_TIMEOUT,
            drain_rebalanced_actors: true,
            reentrancy: None,
            reminders_storage_partitions: None,
            entities_config: Vec::new(),
        }
    }
}

impl ActorRuntimeConfig {
    /// Create a configuration builder.
    pub fn builder() -> ActorRuntimeConfigBuilder {
        ActorRuntimeConfigBuilder::default()
    }

    /// Add one actor type name to the advertised entities.
    pub fn add_entity(&mut self, actor_type: impl Into<String>) {
        self.entities.insert(actor_type.into());
    }

    /// Union additional actor type names into the advertised entities.
    pub fn update_entities<I, S>(&mut self, actor_types: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entities
            .extend(actor_types.into_iter().map(Into::into));
    }

    /// Replace the per-type override blocks. Types they name join the
    /// advertised entities.
    pub fn update_actor_type_configs(&mut self, configs: Vec<ActorTypeConfig>) {
        for config in &configs {
            self.entities.insert(config.actor_type().to_string());
        }
        self.entities_config = configs;
    }

    /// The advertised actor type names.
    pub fn entities(&self) -> &BTreeSet<String> {
        &self.entities
    }

    /// Effective reentrancy settings for `actor_type`: the per-type
    /// override when present, the host-wide block otherwise, disabled with
    /// the default depth when neither is set.
    pub fn reentrancy_for(&self, actor_type: &str) -> (bool, u32) {
        let effective = self
            .entities_config
            .iter()
            .find(|config| config.actor_type() == actor_type)
            .and_then(ActorTypeConfig::reentrancy)
            .or(self.reentrancy.as_ref());
        match effective {
            Some(config) => (config.enabled, config.max_stack_depth),
            None => (false, DEFAULT_MAX_STACK_DEPTH),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.actor_scan_interval.is_zero() {
            return Err("actor_scan_interval must be > 0".to_string());
        }
        if self.actor_idle_timeout.is_zero() {
            return Err("actor_idle_timeout must be > 0".to_string());
        }
        if let Some(reentrancy) = &self.reentrancy {
            if reentrancy.max_stack_depth == 0 {
                return Err("reentrancy.max_stack_depth must be > 0".to_string());
            }
        }
        Ok(())
    }
}

/// Builder for [`ActorRuntimeConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ActorRuntimeConfigBuilder {
    config: ActorRuntimeConfig,
}

impl ActorRuntimeConfigBuilder {
    /// Set the timeout before the sidecar deactivates an idle actor.
    pub fn with_actor_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config.actor_idle_timeout = timeout;
        self
    }

    /// Set the interval between idle-actor scans.
    pub fn with_actor_scan_interval(mut self, interval: Duration) -> Self {
        self.config.actor_scan_interval = interval;
        self
    }

    /// Set the grace period for an ongoing call before deactivation.
    pub fn with_drain_ongoing_call_timeout(mut self, timeout: Duration) -> Self {
        self.config.drain_ongoing_call_timeout = timeout;
        self
    }

    /// Choose whether the sidecar waits for ongoing calls when rebalancing.
    pub fn with_drain_rebalanced_actors(mut self, drain: bool) -> Self {
        self.config.drain_rebalanced_actors = drain;
        self
    }

    /// Set the host-wide reentrancy behavior.
    pub fn with_reentrancy(mut self, reentrancy: ActorReentrancyConfig) -> Self {
        self.config.reentrancy = Some(reentrancy);
        self
    }

    /// Set the number of reminder storage partitions.
    pub fn with_reminders_storage_partitions(mut self, partitions: u32) -> Self {
        self.config.reminders_storage_partitions = Some(partitions);
        self
    }

    /// Set per-type override blocks.
    pub fn with_actor_type_configs(mut self, configs: Vec<ActorTypeConfig>) -> Self {
        self.config.update_actor_type_configs(configs);
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<ActorRuntimeConfig, String> {
        self.config.validate()?;
        Ok(self.config)
    }
}
