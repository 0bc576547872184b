//! Per-instance staged state with transactional commit.

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

// Layer 3: Internal module imports
use super::change::{StateChangeKind, StateMetadata, StateTracker};
use super::provider::StateProvider;
use crate::actor::ActorError;
use crate::client::SidecarClient;
use crate::util::ActorId;

/// Caching layer between an actor instance and the sidecar state store.
///
/// Reads load through the sidecar and are cached; writes stage an intent
/// (`add`, `update`, `remove`, each optionally with a per-key TTL) without
/// touching the store. [`save_state`](Self::save_state) flushes every staged
/// intent as one transactional batch; the runtime calls it after each
/// successful method invocation.
///
/// When a reentrant call chain is in flight the manager scopes staging to a
/// per-chain tracker selected by a state-context string, so concurrent
/// frames of the chain observe each other's writes while unrelated
/// dispatches never do.
///
/// The manager is a cheap-clone handle; all clones share one tracker set.
#[derive(Clone)]
pub struct ActorStateManager {
    inner: Arc<StateManagerInner>,
}

struct StateManagerInner {
    actor_type: String,
    actor_id: ActorId,
    provider: StateProvider,
    trackers: Mutex<Trackers>,
}

#[derive(Default)]
struct Trackers {
    current: Option<String>,
    default_tracker: StateTracker,
    scoped: HashMap<String, StateTracker>,
}

impl Trackers {
    fn current_mut(&mut self) -> &mut StateTracker {
        match &self.current {
            Some(context) => self.scoped.entry(context.clone()).or_default(),
            None => &mut self.default_tracker,
        }
    }
}

impl ActorStateManager {
    pub fn new(
        actor_type: impl Into<String>,
        actor_id: ActorId,
        client: Arc<dyn SidecarClient>,
    ) -> Self {
        Self {
            inner: Arc::new(StateManagerInner {
                actor_type: actor_type.into(),
                actor_id,
                provider: StateProvider::new(client),
                trackers: Mutex::new(Trackers::default()),
            }),
        }
    }

    fn with_tracker<R>(&self, f: impl FnOnce(&mut StateTracker) -> R) -> R {
        let mut trackers = self.inner.trackers.lock();
        f(trackers.current_mut())
    }

    /// Select the tracker scope for a reentrant call chain.
    ///
    /// `Some(context)` routes every subsequent operation to the tracker
    /// registered under that context; `None` restores the default tracker
    /// and drops the scoped one.
    pub fn set_state_context(&self, context: Option<String>) {
        let mut trackers = self.inner.trackers.lock();
        if let Some(previous) = trackers.current.take() {
            trackers.scoped.remove(&previous);
        }
        trackers.current = context;
    }

    /// Stage a new key, failing if it already holds a value.
    pub async fn add_state<T: Serialize>(
        &self,
        state_name: &str,
        value: T,
    ) -> Result<(), ActorError> {
        if self.try_add_state(state_name, value).await? {
            return Ok(());
        }
        Err(ActorError::StateAlreadyExists(state_name.to_string()))
    }

    /// Stage a new key; returns `false` if it already holds a value.
    pub async fn try_add_state<T: Serialize>(
        &self,
        state_name: &str,
        value: T,
    ) -> Result<bool, ActorError> {
        let value = serde_json::to_value(value)?;

        enum Staged {
            Done(bool),
            CheckSidecar(Value),
        }
        let staged = self.with_tracker(|tracker| {
            match tracker.get(state_name).map(|meta| meta.change_kind) {
                Some(StateChangeKind::Remove) => {
                    tracker.insert(
                        state_name,
                        StateMetadata::new(value.clone(), StateChangeKind::Update),
                    );
                    Staged::Done(true)
                }
                Some(_) => Staged::Done(false),
                None => Staged::CheckSidecar(value.clone()),
            }
        });

        let value = match staged {
            Staged::Done(result) => return Ok(result),
            Staged::CheckSidecar(value) => value,
        };
        if self.contains_in_sidecar(state_name).await? {
            return Ok(false);
        }
        self.with_tracker(|tracker| {
            tracker.insert(state_name, StateMetadata::new(value, StateChangeKind::Add));
        });
        Ok(true)
    }

    /// Read a key, failing if it has no value.
    pub async fn get_state<T: DeserializeOwned>(&self, state_name: &str) -> Result<T, ActorError> {
        match self.try_get_state(state_name).await? {
            Some(value) => Ok(value),
            None => Err(ActorError::StateNotFound(state_name.to_string())),
        }
    }

    /// Read a key; `None` when the key has no value (including keys staged
    /// for removal).
    pub async fn try_get_state<T: DeserializeOwned>(
        &self,
        state_name: &str,
    ) -> Result<Option<T>, ActorError> {
        enum Cached {
            Hit(Value),
            Removed,
            Miss,
        }
        let cached = self.with_tracker(|tracker| match tracker.get(state_name) {
            Some(meta) if meta.change_kind == StateChangeKind::Remove => Cached::Removed,
            Some(meta) => Cached::Hit(meta.value.clone().unwrap_or(Value::Null)),
            None => Cached::Miss,
        });
        match cached {
            Cached::Hit(value) => return Ok(Some(serde_json::from_value(value)?)),
            Cached::Removed => return Ok(None),
            Cached::Miss => {}
        }

        let loaded = self
            .inner
            .provider
            .try_load_state(&self.inner.actor_type, &self.inner.actor_id, state_name)
            .await?;
        match loaded {
            Some(value) => {
                self.with_tracker(|tracker| {
                    tracker.insert(
                        state_name,
                        StateMetadata::new(value.clone(), StateChangeKind::None),
                    );
                });
                Ok(Some(serde_json::from_value(value)?))
            }
            None => Ok(None),
        }
    }

    /// Stage a value for a key, clearing any TTL previously staged.
    pub async fn set_state<T: Serialize>(
        &self,
        state_name: &str,
        value: T,
    ) -> Result<(), ActorError> {
        self.set_state_inner(state_name, serde_json::to_value(value)?, None)
            .await
    }

    /// Stage a value with a TTL in seconds. A negative TTL makes the whole
    /// call a no-op.
    pub async fn set_state_ttl<T: Serialize>(
        &self,
        state_name: &str,
        value: T,
        ttl_in_seconds: i64,
    ) -> Result<(), ActorError> {
        if ttl_in_seconds < 0 {
            return Ok(());
        }
        self.set_state_inner(
            state_name,
            serde_json::to_value(value)?,
            Some(ttl_in_seconds),
        )
        .await
    }

    async fn set_state_inner(
        &self,
        state_name: &str,
        value: Value,
        ttl_in_seconds: Option<i64>,
    ) -> Result<(), ActorError> {
        let tracked = self.with_tracker(|tracker| match tracker.get_mut(state_name) {
            Some(meta) => {
                meta.value = Some(value.clone());
                meta.ttl_in_seconds = ttl_in_seconds;
                meta.change_kind = match meta.change_kind {
                    StateChangeKind::Add => StateChangeKind::Add,
                    _ => StateChangeKind::Update,
                };
                true
            }
            None => false,
        });
        if tracked {
            return Ok(());
        }

        let kind = if self.contains_in_sidecar(state_name).await? {
            StateChangeKind::Update
        } else {
            StateChangeKind::Add
        };
        self.with_tracker(|tracker| {
            let meta = match ttl_in_seconds {
                Some(ttl) => StateMetadata::with_ttl(value, kind, ttl),
                None => StateMetadata::new(value, kind),
            };
            tracker.insert(state_name, meta);
        });
        Ok(())
    }

    /// Stage a key for removal, failing if it has no value.
    pub async fn remove_state(&self, state_name: &str) -> Result<(), ActorError> {
        if self.try_remove_state(state_name).await? {
            return Ok(());
        }
        Err(ActorError::StateNotFound(state_name.to_string()))
    }

    /// Stage a key for removal; returns `false` if it has no value.
    pub async fn try_remove_state(&self, state_name: &str) -> Result<bool, ActorError> {
        enum Staged {
            Done(bool),
            CheckSidecar,
        }
        let staged = self.with_tracker(|tracker| {
            match tracker.get(state_name).map(|meta| meta.change_kind) {
                Some(StateChangeKind::Remove) => Staged::Done(false),
                Some(StateChangeKind::Add) => {
                    tracker.remove(state_name);
                    Staged::Done(true)
                }
                Some(_) => {
                    if let Some(meta) = tracker.get_mut(state_name) {
                        meta.change_kind = StateChangeKind::Remove;
                    }
                    Staged::Done(true)
                }
                None => Staged::CheckSidecar,
            }
        });
        if let Staged::Done(result) = staged {
            return Ok(result);
        }

        if self.contains_in_sidecar(state_name).await? {
            self.with_tracker(|tracker| tracker.insert(state_name, StateMetadata::removed()));
            return Ok(true);
        }
        Ok(false)
    }

    /// Whether a key currently holds a value.
    pub async fn contains_state(&self, state_name: &str) -> Result<bool, ActorError> {
        enum Cached {
            Known(bool),
            Miss,
        }
        let cached = self.with_tracker(|tracker| match tracker.get(state_name) {
            Some(meta) => Cached::Known(meta.change_kind != StateChangeKind::Remove),
            None => Cached::Miss,
        });
        match cached {
            Cached::Known(present) => Ok(present),
            Cached::Miss => self.contains_in_sidecar(state_name).await,
        }
    }

    /// Read a key, staging `default` for it when it has no value.
    pub async fn get_or_add_state<T>(&self, state_name: &str, default: T) -> Result<T, ActorError>
    where
        T: Serialize + DeserializeOwned,
    {
        if let Some(existing) = self.try_get_state(state_name).await? {
            return Ok(existing);
        }
        let value = serde_json::to_value(&default)?;
        self.with_tracker(|tracker| {
            let kind = match tracker.get(state_name) {
                Some(meta) if meta.change_kind == StateChangeKind::Remove => {
                    StateChangeKind::Update
                }
                _ => StateChangeKind::Add,
            };
            tracker.insert(state_name, StateMetadata::new(value, kind));
        });
        Ok(default)
    }

    /// Stage `value` for an absent key, or the result of
    /// `factory(name, existing)` for a present one.
    pub async fn add_or_update_state<T, F>(
        &self,
        state_name: &str,
        value: T,
        factory: F,
    ) -> Result<T, ActorError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&str, T) -> T,
    {
        enum Staged {
            Removed,
            Existing(Value),
            CheckSidecar,
        }
        let staged = self.with_tracker(|tracker| match tracker.get(state_name) {
            Some(meta) if meta.change_kind == StateChangeKind::Remove => Staged::Removed,
            Some(meta) => Staged::Existing(meta.value.clone().unwrap_or(Value::Null)),
            None => Staged::CheckSidecar,
        });
        match staged {
            Staged::Removed => {
                let raw = serde_json::to_value(&value)?;
                self.with_tracker(|tracker| {
                    tracker.insert(state_name, StateMetadata::new(raw, StateChangeKind::Update));
                });
                return Ok(value);
            }
            Staged::Existing(raw) => {
                let existing: T = serde_json::from_value(raw)?;
                let updated = factory(state_name, existing);
                let raw = serde_json::to_value(&updated)?;
                self.with_tracker(|tracker| {
                    if let Some(meta) = tracker.get_mut(state_name) {
                        meta.value = Some(raw);
                        if meta.change_kind == StateChangeKind::None {
                            meta.change_kind = StateChangeKind::Update;
                        }
                    }
                });
                return Ok(updated);
            }
            Staged::CheckSidecar => {}
        }

        let loaded = self
            .inner
            .provider
            .try_load_state(&self.inner.actor_type, &self.inner.actor_id, state_name)
            .await?;
        match loaded {
            Some(raw) => {
                let existing: T = serde_json::from_value(raw)?;
                let updated = factory(state_name, existing);
                let raw = serde_json::to_value(&updated)?;
                self.with_tracker(|tracker| {
                    tracker.insert(state_name, StateMetadata::new(raw, StateChangeKind::Update));
                });
                Ok(updated)
            }
            None => {
                let raw = serde_json::to_value(&value)?;
                self.with_tracker(|tracker| {
                    tracker.insert(state_name, StateMetadata::new(raw, StateChangeKind::Add));
                });
                Ok(value)
            }
        }
    }

    /// Names of keys currently holding a staged or cached value. Keys staged
    /// for removal are filtered out; the sidecar offers no enumeration, so
    /// only tracked names are reported.
    pub fn state_names(&self) -> Vec<String> {
        self.with_tracker(|tracker| {
            tracker
                .iter()
                .filter(|(_, meta)| meta.change_kind != StateChangeKind::Remove)
                .map(|(name, _)| name.to_string())
                .collect()
        })
    }

    /// Whether a key is staged for removal.
    pub fn is_state_marked_for_remove(&self, state_name: &str) -> bool {
        self.with_tracker(|tracker| {
            tracker
                .get(state_name)
                .is_some_and(|meta| meta.change_kind == StateChangeKind::Remove)
        })
    }

    /// Drop every tracked entry in the current scope.
    pub fn clear_cache(&self) {
        self.with_tracker(StateTracker::clear);
    }

    /// Flush every staged change as one transactional batch.
    ///
    /// On success, surviving entries are marked unchanged and tombstones are
    /// dropped. On failure the tracker is left exactly as it was, so the
    /// invoke-failure path can reset it wholesale.
    pub async fn save_state(&self) -> Result<(), ActorError> {
        let changes = self.with_tracker(|tracker| tracker.pending_changes());
        if changes.is_empty() {
            return Ok(());
        }

        self.inner
            .provider
            .save_state(&self.inner.actor_type, &self.inner.actor_id, &changes)
            .await?;
        debug!(
            actor_type = %self.inner.actor_type,
            actor_id = %self.inner.actor_id,
            changes = changes.len(),
            "actor state committed"
        );
        self.with_tracker(StateTracker::settle);
        Ok(())
    }

    async fn contains_in_sidecar(&self, state_name: &str) -> Result<bool, ActorError> {
        self.inner
            .provider
            .contains_state(&self.inner.actor_type, &self.inner.actor_id, state_name)
            .await
    }

    #[cfg(test)]
    pub(crate) fn change_kind_of(&self, state_name: &str) -> Option<StateChangeKind> {
        self.with_tracker(|tracker| tracker.get(state_name).map(|meta| meta.change_kind))
    }

    #[cfg(test)]
    pub(crate) fn ttl_of(&self, state_name: &str) -> Option<i64> {
        self.with_tracker(|tracker| tracker.get(state_name).and_then(|meta| meta.ttl_in_seconds))
    }
}
