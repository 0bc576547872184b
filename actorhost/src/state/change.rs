//! Change tracking primitives for staged actor state.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use serde_json::Value;

// Layer 3: Internal module imports
// (none)

/// The staged intent recorded for one state key since the last commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChangeKind {
    /// Loaded from the sidecar, unchanged; excluded from the commit batch.
    None,
    /// New key; commits as an upsert.
    Add,
    /// Existing key with a new value; commits as an upsert.
    Update,
    /// Key staged for deletion; commits as a delete.
    Remove,
}

impl StateChangeKind {
    /// The transactional operation this kind maps to, or `None` for
    /// unchanged entries.
    pub fn operation(self) -> Option<&'static str> {
        match self {
            StateChangeKind::None => None,
            StateChangeKind::Add | StateChangeKind::Update => Some("upsert"),
            StateChangeKind::Remove => Some("delete"),
        }
    }
}

/// Tracker entry for one state key.
///
/// `Add` and `Update` entries always carry a value; `Remove` entries may
/// not.
#[derive(Debug, Clone, PartialEq)]
pub struct StateMetadata {
    pub value: Option<Value>,
    pub change_kind: StateChangeKind,
    pub ttl_in_seconds: Option<i64>,
}

impl StateMetadata {
    /// Entry carrying a value with no TTL.
    pub fn new(value: Value, change_kind: StateChangeKind) -> Self {
        Self {
            value: Some(value),
            change_kind,
            ttl_in_seconds: None,
        }
    }

    /// Entry carrying a value and a TTL in seconds.
    pub fn with_ttl(value: Value, change_kind: StateChangeKind, ttl_in_seconds: i64) -> Self {
        Self {
            value: Some(value),
            change_kind,
            ttl_in_seconds: Some(ttl_in_seconds),
        }
    }

    /// Tombstone entry staged for deletion.
    pub fn removed() -> Self {
        Self {
            value: None,
            change_kind: StateChangeKind::Remove,
            ttl_in_seconds: None,
        }
    }
}

/// One element of the commit batch handed to the state provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorStateChange {
    pub state_name: String,
    pub value: Option<Value>,
    pub change_kind: StateChangeKind,
    pub ttl_in_seconds: Option<i64>,
}

/// Insertion-ordered map of staged entries for one state scope.
///
/// Commit batches are emitted in the order keys were first staged, so the
/// tracker preserves insertion order; in-place updates keep the original
/// position.
#[derive(Debug, Default)]
pub struct StateTracker {
    entries: Vec<(String, StateMetadata)>,
}

impl StateTracker {
    pub fn get(&self, name: &str) -> Option<&StateMetadata> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, meta)| meta)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut StateMetadata> {
        self.entries
            .iter_mut()
            .find(|(key, _)| key == name)
            .map(|(_, meta)| meta)
    }

    /// Insert or replace; a replaced entry keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, metadata: StateMetadata) {
        let name = name.into();
        match self.entries.iter().position(|(key, _)| *key == name) {
            Some(index) => self.entries[index].1 = metadata,
            None => self.entries.push((name, metadata)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<StateMetadata> {
        let index = self.entries.iter().position(|(key, _)| key == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StateMetadata)> {
        self.entries.iter().map(|(key, meta)| (key.as_str(), meta))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collect the commit batch: every entry whose kind is not `None`, in
    /// insertion order. The tracker itself is left untouched.
    pub fn pending_changes(&self) -> Vec<ActorStateChange> {
        self.entries
            .iter()
            .filter(|(_, meta)| meta.change_kind != StateChangeKind::None)
            .map(|(name, meta)| ActorStateChange {
                state_name: name.clone(),
                value: meta.value.clone(),
                change_kind: meta.change_kind,
                ttl_in_seconds: meta.ttl_in_seconds,
            })
            .collect()
    }

    /// Mark every surviving entry unchanged and drop tombstones. Called
    /// after a successful commit.
    pub fn settle(&mut self) {
        self.entries
            .retain(|(_, meta)| meta.change_kind != StateChangeKind::Remove);
        for (_, meta) in &mut self.entries {
            meta.change_kind = StateChangeKind::None;
        }
    }
}
