//! Adapter between the state manager and the sidecar state API.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

// Layer 3: Internal module imports
use super::change::{ActorStateChange, StateChangeKind};
use crate::actor::ActorError;
use crate::client::SidecarClient;
use crate::util::ActorId;

/// One operation of the transactional commit body.
///
/// Field declaration order is the wire order; `value` is omitted for
/// deletes and `metadata` appears only when a TTL was staged.
#[derive(Serialize)]
struct TransactionalOperation<'a> {
    operation: &'static str,
    request: TransactionalRequest<'a>,
}

#[derive(Serialize)]
struct TransactionalRequest<'a> {
    key: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<OperationMetadata>,
}

#[derive(Serialize)]
struct OperationMetadata {
    #[serde(rename = "ttlInSeconds")]
    ttl_in_seconds: String,
}

/// Loads and commits actor state through the shared [`SidecarClient`].
#[derive(Clone)]
pub struct StateProvider {
    client: Arc<dyn SidecarClient>,
}

impl StateProvider {
    pub fn new(client: Arc<dyn SidecarClient>) -> Self {
        Self { client }
    }

    /// Load one key. An absent or empty payload reads as "no value".
    pub async fn try_load_state(
        &self,
        actor_type: &str,
        actor_id: &ActorId,
        state_name: &str,
    ) -> Result<Option<Value>, ActorError> {
        let raw = self.client.get_state(actor_type, actor_id, state_name).await?;
        match raw {
            Some(bytes) if !bytes.is_empty() => Ok(Some(serde_json::from_slice(&bytes)?)),
            _ => Ok(None),
        }
    }

    /// Whether the sidecar holds a value for `state_name`.
    pub async fn contains_state(
        &self,
        actor_type: &str,
        actor_id: &ActorId,
        state_name: &str,
    ) -> Result<bool, ActorError> {
        let raw = self.client.get_state(actor_type, actor_id, state_name).await?;
        Ok(raw.is_some_and(|bytes| !bytes.is_empty()))
    }

    /// Commit a batch of staged changes in one transaction.
    ///
    /// An empty batch is a no-op.
    pub async fn save_state(
        &self,
        actor_type: &str,
        actor_id: &ActorId,
        changes: &[ActorStateChange],
    ) -> Result<(), ActorError> {
        if changes.is_empty() {
            return Ok(());
        }

        let mut operations = Vec::with_capacity(changes.len());
        for change in changes {
            let Some(operation) = change.change_kind.operation() else {
                continue;
            };
            let value = match change.change_kind {
                StateChangeKind::Remove => None,
                _ => change.value.as_ref(),
            };
            let metadata = change.ttl_in_seconds.map(|ttl| OperationMetadata {
                ttl_in_seconds: ttl.to_string(),
            });
            operations.push(TransactionalOperation {
                operation,
                request: TransactionalRequest {
                    key: &change.state_name,
                    value,
                    metadata,
                },
            });
        }
        if operations.is_empty() {
            return Ok(());
        }

        debug!(
            actor_type,
            actor_id = %actor_id,
            operations = operations.len(),
            "committing transactional state batch"
        );
        let body = serde_json::to_vec(&operations)?;
        self.client
            .save_state_transactionally(actor_type, actor_id, body)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::client::fake::FakeSidecarClient;

    fn provider() -> (Arc<FakeSidecarClient>, StateProvider) {
        let client = Arc::new(FakeSidecarClient::default());
        (Arc::clone(&client), StateProvider::new(client))
    }

    #[tokio::test]
    async fn test_try_load_state_absent() {
        let (_, provider) = provider();
        let loaded = provider
            .try_load_state("Counter", &ActorId::new("1"), "missing")
            .await
            .expect("load");
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_try_load_state_present() {
        let (client, provider) = provider();
        client.seed_state("count", b"\"value1\"");
        let loaded = provider
            .try_load_state("Counter", &ActorId::new("1"), "count")
            .await
            .expect("load");
        assert_eq!(loaded, Some(json!("value1")));
    }

    #[tokio::test]
    async fn test_contains_state_treats_empty_as_absent() {
        let (client, provider) = provider();
        client.seed_state("empty", b"");
        let id = ActorId::new("1");
        assert!(!provider
            .contains_state("Counter", &id, "empty")
            .await
            .expect("contains"));
    }

    #[tokio::test]
    async fn test_save_state_builds_exact_batch() {
        let (client, provider) = provider();
        let changes = vec![
            ActorStateChange {
                state_name: "k1".to_string(),
                value: Some(json!("v1")),
                change_kind: StateChangeKind::Add,
                ttl_in_seconds: None,
            },
            ActorStateChange {
                state_name: "k2".to_string(),
                value: None,
                change_kind: StateChangeKind::Remove,
                ttl_in_seconds: None,
            },
            ActorStateChange {
                state_name: "k3".to_string(),
                value: Some(json!("v3")),
                change_kind: StateChangeKind::Update,
                ttl_in_seconds: Some(60),
            },
        ];
        provider
            .save_state("Counter", &ActorId::new("1"), &changes)
            .await
            .expect("save");

        let saved = client.saved.lock();
        assert_eq!(saved.len(), 1);
        let body = String::from_utf8(saved[0].clone()).expect("utf8");
        assert_eq!(
            body,
            r#"[{"operation":"upsert","request":{"key":"k1","value":"v1"}},{"operation":"delete","request":{"key":"k2"}},{"operation":"upsert","request":{"key":"k3","value":"v3","metadata":{"ttlInSeconds":"60"}}}]"#
        );
    }

    #[tokio::test]
    async fn test_save_state_empty_batch_is_noop() {
        let (client, provider) = provider();
        provider
            .save_state("Counter", &ActorId::new("1"), &[])
            .await
            .expect("save");
        assert!(client.saved.lock().is_empty());
    }
}
