use std::collections::HashMap;

use chrono::Utc;
use tether_core::{ChangeOp, Document, DocumentChange};
use tokio::sync::Mutex;
use tracing::debug;

/// A captured local edit waiting for the next write flush. `observed_at`
/// becomes the resource's `last_edited` when the change is staged.
#[derive(Debug, Clone)]
pub(crate) struct PendingChange {
    pub op: ChangeOp,
    pub document: Document,
    pub observed_at: i64,
}

/// Collapses the document change feed between write flushes. Entries are
/// keyed `op:docId`, so a burst of edits to one document stages only the
/// newest copy.
#[derive(Default)]
pub(crate) struct ChangeQueue {
    entries: Mutex<HashMap<String, PendingChange>>,
}

impl ChangeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the change was accepted. Sync-originated writes are
    /// dropped so a pull never echoes back as a push, and private documents
    /// never leave the device.
    pub async fn offer(&self, change: DocumentChange, logged_in: bool) -> bool {
        if change.from_sync || !logged_in {
            return false;
        }
        if change.document.is_private {
            debug!(doc_id = %change.document.id, "skipping private document change");
            return false;
        }
        let key = format!("{}:{}", change.op.as_str(), change.document.id);
        let pending = PendingChange {
            op: change.op,
            document: change.document,
            observed_at: Utc::now().timestamp_millis(),
        };
        self.entries.lock().await.insert(key, pending);
        true
    }

    /// Drains everything queued so far, workspace changes last.
    pub async fn drain(&self) -> Vec<PendingChange> {
        let drained = std::mem::take(&mut *self.entries.lock().await);
        let mut changes: Vec<PendingChange> = drained.into_values().collect();
        changes.sort_by_key(|change| (change.document.kind.is_workspace(), change.observed_at));
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;
    use tether_core::DocumentKind;

    fn doc(kind: DocumentKind, id: &str) -> Document {
        Document {
            id: id.to_string(),
            kind,
            parent_id: None,
            name: id.to_string(),
            modified: 1_000,
            is_private: false,
            extra: Map::new(),
        }
    }

    fn change(op: ChangeOp, document: Document) -> DocumentChange {
        DocumentChange {
            op,
            document,
            from_sync: false,
        }
    }

    #[tokio::test]
    async fn repeated_edits_collapse_to_latest() {
        let queue = ChangeQueue::new();
        let mut first = doc(DocumentKind::Request, "req_1");
        first.name = "first".to_string();
        let mut second = doc(DocumentKind::Request, "req_1");
        second.name = "second".to_string();

        assert!(queue.offer(change(ChangeOp::Upsert, first), true).await);
        assert!(queue.offer(change(ChangeOp::Upsert, second), true).await);

        let drained = queue.drain().await;
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].document.name, "second");
    }

    #[tokio::test]
    async fn distinct_ops_for_one_document_both_survive() {
        let queue = ChangeQueue::new();
        queue
            .offer(change(ChangeOp::Upsert, doc(DocumentKind::Request, "req_1")), true)
            .await;
        queue
            .offer(change(ChangeOp::Remove, doc(DocumentKind::Request, "req_1")), true)
            .await;

        assert_eq!(queue.drain().await.len(), 2);
    }

    #[tokio::test]
    async fn workspace_changes_drain_last() {
        let queue = ChangeQueue::new();
        queue
            .offer(change(ChangeOp::Upsert, doc(DocumentKind::Workspace, "wrk_1")), true)
            .await;
        queue
            .offer(change(ChangeOp::Upsert, doc(DocumentKind::Request, "req_1")), true)
            .await;
        queue
            .offer(
                change(ChangeOp::Upsert, doc(DocumentKind::Environment, "env_1")),
                true,
            )
            .await;

        let drained = queue.drain().await;
        assert_eq!(drained.len(), 3);
        assert_eq!(drained[2].document.id, "wrk_1");
        assert!(!drained[0].document.kind.is_workspace());
        assert!(!drained[1].document.kind.is_workspace());
    }

    #[tokio::test]
    async fn feed_noise_is_filtered_out() {
        let queue = ChangeQueue::new();

        let echoed = DocumentChange {
            op: ChangeOp::Upsert,
            document: doc(DocumentKind::Request, "req_1"),
            from_sync: true,
        };
        assert!(!queue.offer(echoed, true).await);

        let mut private_doc = doc(DocumentKind::Environment, "env_1");
        private_doc.is_private = true;
        assert!(!queue.offer(change(ChangeOp::Upsert, private_doc), true).await);

        let logged_out = change(ChangeOp::Upsert, doc(DocumentKind::Request, "req_2"));
        assert!(!queue.offer(logged_out, false).await);

        assert!(queue.drain().await.is_empty());
    }

    #[tokio::test]
    async fn drain_empties_the_queue() {
        let queue = ChangeQueue::new();
        queue
            .offer(change(ChangeOp::Upsert, doc(DocumentKind::Request, "req_1")), true)
            .await;

        assert_eq!(queue.drain().await.len(), 1);
        assert!(queue.drain().await.is_empty());
    }
}
