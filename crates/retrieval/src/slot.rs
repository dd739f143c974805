//! Per-session document slot.
//!
//! Holds the session's current [`DocumentIndex`], if any. Ingestion
//! replaces the slot contents wholesale; the QA tool reads a clone.

use crate::index::DocumentIndex;
use tokio::sync::RwLock;

/// Shared holder for at most one ingested document per session.
#[derive(Default)]
pub struct DocumentSlot {
    index: RwLock<Option<DocumentIndex>>,
}

impl DocumentSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current index (re-upload semantics).
    pub async fn replace(&self, index: DocumentIndex) {
        *self.index.write().await = Some(index);
    }

    /// Drop the current index.
    pub async fn clear(&self) {
        *self.index.write().await = None;
    }

    /// Clone of the current index, if one has been ingested.
    pub async fn current(&self) -> Option<DocumentIndex> {
        self.index.read().await.clone()
    }

    /// Whether a document is ready for questioning.
    pub async fn is_ready(&self) -> bool {
        self.index.read().await.is_some()
    }

    /// Name of the current document, for status displays.
    pub async fn document_name(&self) -> Option<String> {
        self.index.read().await.as_ref().map(|i| i.name.clone())
    }
}
