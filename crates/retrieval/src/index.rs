//! The document index — the retriever's only stateful artifact.

use serde::{Deserialize, Serialize};

/// An immutable embedding index over one uploaded document.
///
/// Built once per ingestion and replaced wholesale on re-upload —
/// never patched incrementally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentIndex {
    /// Unique index ID (fresh per ingestion)
    pub document_id: String,

    /// Display name of the uploaded document
    pub name: String,

    /// Embedded chunks in document order
    pub chunks: Vec<IndexedChunk>,
}

/// One embedded chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedChunk {
    /// Chunk text
    pub text: String,

    /// Embedding vector
    pub embedding: Vec<f32>,

    /// 1-based source page, for citation
    pub page: u32,

    /// Position in the document's chunk sequence
    pub chunk_index: usize,
}

impl DocumentIndex {
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_len() {
        let index = DocumentIndex {
            document_id: "doc-1".into(),
            name: "script.txt".into(),
            chunks: vec![IndexedChunk {
                text: "scene one".into(),
                embedding: vec![0.1, 0.2],
                page: 1,
                chunk_index: 0,
            }],
        };
        assert_eq!(index.len(), 1);
        assert!(!index.is_empty());
    }
}
