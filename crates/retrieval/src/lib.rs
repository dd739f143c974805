//! Document retrieval — ingest once, answer many times.
//!
//! A paginated text document is split into overlapping chunks (page
//! references preserved for citation), embedded, and held in an
//! immutable [`DocumentIndex`]. Queries embed the question, rank chunks
//! by cosine similarity, and only then — when something relevant
//! actually exists — ask the model for an answer grounded in those
//! chunks. When nothing clears the similarity floor the caller gets an
//! explicit not-found result instead of an invented answer.

pub mod chunker;
pub mod extract;
pub mod index;
pub mod retriever;
pub mod slot;
pub mod vector;

pub use chunker::Chunk;
pub use extract::Page;
pub use index::{DocumentIndex, IndexedChunk};
pub use retriever::{DocumentAnswer, DocumentRetriever, SupportingChunk};
pub use slot::DocumentSlot;
