//! Semantic lookup for the math tutor backend.
//!
//! Provides the file-backed vector store, the brute-force cosine ranker, the
//! [`Retriever`] seam used by the HTTP handlers, and the one-shot ingestion
//! job that populates the store from source documents.

pub mod chunker;
pub mod embeddings;
pub mod ingest;
pub mod ranker;
pub mod retriever;
pub mod store;
pub mod types;


// Re-export commonly used types
pub use embeddings::{create_embedding_provider, EmbeddingProvider, MockEmbedder};
pub use retriever::{Retriever, StoreRetriever};
pub use types::{ChunkRecord, IngestOptions, IngestStats, NewChunk};
