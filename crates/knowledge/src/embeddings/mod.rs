//! Embedding provider abstraction and implementations.

pub mod provider;
pub mod providers;

pub use provider::{create_embedding_provider, EmbeddingProvider};
pub use providers::{MockEmbedder, OpenAiEmbedder};
