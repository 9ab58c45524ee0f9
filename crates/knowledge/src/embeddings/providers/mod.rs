//! Embedding provider implementations.

pub mod mock;
pub mod openai;

pub use mock::MockEmbedder;
pub use openai::OpenAiEmbedder;
