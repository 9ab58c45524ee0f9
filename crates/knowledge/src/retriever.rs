//! The retrieval seam between the HTTP handlers and the store.

use crate::embeddings::EmbeddingProvider;
use crate::{ranker, store};
use std::path::PathBuf;
use std::sync::Arc;
use tutor_core::AppResult;

/// Given a query string, return ranked context texts.
///
/// This is the one capability the serving path depends on. The brute-force
/// implementation below can be swapped for an indexed one without touching
/// callers.
#[async_trait::async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, query: &str, top_k: usize) -> AppResult<Vec<String>>;
}

/// Brute-force retriever over the SQLite store.
///
/// Opens its own store connection per call: the serving path never writes,
/// so there is no contention to manage, and no connection outlives a
/// request.
pub struct StoreRetriever {
    db_path: PathBuf,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl StoreRetriever {
    pub fn new(db_path: impl Into<PathBuf>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            db_path: db_path.into(),
            embedder,
        }
    }
}

#[async_trait::async_trait]
impl Retriever for StoreRetriever {
    async fn retrieve(&self, query: &str, top_k: usize) -> AppResult<Vec<String>> {
        let query_embedding = self.embedder.embed(query).await?;

        let conn = store::open_store(&self.db_path)?;
        let chunks = store::load_all(&conn)?;

        tracing::debug!(
            chunks = chunks.len(),
            top_k,
            "Ranking stored chunks for query"
        );

        ranker::rank(&query_embedding, &chunks, top_k)
    }
}
