//! HTTP surface for the math tutor backend.
//!
//! Thin axum handlers over four upstream shapes: a static catalog lookup, a
//! plain chat passthrough, a syllabus-gated passthrough, and a
//! retrieval-augmented answer. All shared state is read-only behind `Arc`.

pub mod catalog;
pub mod error;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use tutor_core::{AppConfig, AppError, AppResult};
use tutor_knowledge::Retriever;
use tutor_llm::ChatClient;

pub use catalog::Catalog;
pub use routes::router;

/// Read-only state shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<dyn ChatClient>,
    pub retriever: Arc<dyn Retriever>,
    pub catalog: Arc<Catalog>,

    /// Chat model identifier forwarded on every completion request
    pub chat_model: String,

    /// Number of context chunks retrieved per `/ask` query
    pub top_k: usize,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        chat: Arc<dyn ChatClient>,
        retriever: Arc<dyn Retriever>,
        catalog: Catalog,
    ) -> Self {
        Self {
            chat,
            retriever,
            catalog: Arc::new(catalog),
            chat_model: config.chat.model.clone(),
            top_k: config.retrieval.top_k,
        }
    }
}

/// Bind the listener and serve until the process is stopped.
pub async fn serve(state: AppState, bind_addr: &str) -> AppResult<()> {
    let addr: SocketAddr = bind_addr
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid bind address '{}': {}", bind_addr, e)))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("Listening on {}", addr);

    axum::serve(listener, router(state))
        .await
        .map_err(|e| AppError::Other(format!("Server error: {}", e)))?;

    Ok(())
}
