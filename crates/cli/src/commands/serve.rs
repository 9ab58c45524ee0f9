//! Serve command handler.
//!
//! Wires the chat client, retriever, and catalog into the HTTP server.
//! Credentials are checked here, before the listener binds, so a missing
//! API key never surfaces mid-request.

use clap::Args;
use std::sync::Arc;
use tutor_core::{config::AppConfig, AppResult};
use tutor_knowledge::{create_embedding_provider, StoreRetriever};
use tutor_llm::create_chat_client;
use tutor_server::{AppState, Catalog};

/// Start the HTTP server
#[derive(Args, Debug)]
pub struct ServeCommand {}

impl ServeCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        // Fail fast when the remote API cannot be reached at all
        let api_key = config.require_api_key()?;

        let chat = create_chat_client(&config.chat, Some(api_key))?;
        let embedder = create_embedding_provider(&config.embedding, Some(api_key))?;
        let retriever = Arc::new(StoreRetriever::new(config.database.clone(), embedder));

        let catalog = Catalog::load(config.catalog_file.as_deref())?;

        tracing::info!(
            "Serving with chat model '{}' and embedding model '{}'",
            config.chat.model,
            config.embedding.model
        );

        let state = AppState::new(config, chat, retriever, catalog);
        tutor_server::serve(state, &config.bind_addr).await
    }
}
