//! Ingest command handler.
//!
//! One-shot job that chunks documents, embeds them, and writes the result
//! into the embeddings store.

use clap::Args;
use std::path::PathBuf;
use tutor_core::{config::AppConfig, AppResult};
use tutor_knowledge::{create_embedding_provider, IngestOptions};

/// Ingest documents into the embeddings store
#[derive(Args, Debug)]
pub struct IngestCommand {
    /// Files or directories to ingest (.txt and .md sources)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Clear the store before ingesting
    #[arg(long)]
    pub reset: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IngestCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ingest command for {} path(s)", self.paths.len());

        let embedder = create_embedding_provider(&config.embedding, config.api_key.as_deref())?;

        let options = IngestOptions {
            paths: self.paths.clone(),
            reset: self.reset,
        };

        let stats = tutor_knowledge::ingest::run(
            &config.database,
            embedder.as_ref(),
            &config.ingest,
            &options,
        )
        .await?;

        if self.json {
            let output = serde_json::json!({
                "sourcesCount": stats.sources_count,
                "chunksCount": stats.chunks_count,
                "bytesProcessed": stats.bytes_processed,
                "durationSecs": stats.duration_secs,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!(
                "Ingested {} sources ({} chunks, {} bytes) in {:.2}s",
                stats.sources_count, stats.chunks_count, stats.bytes_processed, stats.duration_secs
            );
        }

        Ok(())
    }
}
