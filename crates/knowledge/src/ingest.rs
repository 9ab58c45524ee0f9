//! One-shot ingestion job: documents → windows → embeddings → store.
//!
//! All embeddings are computed before anything is written, and the write is
//! one transaction, so an embedding failure anywhere aborts the run with
//! zero rows committed. Re-running without `reset` duplicates every chunk.

use crate::embeddings::EmbeddingProvider;
use crate::types::{IngestOptions, IngestStats, NewChunk};
use crate::{chunker, store};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tutor_core::config::IngestSettings;
use tutor_core::{AppError, AppResult};
use walkdir::WalkDir;

/// Run the ingestion job against the store at `db_path`.
pub async fn run(
    db_path: &Path,
    embedder: &dyn EmbeddingProvider,
    settings: &IngestSettings,
    options: &IngestOptions,
) -> AppResult<IngestStats> {
    let start = Instant::now();

    tracing::info!("Starting ingestion into {:?}", db_path);

    let files = collect_files(&options.paths)?;
    if files.is_empty() {
        return Err(AppError::Knowledge(
            "No ingestable files found (expected .txt or .md sources)".to_string(),
        ));
    }

    let mut sources_count = 0u32;
    let mut bytes_processed = 0u64;
    let mut pending: Vec<NewChunk> = Vec::new();

    for file in &files {
        let text = std::fs::read_to_string(file)
            .map_err(|e| AppError::Knowledge(format!("Failed to read {:?}: {}", file, e)))?;
        bytes_processed += text.len() as u64;

        let windows = chunker::split_into_windows(&text, settings.chunk_size, settings.chunk_overlap);
        if windows.is_empty() {
            tracing::warn!("No chunks produced from {:?}, skipping", file);
            continue;
        }

        let embeddings = embedder.embed_batch(&windows).await?;

        pending.extend(
            windows
                .into_iter()
                .zip(embeddings)
                .map(|(text, embedding)| NewChunk { text, embedding }),
        );
        sources_count += 1;

        tracing::debug!("Embedded {:?}", file);
    }

    let mut conn = store::open_store(db_path)?;
    if options.reset {
        tracing::info!("Resetting store before ingest");
        store::clear(&conn)?;
    }

    let chunks_count = store::insert_many(&mut conn, &pending)? as u32;

    let duration = start.elapsed();
    tracing::info!(
        "Ingestion completed: {} sources, {} chunks, {} bytes in {:.2}s",
        sources_count,
        chunks_count,
        bytes_processed,
        duration.as_secs_f64()
    );

    Ok(IngestStats {
        sources_count,
        chunks_count,
        bytes_processed,
        duration_secs: duration.as_secs_f64(),
    })
}

/// Expand the given paths into a list of ingestable files.
fn collect_files(paths: &[PathBuf]) -> AppResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(false)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let entry_path = entry.path();
                if entry_path.is_file() && is_text_source(entry_path) {
                    files.push(entry_path.to_path_buf());
                }
            }
        } else {
            return Err(AppError::Knowledge(format!(
                "Ingest path does not exist: {:?}",
                path
            )));
        }
    }

    files.sort();
    Ok(files)
}

/// Only plain text and markdown sources are ingested.
fn is_text_source(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("txt") | Some("md") | Some("markdown")
    )
}
