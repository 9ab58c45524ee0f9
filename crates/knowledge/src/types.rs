//! Knowledge system type definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A stored text chunk with its embedding.
///
/// Records are immutable once written: the serving path only inserts never
/// updates, and ids are assigned by the store on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkRecord {
    /// Unique identifier, assigned on insert
    pub id: i64,

    /// Text content
    pub text: String,

    /// Embedding vector
    pub embedding: Vec<f32>,
}

/// A chunk waiting to be inserted (no id yet).
#[derive(Debug, Clone)]
pub struct NewChunk {
    pub text: String,
    pub embedding: Vec<f32>,
}

/// Options for the one-shot ingestion job.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Files or directories to ingest
    pub paths: Vec<PathBuf>,

    /// Clear the store before ingesting (re-running without this duplicates
    /// every chunk; ingestion is not idempotent)
    pub reset: bool,
}

/// Statistics from an ingestion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestStats {
    /// Number of source documents processed
    pub sources_count: u32,

    /// Number of chunks created
    pub chunks_count: u32,

    /// Total bytes of source text processed
    pub bytes_processed: u64,

    /// Duration in seconds
    pub duration_secs: f64,
}
