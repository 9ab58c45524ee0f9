//! SQLite-backed vector store.
//!
//! One table of `(id, text, embedding)` rows, embeddings serialized as
//! little-endian f32 bytes. Insert and full-scan read are the only
//! operations; nothing on the serving path mutates existing rows.

use crate::types::{ChunkRecord, NewChunk};
use rusqlite::{params, Connection};
use std::path::Path;
use tutor_core::{AppError, AppResult};

/// Open (or create) the store at the given path and ensure the schema.
///
/// Fails with a storage-unavailable error if the backing file cannot be
/// opened.
pub fn open_store(db_path: &Path) -> AppResult<Connection> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Knowledge(format!("Failed to create store directory: {}", e))
            })?;
        }
    }

    let conn = Connection::open(db_path)
        .map_err(|e| AppError::Knowledge(format!("Storage unavailable at {:?}: {}", db_path, e)))?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS chunks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            text TEXT NOT NULL,
            embedding BLOB NOT NULL
        );
        "#,
    )
    .map_err(|e| AppError::Knowledge(format!("Failed to create chunks table: {}", e)))?;

    tracing::debug!("Opened vector store at {:?}", db_path);
    Ok(conn)
}

/// Insert a batch of chunks, assigning each a fresh id.
///
/// Runs in a single transaction: the batch is durable when this returns and
/// a failure part-way leaves nothing visible.
pub fn insert_many(conn: &mut Connection, records: &[NewChunk]) -> AppResult<usize> {
    let tx = conn
        .transaction()
        .map_err(|e| AppError::Knowledge(format!("Failed to begin transaction: {}", e)))?;

    {
        let mut stmt = tx
            .prepare("INSERT INTO chunks (text, embedding) VALUES (?1, ?2)")
            .map_err(|e| AppError::Knowledge(format!("Failed to prepare insert: {}", e)))?;

        for record in records {
            stmt.execute(params![record.text, embedding_to_bytes(&record.embedding)])
                .map_err(|e| AppError::Knowledge(format!("Failed to insert chunk: {}", e)))?;
        }
    }

    tx.commit()
        .map_err(|e| AppError::Knowledge(format!("Failed to commit insert: {}", e)))?;

    tracing::debug!("Inserted {} chunks", records.len());
    Ok(records.len())
}

/// Load every stored chunk, in insertion (id) order.
pub fn load_all(conn: &Connection) -> AppResult<Vec<ChunkRecord>> {
    let mut stmt = conn
        .prepare("SELECT id, text, embedding FROM chunks ORDER BY id")
        .map_err(|e| AppError::Knowledge(format!("Failed to prepare scan: {}", e)))?;

    let rows = stmt
        .query_map([], |row| {
            let bytes: Vec<u8> = row.get(2)?;
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, bytes))
        })
        .map_err(|e| AppError::Knowledge(format!("Failed to scan chunks: {}", e)))?;

    let mut chunks = Vec::new();
    for row in rows {
        let (id, text, bytes) =
            row.map_err(|e| AppError::Knowledge(format!("Failed to read chunk row: {}", e)))?;
        chunks.push(ChunkRecord {
            id,
            text,
            embedding: bytes_to_embedding(&bytes)?,
        });
    }

    Ok(chunks)
}

/// Number of stored chunks.
pub fn count(conn: &Connection) -> AppResult<u64> {
    conn.query_row("SELECT COUNT(*) FROM chunks", [], |row| {
        row.get::<_, i64>(0).map(|v| v as u64)
    })
    .map_err(|e| AppError::Knowledge(format!("Failed to count chunks: {}", e)))
}

/// Delete all stored chunks.
pub fn clear(conn: &Connection) -> AppResult<()> {
    conn.execute("DELETE FROM chunks", [])
        .map_err(|e| AppError::Knowledge(format!("Failed to clear chunks: {}", e)))?;

    tracing::info!("Cleared vector store");
    Ok(())
}

/// Serialize an embedding as little-endian f32 bytes.
fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(embedding.len() * 4);
    for &value in embedding {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Deserialize little-endian f32 bytes back into an embedding.
fn bytes_to_embedding(bytes: &[u8]) -> AppResult<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(AppError::Knowledge(
            "Invalid embedding bytes length".to_string(),
        ));
    }

    let mut embedding = Vec::with_capacity(bytes.len() / 4);
    for chunk in bytes.chunks_exact(4) {
        embedding.push(f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }

    Ok(embedding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn new_chunk(text: &str, embedding: Vec<f32>) -> NewChunk {
        NewChunk {
            text: text.to_string(),
            embedding,
        }
    }

    #[test]
    fn test_roundtrip_bytes() {
        let embedding = vec![0.1, -2.5, 3.75, 0.0];
        let bytes = embedding_to_bytes(&embedding);
        assert_eq!(bytes.len(), 16);
        assert_eq!(bytes_to_embedding(&bytes).unwrap(), embedding);
    }

    #[test]
    fn test_bad_byte_length_rejected() {
        assert!(bytes_to_embedding(&[1, 2, 3]).is_err());
    }

    #[test]
    fn test_insert_and_load_all() {
        let file = NamedTempFile::new().unwrap();
        let mut conn = open_store(file.path()).unwrap();

        insert_many(
            &mut conn,
            &[
                new_chunk("first", vec![1.0, 0.0]),
                new_chunk("second", vec![0.0, 1.0]),
            ],
        )
        .unwrap();

        let chunks = load_all(&conn).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "first");
        assert_eq!(chunks[1].text, "second");
        // Ids are assigned in insertion order
        assert!(chunks[0].id < chunks[1].id);
        assert_eq!(chunks[0].embedding, vec![1.0, 0.0]);
    }

    #[test]
    fn test_ids_keep_growing_across_batches() {
        let file = NamedTempFile::new().unwrap();
        let mut conn = open_store(file.path()).unwrap();

        insert_many(&mut conn, &[new_chunk("a", vec![1.0])]).unwrap();
        insert_many(&mut conn, &[new_chunk("b", vec![2.0])]).unwrap();

        let chunks = load_all(&conn).unwrap();
        assert_eq!(chunks[0].text, "a");
        assert!(chunks[1].id > chunks[0].id);
    }

    #[test]
    fn test_empty_store_loads_empty() {
        let file = NamedTempFile::new().unwrap();
        let conn = open_store(file.path()).unwrap();
        assert!(load_all(&conn).unwrap().is_empty());
        assert_eq!(count(&conn).unwrap(), 0);
    }

    #[test]
    fn test_clear() {
        let file = NamedTempFile::new().unwrap();
        let mut conn = open_store(file.path()).unwrap();
        insert_many(&mut conn, &[new_chunk("a", vec![1.0])]).unwrap();
        clear(&conn).unwrap();
        assert_eq!(count(&conn).unwrap(), 0);
    }

    #[test]
    fn test_store_survives_reopen() {
        let file = NamedTempFile::new().unwrap();
        {
            let mut conn = open_store(file.path()).unwrap();
            insert_many(&mut conn, &[new_chunk("durable", vec![0.5])]).unwrap();
        }
        let conn = open_store(file.path()).unwrap();
        let chunks = load_all(&conn).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "durable");
    }
}
