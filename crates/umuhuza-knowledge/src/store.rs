//! Knowledge base storage backed by SQLite.
//!
//! The store holds one row per knowledge snippet: the canonical text plus its
//! embedding serialized as a JSON array of floats. Rows are written in bulk by
//! the seeding pipeline and read-only at query time; re-seeding clears and
//! replaces the whole table.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, OpenFlags, params};
use tracing::{debug, info, warn};

use crate::error::{KnowledgeError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Knowledge Store
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite-backed store of `(content, embedding)` pairs.
///
/// All access goes through a `Mutex<Connection>`, so the store is safe to
/// share across threads. Reads may run concurrently with query traffic;
/// concurrent seeding runs against the same store are the caller's problem
/// and can produce duplicate rows.
pub struct KnowledgeStore {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for KnowledgeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeStore").finish_non_exhaustive()
    }
}

impl KnowledgeStore {
    /// Open or create a knowledge store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    KnowledgeError::InvalidPath(format!("{}: {}", parent.display(), e))
                })?;
            }
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_FULL_MUTEX,
        )?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;

        info!("Knowledge store opened at {:?}", path);
        Ok(store)
    }

    /// Create an in-memory store (useful for testing and seeding dry runs).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Create the schema if it does not exist.
    fn initialize(&self) -> Result<()> {
        let conn = self.conn.lock().expect("knowledge store lock poisoned");
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS knowledge_base (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                content TEXT NOT NULL,
                embedding TEXT
            )
            "#,
        )?;
        Ok(())
    }

    /// Insert a snippet with its embedding.
    ///
    /// Used by the seeding pipeline only; the embedding is serialized to a
    /// JSON array before storage.
    pub fn insert(&self, content: &str, embedding: &[f32]) -> Result<()> {
        let payload = serde_json::to_string(embedding)?;
        let conn = self.conn.lock().expect("knowledge store lock poisoned");
        conn.execute(
            "INSERT INTO knowledge_base (content, embedding) VALUES (?1, ?2)",
            params![content, payload],
        )?;
        debug!("Inserted knowledge snippet ({} chars)", content.len());
        Ok(())
    }

    /// Fetch every snippet with a non-null embedding, in insertion order.
    ///
    /// Rows whose embedding payload fails to parse are skipped with a warning
    /// rather than failing the whole read; partial corruption of the knowledge
    /// base degrades retrieval, it does not break it.
    pub fn fetch_all(&self) -> Result<Vec<(String, Vec<f32>)>> {
        let conn = self.conn.lock().expect("knowledge store lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT content, embedding FROM knowledge_base \
             WHERE embedding IS NOT NULL ORDER BY id",
        )?;

        let rows = stmt.query_map([], |row| {
            let content: String = row.get(0)?;
            let payload: String = row.get(1)?;
            Ok((content, payload))
        })?;

        let mut snippets = Vec::new();
        for row in rows {
            let (content, payload) = row?;
            if content.is_empty() {
                continue;
            }
            match serde_json::from_str::<Vec<f32>>(&payload) {
                Ok(embedding) => snippets.push((content, embedding)),
                Err(e) => {
                    warn!("Skipping knowledge row with malformed embedding: {}", e);
                }
            }
        }

        Ok(snippets)
    }

    /// Number of rows in the store, including rows without embeddings.
    pub fn count(&self) -> Result<usize> {
        let conn = self.conn.lock().expect("knowledge store lock poisoned");
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM knowledge_base", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Remove every snippet. Supports the destructive bulk-replace re-seed.
    pub fn clear(&self) -> Result<usize> {
        let conn = self.conn.lock().expect("knowledge store lock poisoned");
        let removed = conn.execute("DELETE FROM knowledge_base", [])?;
        info!("Cleared {} knowledge snippets", removed);
        Ok(removed)
    }

    /// Insert a row with a raw (possibly malformed or null) embedding payload.
    #[cfg(test)]
    pub(crate) fn insert_raw(&self, content: &str, payload: Option<&str>) -> Result<()> {
        let conn = self.conn.lock().expect("knowledge store lock poisoned");
        conn.execute(
            "INSERT INTO knowledge_base (content, embedding) VALUES (?1, ?2)",
            params![content, payload],
        )?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
