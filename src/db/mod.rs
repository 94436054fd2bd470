//! SQLite-backed durable store.
//!
//! [`SqliteStore`] implements the [`MemoryStore`] contract over a single
//! local database file. It is the only persistence layer in the crate; the
//! engine never talks SQL directly.

pub mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

use crate::memory::store::MemoryStore;
use crate::memory::types::StoredMemory;

/// Open (or create) the inkling database at the given path, with WAL mode
/// enabled and schema initialized.
pub fn open_database(path: impl AsRef<Path>) -> Result<Connection> {
    let path = path.as_ref();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let conn = Connection::open(path)
        .with_context(|| format!("failed to open database at {}", path.display()))?;

    // WAL for better concurrent read performance
    conn.pragma_update(None, "journal_mode", "WAL")?;

    schema::init_schema(&conn).context("failed to initialize schema")?;

    tracing::info!(path = %path.display(), "database initialized");
    Ok(conn)
}

/// Durable [`MemoryStore`] backed by SQLite.
///
/// The connection is mutex-guarded: rusqlite connections are not `Sync`,
/// and store traffic is light — one write per memory mutation.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a store at the given path, creating the file and schema as
    /// needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            conn: Mutex::new(open_database(path)?),
        })
    }

    /// In-memory store for tests — same schema, nothing on disk.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        schema::init_schema(&conn).context("failed to initialize schema")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredMemory> {
        let embedding_json: String = row.get(2)?;
        let metadata_str: Option<String> = row.get(3)?;
        Ok(StoredMemory {
            id: row.get(0)?,
            text: row.get(1)?,
            embedding: serde_json::from_str(&embedding_json).unwrap_or_default(),
            metadata: metadata_str.and_then(|s| serde_json::from_str(&s).ok()),
            created_at: row.get(4)?,
            last_accessed_at: row.get(5)?,
            access_count: row.get(6)?,
        })
    }
}

impl MemoryStore for SqliteStore {
    fn get_all(&self) -> Result<Vec<StoredMemory>> {
        let conn = self.conn.lock().expect("db mutex poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, text, embedding, metadata, created_at, last_accessed_at, access_count \
             FROM memories ORDER BY created_at",
        )?;
        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn put(&self, record: &StoredMemory) -> Result<()> {
        let embedding_json = serde_json::to_string(&record.embedding)?;
        let metadata_json = record
            .metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let conn = self.conn.lock().expect("db mutex poisoned");
        conn.execute(
            "INSERT OR REPLACE INTO memories \
             (id, text, embedding, metadata, created_at, last_accessed_at, access_count) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.id,
                record.text,
                embedding_json,
                metadata_json,
                record.created_at,
                record.last_accessed_at,
                record.access_count,
            ],
        )?;
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<()> {
        let conn = self.conn.lock().expect("db mutex poisoned");
        conn.execute("DELETE FROM memories WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let conn = self.conn.lock().expect("db mutex poisoned");
        conn.execute("DELETE FROM memories", [])?;
        Ok(())
    }
}

#[allow(dead_code)]
impl SqliteStore {
    /// Fetch a single record by id. Test and inspection helper.
    pub fn get(&self, id: &str) -> Result<Option<StoredMemory>> {
        let conn = self.conn.lock().expect("db mutex poisoned");
        let record = conn
            .query_row(
                "SELECT id, text, embedding, metadata, created_at, last_accessed_at, access_count \
                 FROM memories WHERE id = ?1",
                params![id],
                Self::row_to_record,
            )
            .optional()?;
        Ok(record)
    }
}
