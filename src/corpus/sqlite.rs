// SqliteCorpus: rusqlite-backed document store.
//
// We use rusqlite with the "bundled" feature so there's no system SQLite
// dependency. Years are stored without a declared type so that stores
// imported from other systems may hold them as text; validation happens in
// `corpus::models::ingest`, not here.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection};
use serde_json::Value;
use tracing::debug;

use super::models::{Document, RawDocument};
use super::traits::CorpusSource;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS documents (
    id           TEXT PRIMARY KEY,
    text         TEXT,
    author_label TEXT,
    year
);
CREATE INDEX IF NOT EXISTS idx_documents_year ON documents(year);
";

pub struct SqliteCorpus {
    path: PathBuf,
}

impl SqliteCorpus {
    /// Open an existing store (fails if it doesn't exist yet).
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Corpus database not found at {}. Run `gendertrend import` first.",
                path.display()
            );
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open(&self.path)
            .with_context(|| format!("Failed to open corpus database at {}", self.path.display()))
    }
}

impl CorpusSource for SqliteCorpus {
    fn load(&self) -> Result<Vec<RawDocument>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, text, author_label, year FROM documents ORDER BY CAST(year AS INTEGER), rowid",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(RawDocument {
                id: value_to_json(row.get_ref(0)?),
                text: value_to_json(row.get_ref(1)?),
                author_label: value_to_json(row.get_ref(2)?),
                year: value_to_json(row.get_ref(3)?),
            })
        })?;

        let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(records = records.len(), path = %self.path.display(), "Loaded SQLite corpus");
        Ok(records)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

fn value_to_json(value: ValueRef<'_>) -> Option<Value> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(Value::from(i)),
        ValueRef::Real(f) => Some(Value::from(f)),
        ValueRef::Text(t) => Some(Value::String(String::from_utf8_lossy(t).into_owned())),
        ValueRef::Blob(_) => None,
    }
}

/// Create (or open) a store and write the given documents into it.
///
/// Existing rows with the same id are replaced. Returns the number of rows
/// written.
pub fn import(path: &Path, documents: &[Document]) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create directory for database: {}", path.display())
            })?;
        }
    }

    let mut conn = Connection::open(path)
        .with_context(|| format!("Failed to open corpus database at {}", path.display()))?;
    conn.execute_batch(SCHEMA)?;

    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO documents (id, text, author_label, year) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for doc in documents {
            stmt.execute(params![doc.id, doc.text, doc.author_label, doc.year])?;
        }
    }
    tx.commit()?;

    Ok(documents.len())
}
