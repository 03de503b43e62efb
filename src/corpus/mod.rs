// Corpus layer: document records, their validation and the stores they are read from.

pub mod json;
pub mod models;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod traits;

use std::path::Path;

use anyhow::Result;

use traits::CorpusSource;

/// Pick a corpus source from the file extension: `.db`/`.sqlite`/`.sqlite3`
/// open a SQLite store, anything else is read as JSON or JSON Lines.
pub fn open_source(path: &Path) -> Result<Box<dyn CorpusSource>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("db" | "sqlite" | "sqlite3") => {
            #[cfg(feature = "sqlite")]
            {
                Ok(Box::new(sqlite::SqliteCorpus::open(path)?))
            }
            #[cfg(not(feature = "sqlite"))]
            {
                anyhow::bail!(
                    "{} looks like a SQLite store, but this build has no `sqlite` feature",
                    path.display()
                )
            }
        }
        _ => Ok(Box::new(json::JsonCorpus::new(path))),
    }
}
