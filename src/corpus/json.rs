// JSON corpus source: a JSON array of records, or one record per line.
//
// This is the format a document-store export produces (`mongoexport --jsonArray`
// or plain line-delimited output), so `_id` and `pope` are accepted alongside
// `id` and `author_label`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, warn};

use super::models::RawDocument;
use super::traits::CorpusSource;

pub struct JsonCorpus {
    path: PathBuf,
}

impl JsonCorpus {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl CorpusSource for JsonCorpus {
    fn load(&self) -> Result<Vec<RawDocument>> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read corpus file {}", self.path.display()))?;

        let records = parse_records(&contents)
            .with_context(|| format!("Failed to parse corpus file {}", self.path.display()))?;

        debug!(records = records.len(), path = %self.path.display(), "Loaded JSON corpus");
        Ok(records)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Parse either a JSON array or JSON Lines. Blank lines are ignored.
///
/// Only broken JSON syntax fails the load. Field types are checked per record
/// at ingest, so one record with a numeric `text` does not sink the rest.
pub fn parse_records(contents: &str) -> Result<Vec<RawDocument>> {
    let values: Vec<Value> = if contents.trim_start().starts_with('[') {
        serde_json::from_str(contents)?
    } else {
        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str(line).with_context(|| format!("Invalid JSON on line {}", i + 1))
            })
            .collect::<Result<_>>()?
    };

    Ok(values
        .into_iter()
        .enumerate()
        .map(|(position, value)| to_raw(value, position))
        .collect())
}

/// A record that is not a JSON object becomes an empty raw document, which
/// ingest rejects by position.
fn to_raw(value: Value, position: usize) -> RawDocument {
    serde_json::from_value(value).unwrap_or_else(|e| {
        warn!(position, error = %e, "Corpus record is not a JSON object");
        RawDocument::default()
    })
}
