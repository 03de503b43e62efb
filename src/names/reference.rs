// Reference name corpus (CSV with `Name` and `Gender` columns).

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use super::classifier::Gender;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRecord {
    pub name: String,
    pub gender: Gender,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Name", alias = "name")]
    name: String,
    #[serde(rename = "Gender", alias = "gender")]
    gender: String,
}

/// Read labelled names from a CSV file. Columns other than `Name` and
/// `Gender` are ignored.
pub fn load_reference_names(path: &Path) -> Result<Vec<NameRecord>> {
    let reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open reference names at {}", path.display()))?;
    let records = read_reference_names(reader)?;
    info!(path = %path.display(), names = records.len(), "Loaded reference names");
    Ok(records)
}

/// Rows with a blank name or an unknown gender label are skipped with a
/// warning; a row that is not valid CSV fails the whole load.
pub fn read_reference_names<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<NameRecord>> {
    let mut records = Vec::new();

    for (i, row) in reader.deserialize::<CsvRow>().enumerate() {
        // +2: header line, 1-based lines
        let line = i + 2;
        let row = row.with_context(|| format!("Invalid reference name row at line {line}"))?;

        let name = row.name.trim();
        if name.is_empty() {
            warn!(line, "Skipping reference row with empty name");
            continue;
        }
        match row.gender.parse::<Gender>() {
            Ok(gender) => records.push(NameRecord {
                name: name.to_string(),
                gender,
            }),
            Err(e) => warn!(line, error = %e, "Skipping reference row"),
        }
    }

    Ok(records)
}
