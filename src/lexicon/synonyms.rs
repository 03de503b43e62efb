// JSON-backed synonym table.
//
// Format: an object mapping a lowercase word to its synonym sets, each a list
// of lemmas with the canonical one first:
//
//   { "woman": [["woman", "adult_female"], ["charwoman", "char", "woman"]] }
//
// The built-in table covers the seed vocabulary and was exported from
// WordNet, which is where the canonical-first ordering comes from.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use super::traits::{Synset, SynonymGraph};
use crate::error::AnalysisError;

const BUILTIN: &str = include_str!("../../data/synonyms.json");

#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    entries: HashMap<String, Vec<Synset>>,
}

impl SynonymTable {
    /// The table shipped with the crate.
    pub fn builtin() -> Result<Self, AnalysisError> {
        Self::from_json(BUILTIN).map_err(|e| AnalysisError::missing("synonym graph", format!("built-in table is invalid: {e}")))
    }

    /// Load a table from disk. Any failure here is fatal for the run.
    pub fn load(path: &Path) -> Result<Self, AnalysisError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            AnalysisError::missing("synonym graph", format!("cannot read {}: {e}", path.display()))
        })?;
        let table = Self::from_json(&contents).map_err(|e| {
            AnalysisError::missing("synonym graph", format!("cannot parse {}: {e}", path.display()))
        })?;
        debug!(words = table.entries.len(), path = %path.display(), "Loaded synonym table");
        Ok(table)
    }

    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        let raw: HashMap<String, Vec<Synset>> = serde_json::from_str(contents)?;
        let entries = raw
            .into_iter()
            .map(|(word, synsets)| (word.to_lowercase(), synsets))
            .collect();
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SynonymGraph for SynonymTable {
    fn synsets(&self, word: &str) -> Vec<Synset> {
        self.entries
            .get(&word.to_lowercase())
            .cloned()
            .unwrap_or_default()
    }
}
