// Document records as they arrive from a corpus source and after validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::AnalysisError;

/// A corpus record exactly as the store hands it over.
///
/// Every field is an optional untyped JSON value, so any JSON object
/// deserializes and a bad record is rejected on its own by
/// `Document::from_raw` instead of failing the whole load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDocument {
    #[serde(default, alias = "_id")]
    pub id: Option<Value>,
    #[serde(default)]
    pub text: Option<Value>,
    #[serde(default, alias = "pope", alias = "author")]
    pub author_label: Option<Value>,
    /// Stores disagree on whether the year is a number or a string.
    #[serde(default)]
    pub year: Option<Value>,
}

/// A validated document. Immutable once ingested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    pub author_label: String,
    pub year: i32,
}

/// A document reduced to its lowercase lemma sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub id: String,
    pub lemmas: Vec<String>,
    pub author_label: String,
    pub year: i32,
}

/// The outcome of ingesting a batch of raw records: the documents that passed
/// validation (sorted by year, ties in source order) and the ones that did not.
#[derive(Debug, Default)]
pub struct Corpus {
    pub documents: Vec<Document>,
    pub rejected: Vec<AnalysisError>,
}

impl Corpus {
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }
}

impl Document {
    /// Validate a raw record. `position` names the record when it has no id.
    pub fn from_raw(raw: RawDocument, position: usize) -> Result<Self, AnalysisError> {
        let id = match raw.id {
            Some(Value::String(s)) if !s.trim().is_empty() => s,
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Object(ref map)) if map.contains_key("$oid") => {
                // Extended-JSON exports wrap ids as {"$oid": "..."}
                match map.get("$oid") {
                    Some(Value::String(s)) => s.clone(),
                    _ => return Err(AnalysisError::malformed(format!("#{position}"), "id is not a string")),
                }
            }
            _ => return Err(AnalysisError::malformed(format!("#{position}"), "id is missing")),
        };

        let text = match raw.text {
            Some(Value::String(s)) => s,
            None | Some(Value::Null) => return Err(AnalysisError::malformed(&id, "text is missing")),
            Some(other) => {
                return Err(AnalysisError::malformed(&id, format!("text {other} is not a string")))
            }
        };

        let author_label = match raw.author_label {
            Some(Value::String(s)) => s,
            None | Some(Value::Null) => String::new(),
            Some(other) => {
                return Err(AnalysisError::malformed(
                    &id,
                    format!("author label {other} is not a string"),
                ))
            }
        };

        let year = match raw.year {
            Some(value) => parse_year(&value)
                .ok_or_else(|| AnalysisError::malformed(&id, format!("year {value} is not an integer")))?,
            None => return Err(AnalysisError::malformed(&id, "year is missing")),
        };

        Ok(Self {
            id,
            text,
            author_label,
            year,
        })
    }
}

fn parse_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i32::try_from(i).ok()
            } else {
                let f = n.as_f64()?;
                (f.fract() == 0.0 && f.abs() <= i32::MAX as f64).then_some(f as i32)
            }
        }
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Validate every raw record. Malformed ones are logged and kept aside so the
/// rest of the corpus can still be processed.
pub fn ingest(raw: Vec<RawDocument>) -> Corpus {
    let mut corpus = Corpus::default();

    for (position, record) in raw.into_iter().enumerate() {
        match Document::from_raw(record, position) {
            Ok(doc) => corpus.documents.push(doc),
            Err(e) => {
                warn!(error = %e, "Skipping malformed document");
                corpus.rejected.push(e);
            }
        }
    }

    // Stable: documents sharing a year keep their source order
    corpus.documents.sort_by_key(|d| d.year);
    corpus
}
