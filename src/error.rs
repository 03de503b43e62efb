// Error taxonomy for the analysis pipeline.
//
// Only the conditions a caller may want to match on get a variant here.
// Vocabulary misses and zero denominators are not errors: the nearest-neighbour
// query skips unknown words and the ratio calculator falls back to the
// numerator. Everything else (file I/O, JSON, SQLite) flows through anyhow at
// the application edge.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A collaborator the run cannot proceed without (lemmatizer, synonym
    /// graph, name classifier) could not be loaded.
    #[error("{capability} is unavailable: {detail}")]
    MissingCapability {
        capability: &'static str,
        detail: String,
    },

    /// A corpus record is missing a required field or has a year that is not
    /// an integer.
    #[error("document {id} is malformed: {reason}")]
    MalformedDocument { id: String, reason: String },

    /// Embedding training needs every document to be well-formed before it
    /// starts.
    #[error(
        "embedding training needs a well-formed corpus, but {count} document(s) were rejected (first: {first_id})"
    )]
    MalformedTrainingSet { count: usize, first_id: String },

    /// No word in the training sentences reached the minimum frequency.
    #[error("no word in the training corpus occurs at least {min_count} time(s)")]
    EmptyVocabulary { min_count: usize },
}

impl AnalysisError {
    pub fn missing(capability: &'static str, detail: impl Into<String>) -> Self {
        Self::MissingCapability {
            capability,
            detail: detail.into(),
        }
    }

    pub fn malformed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = AnalysisError::malformed("doc-7", "year \"abc\" is not an integer");
        assert_eq!(
            err.to_string(),
            "document doc-7 is malformed: year \"abc\" is not an integer"
        );

        let err = AnalysisError::missing("name classifier", "no model at /tmp/x.json");
        assert!(err.to_string().starts_with("name classifier is unavailable"));
    }
}
