// Corpus source trait. Where documents come from is not the pipeline's concern.
//
// Implementors: JsonCorpus (JSON array or JSON Lines file) and SqliteCorpus
// (rusqlite, behind the `sqlite` feature). Sources return raw records; the
// pipeline validates them so one bad record never sinks the whole load.

use anyhow::Result;

use super::models::RawDocument;

pub trait CorpusSource {
    /// Load every record, ordered by year ascending where the store can do so.
    fn load(&self) -> Result<Vec<RawDocument>>;

    /// Short human-readable description for logs (usually the path).
    fn describe(&self) -> String;
}
