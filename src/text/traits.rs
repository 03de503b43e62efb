// Language analyzer trait: the lemmatization / NER capability.
//
// The pipeline only needs two things from a language model: a lemma and a
// coarse part of speech per token, and typed entity spans. Anything that can
// produce those (a rule-based analyzer, a binding to a statistical tagger)
// plugs in here without touching the counting or embedding code.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartOfSpeech {
    Word,
    ProperNoun,
    Number,
    Punctuation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzedToken {
    /// Surface form as it appears in the text
    pub text: String,
    /// Dictionary base form (case as produced by the analyzer)
    pub lemma: String,
    pub pos: PartOfSpeech,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityLabel {
    Person,
}

/// A typed span over the analyzed text. `start`/`end` are byte offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub label: EntityLabel,
}

#[derive(Debug, Clone, Default)]
pub struct Analysis {
    pub tokens: Vec<AnalyzedToken>,
    pub entities: Vec<Entity>,
}

/// Trait for turning raw text into lemmas and entities.
pub trait LanguageAnalyzer {
    fn analyze(&self, text: &str) -> Analysis;
}
