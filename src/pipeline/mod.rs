// Analysis pipeline: ingest -> tokenize -> count -> embed -> query.
//
// Each stage takes the previous stage's output by reference and returns new
// data; nothing is stored on the pipeline between calls. `run` threads all of
// them into a single serializable report.
//
// Tokenizing and counting tolerate rejected documents (they were already
// logged at ingest). Embedding training does not: it refuses to start unless
// every raw record made it through validation.

use std::collections::BTreeSet;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

use crate::corpus::models::{ingest, Corpus, Document, ParsedDocument, RawDocument};
use crate::embedding::model::EmbeddingModel;
use crate::embedding::projection::{project, Projection, ScatterPair};
use crate::embedding::similarity::{most_similar, SimilarityTable};
use crate::embedding::skipgram::{self, SkipGramParams};
use crate::error::AnalysisError;
use crate::frequency::counter::{count, CountMode, YearCounter};
use crate::frequency::ratio::{ratio_series, RatioSeries};
use crate::lexicon::GenderLexicons;
use crate::names::{attribute_names, NameAttribution, NameGenderModel};
use crate::text::normalize::{normalize, sentence_normalize};
use crate::text::traits::LanguageAnalyzer;

pub const DEFAULT_TOP_K: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineSettings {
    /// Neighbours kept per query word
    pub top_k: usize,
    pub skipgram: SkipGramParams,
    /// Draw a progress bar while tokenizing
    #[serde(skip)]
    pub show_progress: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            skipgram: SkipGramParams::default(),
            show_progress: false,
        }
    }
}

/// Woman and man counters for one count mode, with their ratio series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterPair {
    pub woman: YearCounter,
    pub man: YearCounter,
    pub ratios: RatioSeries,
}

impl CounterPair {
    pub fn compute(documents: &[ParsedDocument], lexicons: &GenderLexicons, mode: CountMode) -> Self {
        let woman = count(documents, &lexicons.woman, mode);
        let man = count(documents, &lexicons.man, mode);
        let ratios = ratio_series(&woman, &man);
        Self { woman, man, ratios }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyReport {
    pub raw: CounterPair,
    pub smoothed: CounterPair,
}

/// Nearest neighbours of every lexicon word, and of every attributed given
/// name, that made it into the embedding vocabulary. Name tables are keyed by
/// the lowercased name, the form it takes in the vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityReport {
    pub k: usize,
    pub woman: SimilarityTable,
    pub man: SimilarityTable,
    #[serde(skip_serializing_if = "SimilarityTable::is_empty")]
    pub female_names: SimilarityTable,
    #[serde(skip_serializing_if = "SimilarityTable::is_empty")]
    pub male_names: SimilarityTable,
}

/// Everything one full run produces, in the shapes the plotting side reads.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub documents: usize,
    /// One message per rejected record, naming its id
    pub rejected: Vec<String>,
    pub lexicons: GenderLexicons,
    pub settings: PipelineSettings,
    pub frequencies: FrequencyReport,
    pub vocabulary: usize,
    pub similarity: SimilarityReport,
    pub projection: Projection,
    pub woman_scatter: Vec<ScatterPair>,
    pub man_scatter: Vec<ScatterPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub names: Option<NameAttribution>,
}

pub struct Pipeline<'a> {
    analyzer: &'a dyn LanguageAnalyzer,
    settings: PipelineSettings,
}

impl<'a> Pipeline<'a> {
    pub fn new(analyzer: &'a dyn LanguageAnalyzer, settings: PipelineSettings) -> Self {
        Self { analyzer, settings }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn ingest(&self, raw: Vec<RawDocument>) -> Corpus {
        let corpus = ingest(raw);
        info!(
            documents = corpus.documents.len(),
            rejected = corpus.rejected.len(),
            "Ingested corpus"
        );
        corpus
    }

    /// Flat lemma sequence per document, in corpus order.
    pub fn tokenize(&self, documents: &[Document]) -> Vec<ParsedDocument> {
        let pb = self.progress_bar(documents.len(), "Tokenizing");

        let parsed = documents
            .iter()
            .map(|doc| {
                let lemmas = normalize(self.analyzer, &doc.text);
                pb.inc(1);
                ParsedDocument {
                    id: doc.id.clone(),
                    lemmas,
                    author_label: doc.author_label.clone(),
                    year: doc.year,
                }
            })
            .collect();

        pb.finish_and_clear();
        parsed
    }

    pub fn frequencies(&self, parsed: &[ParsedDocument], lexicons: &GenderLexicons) -> FrequencyReport {
        FrequencyReport {
            raw: CounterPair::compute(parsed, lexicons, CountMode::Raw),
            smoothed: CounterPair::compute(parsed, lexicons, CountMode::Smoothed),
        }
    }

    /// Sentence token sequences of every document, concatenated in corpus order.
    pub fn sentences(&self, documents: &[Document]) -> Vec<Vec<String>> {
        documents
            .iter()
            .flat_map(|doc| sentence_normalize(self.analyzer, &doc.text))
            .collect()
    }

    /// Train word vectors on the whole corpus. Fails if any raw record was
    /// rejected at ingest.
    pub fn embed(&self, corpus: &Corpus) -> Result<EmbeddingModel, AnalysisError> {
        if let Some(first) = corpus.rejected.first() {
            let first_id = match first {
                AnalysisError::MalformedDocument { id, .. } => id.clone(),
                other => other.to_string(),
            };
            return Err(AnalysisError::MalformedTrainingSet {
                count: corpus.rejected.len(),
                first_id,
            });
        }

        let sentences = self.sentences(&corpus.documents);
        skipgram::train(&sentences, &self.settings.skipgram)
    }

    /// Neighbours of the lexicon words, plus those of the attributed names
    /// when there are any.
    pub fn neighbours(
        &self,
        model: &EmbeddingModel,
        lexicons: &GenderLexicons,
        names: Option<&NameAttribution>,
    ) -> SimilarityReport {
        let k = self.settings.top_k;
        let (female_names, male_names) = match names {
            Some(attribution) => (
                name_neighbours(model, &attribution.female, k),
                name_neighbours(model, &attribution.male, k),
            ),
            None => Default::default(),
        };
        SimilarityReport {
            k,
            woman: most_similar(model, lexicons.woman.iter(), k),
            man: most_similar(model, lexicons.man.iter(), k),
            female_names,
            male_names,
        }
    }

    /// Full pass over `raw`. Name attribution runs only when a model is given.
    pub fn run(
        &self,
        raw: Vec<RawDocument>,
        lexicons: &GenderLexicons,
        names: Option<&NameGenderModel>,
    ) -> Result<AnalysisReport, AnalysisError> {
        let corpus = self.ingest(raw);
        let parsed = self.tokenize(&corpus.documents);
        let frequencies = self.frequencies(&parsed, lexicons);

        let names = names.map(|m| attribute_names(self.analyzer, m, &corpus.documents));

        let model = self.embed(&corpus)?;
        let similarity = self.neighbours(&model, lexicons, names.as_ref());
        let projection = project(&model);
        let woman_scatter = projection.scatter(&similarity.woman);
        let man_scatter = projection.scatter(&similarity.man);

        Ok(AnalysisReport {
            documents: corpus.documents.len(),
            rejected: corpus.rejected.iter().map(ToString::to_string).collect(),
            lexicons: lexicons.clone(),
            settings: self.settings.clone(),
            frequencies,
            vocabulary: model.len(),
            similarity,
            projection,
            woman_scatter,
            man_scatter,
            names,
        })
    }

    fn progress_bar(&self, len: usize, label: &str) -> ProgressBar {
        if !self.settings.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len as u64);
        let style = ProgressStyle::default_bar()
            .template(&format!("  {label} [{{bar:30}}] {{pos}}/{{len}} ({{eta}})"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb
    }
}

/// Names are capitalized in the text but every training token is lowercase.
fn name_neighbours(model: &EmbeddingModel, names: &BTreeSet<String>, k: usize) -> SimilarityTable {
    let lowered: Vec<String> = names.iter().map(|name| name.to_lowercase()).collect();
    most_similar(model, lowered.iter().map(String::as_str), k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::Lexicon;
    use crate::text::lemmatizer::RuleBasedAnalyzer;
    use ndarray::array;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawDocument {
        serde_json::from_value(value).unwrap()
    }

    fn lexicons() -> GenderLexicons {
        GenderLexicons {
            woman: Lexicon::from_words(["woman", "she"]),
            man: Lexicon::from_words(["man", "he"]),
        }
    }

    #[test]
    fn tokenize_keeps_document_metadata() {
        let analyzer = RuleBasedAnalyzer::default();
        let pipeline = Pipeline::new(&analyzer, PipelineSettings::default());
        let corpus = pipeline.ingest(vec![raw(json!({
            "id": "a", "text": "Women pray.", "pope": "Leo", "year": 1891
        }))]);

        let parsed = pipeline.tokenize(&corpus.documents);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].lemmas, vec!["woman", "pray", "."]);
        assert_eq!(parsed[0].author_label, "Leo");
        assert_eq!(parsed[0].year, 1891);
    }

    #[test]
    fn frequencies_cover_both_modes() {
        let analyzer = RuleBasedAnalyzer::default();
        let pipeline = Pipeline::new(&analyzer, PipelineSettings::default());
        let corpus = pipeline.ingest(vec![
            raw(json!({"id": "a", "text": "She spoke and she wept.", "pope": "P", "year": 2000})),
            raw(json!({"id": "b", "text": "He spoke.", "pope": "P", "year": 2001})),
        ]);
        let parsed = pipeline.tokenize(&corpus.documents);
        let report = pipeline.frequencies(&parsed, &lexicons());

        assert_eq!(report.raw.woman.get(2000), 2.0);
        assert_eq!(report.raw.man.get(2001), 1.0);
        assert_eq!(report.raw.ratios.len(), 2);
        assert_eq!(report.raw.ratios[1].ratio, 1.0);
        assert!(report.smoothed.woman.get(2001) < 0.0);
    }

    #[test]
    fn embed_refuses_incomplete_corpus() {
        let analyzer = RuleBasedAnalyzer::default();
        let pipeline = Pipeline::new(&analyzer, PipelineSettings::default());
        let corpus = pipeline.ingest(vec![
            raw(json!({"id": "ok", "text": "The woman prays.", "pope": "P", "year": 2000})),
            raw(json!({"id": "bad", "text": "No year here.", "pope": "P"})),
        ]);

        let err = pipeline.embed(&corpus).unwrap_err();
        match err {
            AnalysisError::MalformedTrainingSet { count, first_id } => {
                assert_eq!(count, 1);
                assert_eq!(first_id, "bad");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn name_neighbours_look_up_lowercased_names() {
        let analyzer = RuleBasedAnalyzer::default();
        let settings = PipelineSettings {
            top_k: 1,
            ..PipelineSettings::default()
        };
        let pipeline = Pipeline::new(&analyzer, settings);
        let model = EmbeddingModel::from_parts(
            vec!["mary".into(), "pray".into(), "john".into(), "work".into()],
            array![[1.0, 0.1], [0.9, 0.2], [-1.0, 0.1], [-0.9, 0.3]],
        )
        .unwrap();
        let attribution = NameAttribution {
            female: BTreeSet::from(["Mary".to_string(), "Absent".to_string()]),
            male: BTreeSet::from(["John".to_string()]),
        };

        let report = pipeline.neighbours(&model, &lexicons(), Some(&attribution));
        assert_eq!(report.female_names.words("mary").unwrap(), vec!["pray"]);
        assert!(!report.female_names.contains("absent"));
        assert_eq!(report.male_names.words("john").unwrap(), vec!["work"]);
        assert!(report.woman.is_empty());

        let without = pipeline.neighbours(&model, &lexicons(), None);
        assert!(without.female_names.is_empty() && without.male_names.is_empty());
    }

    #[test]
    fn sentences_are_split_per_document() {
        let analyzer = RuleBasedAnalyzer::default();
        let pipeline = Pipeline::new(&analyzer, PipelineSettings::default());
        let corpus = pipeline.ingest(vec![
            raw(json!({"id": "a", "text": "The woman prays. The man works.", "pope": "P", "year": 2000})),
            raw(json!({"id": "b", "text": "A girl sings.", "pope": "P", "year": 2001})),
        ]);
        let sentences = pipeline.sentences(&corpus.documents);
        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[2], vec!["a", "girl", "sing"]);
    }
}
