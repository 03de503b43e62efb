// Name-gender attribution.
//
// PERSON entities are pulled out of the raw documents, cut down to their given
// name and classified with a naive Bayes model over character n-grams. The
// model is trained once from a reference CSV (`gendertrend train-classifier`)
// and persisted as JSON; every later run loads it and fails up front if it is
// missing.

pub mod classifier;
pub mod entities;
pub mod reference;
pub mod vectorizer;

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use self::classifier::{Gender, GenderClassifier, NaiveBayesClassifier};
use self::entities::{extract_person_names, reduce_to_first_names};
use self::reference::NameRecord;
use self::vectorizer::NameVectorizer;
use crate::corpus::models::Document;
use crate::error::AnalysisError;
use crate::text::traits::LanguageAnalyzer;

const MODEL_FILE: &str = "name_gender.json";

/// Vectorizer, classifier and the given-name gazetteer, stored together so a
/// loaded model always classifies with the vocabulary it was trained on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameGenderModel {
    vectorizer: NameVectorizer,
    classifier: NaiveBayesClassifier,
    given_names: BTreeSet<String>,
}

impl NameGenderModel {
    pub fn train(records: &[NameRecord]) -> Result<Self> {
        let vectorizer = NameVectorizer::fit(records.iter().map(|r| r.name.as_str()));
        let samples: Vec<_> = records
            .iter()
            .map(|r| (vectorizer.transform(&r.name), r.gender))
            .collect();
        let classifier = NaiveBayesClassifier::fit(&samples, vectorizer.n_features())?;
        let given_names = records.iter().map(|r| r.name.to_lowercase()).collect();

        info!(
            names = records.len(),
            features = vectorizer.n_features(),
            "Trained name gender classifier"
        );

        Ok(Self {
            vectorizer,
            classifier,
            given_names,
        })
    }

    /// Where `train-classifier` writes the model inside a model directory.
    pub fn default_path(model_dir: &Path) -> PathBuf {
        model_dir.join(MODEL_FILE)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create model directory {}", parent.display()))?;
        }
        let json = serde_json::to_string(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write model to {}", path.display()))?;
        info!(path = %path.display(), "Saved name gender model");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, AnalysisError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            AnalysisError::missing(
                "name classifier",
                format!(
                    "cannot read {} ({e}); run `gendertrend train-classifier` first",
                    path.display()
                ),
            )
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            AnalysisError::missing(
                "name classifier",
                format!("{} is not a valid model ({e})", path.display()),
            )
        })
    }

    pub fn predict(&self, name: &str) -> Gender {
        self.classifier.predict(&self.vectorizer.transform(name))
    }

    pub fn predict_proba(&self, name: &str) -> (f64, f64) {
        self.classifier.predict_proba(&self.vectorizer.transform(name))
    }

    /// Lowercased given names from the reference corpus, for NER gazetteers.
    pub fn given_names(&self) -> &BTreeSet<String> {
        &self.given_names
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameAttribution {
    pub male: BTreeSet<String>,
    pub female: BTreeSet<String>,
}

impl NameAttribution {
    pub fn len(&self) -> usize {
        self.male.len() + self.female.len()
    }

    pub fn is_empty(&self) -> bool {
        self.male.is_empty() && self.female.is_empty()
    }
}

/// Partition the given names of every person mentioned in `documents` by
/// predicted gender.
pub fn attribute_names(
    analyzer: &dyn LanguageAnalyzer,
    model: &NameGenderModel,
    documents: &[Document],
) -> NameAttribution {
    let persons = extract_person_names(analyzer, documents);
    debug!(persons = persons.len(), "Extracted person entities");

    let mut attribution = NameAttribution::default();
    for name in reduce_to_first_names(&persons) {
        match model.predict(&name) {
            Gender::Male => attribution.male.insert(name),
            Gender::Female => attribution.female.insert(name),
        };
    }

    info!(
        male = attribution.male.len(),
        female = attribution.female.len(),
        "Attributed person names"
    );
    attribution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::lemmatizer::RuleBasedAnalyzer;

    fn records() -> Vec<NameRecord> {
        let female = ["Mary", "Anna", "Maria", "Teresa", "Clara", "Julia", "Monica", "Rosa"];
        let male = ["John", "Paul", "Peter", "Francis", "Tom", "Leo", "Benedict", "Pius"];
        female
            .iter()
            .map(|n| NameRecord { name: n.to_string(), gender: Gender::Female })
            .chain(male.iter().map(|n| NameRecord { name: n.to_string(), gender: Gender::Male }))
            .collect()
    }

    #[test]
    fn trained_model_recalls_reference_names() {
        let model = NameGenderModel::train(&records()).unwrap();
        assert_eq!(model.predict("Mary"), Gender::Female);
        assert_eq!(model.predict("Peter"), Gender::Male);
        assert!(model.given_names().contains("teresa"));
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = NameGenderModel::default_path(&dir.path().join("models"));
        let model = NameGenderModel::train(&records()).unwrap();
        model.save(&path).unwrap();

        let loaded = NameGenderModel::load(&path).unwrap();
        assert_eq!(loaded.predict("Julia"), model.predict("Julia"));
        assert_eq!(loaded.given_names(), model.given_names());
    }

    #[test]
    fn missing_model_is_missing_capability() {
        let dir = tempfile::tempdir().unwrap();
        let err = NameGenderModel::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingCapability { .. }));
        assert!(err.to_string().contains("train-classifier"));
    }

    #[test]
    fn attribution_partitions_first_names() {
        let model = NameGenderModel::train(&records()).unwrap();
        let analyzer = RuleBasedAnalyzer::default().with_given_names(model.given_names());
        let docs = [Document {
            id: "1".into(),
            text: "We recall Mary Smith, and Mr. John spoke with Teresa.".into(),
            author_label: "Francis".into(),
            year: 2016,
        }];

        let attribution = attribute_names(&analyzer, &model, &docs);
        assert_eq!(attribution.female.iter().collect::<Vec<_>>(), vec!["Mary", "Teresa"]);
        assert_eq!(attribution.male.iter().collect::<Vec<_>>(), vec!["John"]);
    }
}
