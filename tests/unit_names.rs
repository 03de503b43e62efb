// Unit tests for name extraction and gender attribution.
//
// The classifier is trained from a small reference CSV written to a temp
// directory, then persisted and reloaded the way `train-classifier` and
// `names` use it.

use gendertrend::corpus::models::Document;
use gendertrend::error::AnalysisError;
use gendertrend::names::classifier::Gender;
use gendertrend::names::entities::{extract_person_names, reduce_to_first_names};
use gendertrend::names::reference::load_reference_names;
use gendertrend::names::{attribute_names, NameGenderModel};
use gendertrend::text::lemmatizer::RuleBasedAnalyzer;

const REFERENCE_CSV: &str = "\
Id,Name,Year,Gender,Count
1,Mary,1880,F,7065
2,Anna,1880,F,2604
3,Emma,1880,F,2003
4,Elizabeth,1880,F,1939
5,Margaret,1880,F,1578
6,Clara,1880,F,1226
7,Teresa,1880,F,300
8,Catherine,1880,F,688
9,John,1880,M,9655
10,William,1880,M,9532
11,James,1880,M,5927
12,Charles,1880,M,5348
13,George,1880,M,5126
14,Joseph,1880,M,2632
15,Thomas,1880,M,2534
16,Francis,1880,M,1000
";

fn trained_model() -> NameGenderModel {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("NationalNames.csv");
    std::fs::write(&csv, REFERENCE_CSV).unwrap();
    let records = load_reference_names(&csv).unwrap();
    NameGenderModel::train(&records).unwrap()
}

fn doc(id: &str, text: &str) -> Document {
    Document {
        id: id.to_string(),
        text: text.to_string(),
        author_label: "Leo".to_string(),
        year: 1891,
    }
}

// ============================================================
// First-name reduction
// ============================================================

#[test]
fn mary_smith_and_john_reduce_to_first_tokens() {
    assert_eq!(reduce_to_first_names(["Mary Smith", "John"]), vec!["Mary", "John"]);
}

#[test]
fn extracted_entities_reduce_to_given_names() {
    let analyzer = RuleBasedAnalyzer::default();
    let persons = extract_person_names(
        &analyzer,
        &[doc("1", "We honour Mrs. Catherine Drexel and Mr. James Gibbons.")],
    );
    let first = reduce_to_first_names(&persons);
    assert_eq!(first, vec!["Catherine", "James"]);
}

// ============================================================
// Classifier
// ============================================================

#[test]
fn reference_names_are_classified_by_their_label() {
    let model = trained_model();
    for name in ["Mary", "Elizabeth", "Margaret"] {
        assert_eq!(model.predict(name), Gender::Female, "{name}");
    }
    for name in ["John", "William", "George"] {
        assert_eq!(model.predict(name), Gender::Male, "{name}");
    }
}

#[test]
fn probabilities_agree_with_prediction() {
    let model = trained_model();
    let (male, female) = model.predict_proba("Anna");
    assert!((male + female - 1.0).abs() < 1e-9);
    assert!(female > male);
}

#[test]
fn model_survives_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = NameGenderModel::default_path(dir.path());
    let model = trained_model();
    model.save(&path).unwrap();

    let loaded = NameGenderModel::load(&path).unwrap();
    for name in ["Clara", "Joseph", "Zelda"] {
        assert_eq!(loaded.predict(name), model.predict(name));
    }
}

#[test]
fn corrupt_model_is_missing_capability() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("name_gender.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        NameGenderModel::load(&path),
        Err(AnalysisError::MissingCapability { .. })
    ));
}

// ============================================================
// Attribution
// ============================================================

#[test]
fn attribution_partitions_people_by_gender() {
    let model = trained_model();
    let analyzer = RuleBasedAnalyzer::default().with_given_names(model.given_names());
    let docs = [
        doc("1", "Elizabeth Seton founded schools, and Thomas More wrote."),
        doc("2", "We recall Elizabeth Seton again, with Mr. George Smith."),
    ];

    let attribution = attribute_names(&analyzer, &model, &docs);
    assert_eq!(attribution.female.iter().collect::<Vec<_>>(), vec!["Elizabeth"]);
    assert_eq!(
        attribution.male.iter().collect::<Vec<_>>(),
        vec!["George", "Thomas"]
    );
}

#[test]
fn attribution_of_text_without_people_is_empty() {
    let model = trained_model();
    let analyzer = RuleBasedAnalyzer::default().with_given_names(model.given_names());
    let attribution = attribute_names(&analyzer, &model, &[doc("1", "the poor are blessed.")]);
    assert!(attribution.is_empty());
}
