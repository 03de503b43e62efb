// Gender classifier over vectorized names.
//
// A thin wrapper around linfa's multinomial naive Bayes (additive smoothing,
// alpha 1). Sparse name vectors are densified over the vectorizer's
// vocabulary and fed to the model in fixed-size batches through `fit_with`,
// so a reference list of tens of thousands of names never needs one dense
// matrix of its own. An exact probability tie goes to `Gender::Male`.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use linfa::traits::FitWith;
use linfa::{Dataset, ParamGuard};
use linfa_bayes::{MultinomialNb, NaiveBayes};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::vectorizer::SparseVector;

/// Rows densified per `fit_with` call.
const FIT_BATCH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }

    /// Class label used inside the naive Bayes model.
    fn index(self) -> usize {
        match self {
            Gender::Male => 0,
            Gender::Female => 1,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Gender {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Ok(Gender::Male),
            "f" | "female" => Ok(Gender::Female),
            other => bail!("unknown gender label {other:?} (expected M or F)"),
        }
    }
}

/// Anything that labels a vectorized name.
pub trait GenderClassifier {
    fn predict(&self, features: &SparseVector) -> Gender;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NaiveBayesClassifier {
    n_features: usize,
    model: MultinomialNb<f64, usize>,
}

impl NaiveBayesClassifier {
    pub fn fit(samples: &[(SparseVector, Gender)], n_features: usize) -> Result<Self> {
        if let Some(missing) = Gender::ALL
            .iter()
            .find(|g| !samples.iter().any(|(_, gender)| gender == *g))
        {
            bail!("no training names labelled {missing}; both genders are required");
        }
        if let Some((idx, _)) = samples
            .iter()
            .flat_map(|(features, _)| features)
            .find(|(idx, _)| *idx >= n_features)
        {
            bail!("feature index {idx} out of range for {n_features} features");
        }

        let params = MultinomialNb::<f64, usize>::params().check()?;
        let mut model = None;
        for batch in samples.chunks(FIT_BATCH) {
            let x = dense_rows(batch.iter().map(|(features, _)| features), n_features)?;
            let y = Array1::from_iter(batch.iter().map(|(_, gender)| gender.index()));
            let dataset = Dataset::new(x, y);
            model = Some(params.fit_with(model, &dataset)?);
        }

        match model {
            Some(model) => Ok(Self { n_features, model }),
            None => bail!("no training names"),
        }
    }

    /// (P(male), P(female)) for a vectorized name.
    pub fn predict_proba(&self, features: &SparseVector) -> (f64, f64) {
        let Ok(input) = dense_rows(std::iter::once(features), self.n_features) else {
            return (0.5, 0.5);
        };
        let (proba, classes) = self.model.predict_proba(input.view());
        let column = |gender: Gender| {
            classes
                .iter()
                .position(|&&c| c == gender.index())
                .map_or(0.0, |col| proba[[0, col]])
        };
        (column(Gender::Male), column(Gender::Female))
    }
}

impl GenderClassifier for NaiveBayesClassifier {
    fn predict(&self, features: &SparseVector) -> Gender {
        let (male, female) = self.predict_proba(features);
        if female > male {
            Gender::Female
        } else {
            Gender::Male
        }
    }
}

/// One dense row per sparse vector; indices past `n_features` are dropped.
fn dense_rows<'a, I>(rows: I, n_features: usize) -> Result<Array2<f64>>
where
    I: IntoIterator<Item = &'a SparseVector>,
{
    let mut data = Vec::new();
    let mut n_rows = 0;
    for features in rows {
        let mut row = vec![0.0; n_features];
        for &(idx, count) in features {
            if let Some(cell) = row.get_mut(idx) {
                *cell = f64::from(count);
            }
        }
        data.extend(row);
        n_rows += 1;
    }
    Ok(Array2::from_shape_vec((n_rows, n_features), data)?)
}
