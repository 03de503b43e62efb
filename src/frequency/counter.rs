// Per-year lexicon frequency counting.
//
// Two modes share the same walk over documents:
//
//   Raw:       year += count(w)
//   Smoothed:  year += ln((count(w) + 1) / (|lemmas| + |distinct lemmas|))
//
// The smoothed mode is a Laplace-smoothed log-probability with the document's
// vocabulary added to the denominator. An empty document has a zero
// denominator; it is clamped to 1 so the term is ln(1) = 0.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::corpus::models::ParsedDocument;
use crate::lexicon::Lexicon;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountMode {
    Raw,
    Smoothed,
}

/// Year -> accumulated value, in the order years were first seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearCounter {
    values: IndexMap<i32, f64>,
}

impl YearCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `year`, or 0 when the year was never seen.
    pub fn get(&self, year: i32) -> f64 {
        self.values.get(&year).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, year: i32) -> bool {
        self.values.contains_key(&year)
    }

    pub fn add(&mut self, year: i32, amount: f64) {
        *self.values.entry(year).or_insert(0.0) += amount;
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.values.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.values.iter().map(|(&y, &v)| (y, v))
    }

    pub fn total(&self) -> f64 {
        self.values.values().sum()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sum another counter into this one, year by year. Years new to `self`
    /// are appended in `other`'s order.
    pub fn merge(&mut self, other: &YearCounter) {
        for (year, value) in other.iter() {
            self.add(year, value);
        }
    }
}

/// Accumulate lexicon occurrences per year over `documents`.
///
/// Every document's year becomes a key, even when no lexicon word occurs in it.
pub fn count(documents: &[ParsedDocument], lexicon: &Lexicon, mode: CountMode) -> YearCounter {
    let mut counter = YearCounter::new();

    for doc in documents {
        counter.add(doc.year, 0.0);

        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        for lemma in &doc.lemmas {
            *occurrences.entry(lemma.as_str()).or_insert(0) += 1;
        }

        let denominator = (doc.lemmas.len() + occurrences.len()).max(1) as f64;

        for word in lexicon.iter() {
            let n = occurrences.get(word).copied().unwrap_or(0);
            let amount = match mode {
                CountMode::Raw => n as f64,
                CountMode::Smoothed => {
                    let term = ((n + 1) as f64 / denominator).ln();
                    debug_assert!(n > 0 || term <= 0.0, "zero-count term must not be positive");
                    term
                }
            };
            counter.add(doc.year, amount);
        }
    }

    counter
}
