// Character n-gram features for given names.
//
// A name is lowercased and wrapped in ^...$ so prefixes and suffixes get their
// own grams ("^ma", "ry$"). Each name yields every 1- to 3-gram of the padded
// form plus one whole-name feature. The vocabulary is fixed at fit time;
// grams never seen in the reference corpus are ignored by `transform`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

const MAX_GRAM: usize = 3;

/// Sorted (feature index, count) pairs.
pub type SparseVector = Vec<(usize, u32)>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NameVectorizer {
    vocabulary: BTreeMap<String, usize>,
}

impl NameVectorizer {
    pub fn fit<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut features: Vec<String> = names
            .into_iter()
            .flat_map(|name| extract_features(name.as_ref()))
            .collect();
        features.sort();
        features.dedup();

        let vocabulary = features
            .into_iter()
            .enumerate()
            .map(|(i, f)| (f, i))
            .collect();
        Self { vocabulary }
    }

    pub fn transform(&self, name: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
        for feature in extract_features(name) {
            if let Some(&idx) = self.vocabulary.get(&feature) {
                *counts.entry(idx).or_insert(0) += 1;
            }
        }
        counts.into_iter().collect()
    }

    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }
}

fn extract_features(name: &str) -> Vec<String> {
    let lower = name.trim().to_lowercase();
    if lower.is_empty() {
        return Vec::new();
    }

    let padded: Vec<char> = std::iter::once('^')
        .chain(lower.chars())
        .chain(std::iter::once('$'))
        .collect();

    let mut features = Vec::new();
    for n in 1..=MAX_GRAM {
        for gram in padded.windows(n) {
            // Bare boundary markers carry no signal
            if n == 1 && (gram[0] == '^' || gram[0] == '$') {
                continue;
            }
            features.push(format!("g={}", gram.iter().collect::<String>()));
        }
    }
    features.push(format!("is={lower}"));
    features
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn features_cover_grams_and_whole_name() {
        let features = extract_features("Ann");
        assert!(features.contains(&"g=a".to_string()));
        assert!(features.contains(&"g=^a".to_string()));
        assert!(features.contains(&"g=nn$".to_string()));
        assert!(features.contains(&"is=ann".to_string()));
        assert!(!features.contains(&"g=^".to_string()));
        // 3 unigrams + 4 bigrams + 3 trigrams + whole name
        assert_eq!(features.len(), 11);
    }

    #[test]
    fn repeated_grams_are_counted() {
        let vectorizer = NameVectorizer::fit(["Anna"]);
        let vector = vectorizer.transform("Anna");
        let total: u32 = vector.iter().map(|&(_, c)| c).sum();
        // 4 unigrams + 5 bigrams + 4 trigrams + whole name
        assert_eq!(total, 14);
        assert!(vector.iter().any(|&(_, c)| c == 2));
    }

    #[test]
    fn unknown_grams_are_ignored() {
        let vectorizer = NameVectorizer::fit(["Mary"]);
        assert!(vectorizer.transform("Zoe").is_empty());
        assert!(vectorizer.transform("").is_empty());
        assert_eq!(vectorizer.transform("mary"), vectorizer.transform("MARY"));
    }
}
