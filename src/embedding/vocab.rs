// Training vocabulary.
//
// Words are ordered by descending corpus frequency; ties keep the order in
// which the words first appeared. Words below `min_count` are left out.

use std::collections::HashMap;

use indexmap::IndexMap;

#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    pub(crate) words: Vec<String>,
    pub(crate) counts: Vec<u64>,
    pub(crate) index: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn build(sentences: &[Vec<String>], min_count: usize) -> Self {
        let mut seen: IndexMap<&str, u64> = IndexMap::new();
        for sentence in sentences {
            for word in sentence {
                *seen.entry(word.as_str()).or_insert(0) += 1;
            }
        }

        let mut kept: Vec<(&str, u64)> = seen
            .into_iter()
            .filter(|&(_, c)| c >= min_count as u64)
            .collect();
        // Stable sort: equal counts stay in first-seen order
        kept.sort_by(|a, b| b.1.cmp(&a.1));

        let words: Vec<String> = kept.iter().map(|(w, _)| w.to_string()).collect();
        let counts = kept.iter().map(|&(_, c)| c).collect();
        let index = words.iter().enumerate().map(|(i, w)| (w.clone(), i)).collect();

        Self { words, counts, index }
    }

    pub fn get_index(&self, word: &str) -> Option<usize> {
        self.index.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Sum of counts of every kept word.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}
