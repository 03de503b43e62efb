// Gendered lexicons: seed vocabulary plus synonym expansion.
//
// A lexicon is a set of lowercase words. It is built once per run (seeds
// unioned with their expansion) and never mutated afterwards; BTreeSet keeps
// iteration deterministic so similarity tables come out in a stable order.

pub mod synonyms;
pub mod traits;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use traits::SynonymGraph;

pub const WOMAN_SEEDS: &[&str] = &[
    "female", "girl", "woman", "she", "sister", "mother", "mrs", "her", "nun", "daughter", "lady",
];

pub const MAN_SEEDS: &[&str] = &[
    "male", "boy", "man", "he", "brother", "father", "mr", "his", "priest", "son",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lexicon(BTreeSet<String>);

impl Lexicon {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(words.into_iter().map(|w| w.as_ref().to_lowercase()).collect())
    }

    /// The seeds together with everything `expand` finds for them.
    pub fn with_expansion(seeds: &Lexicon, graph: &dyn SynonymGraph) -> Self {
        let expanded = expand(graph, seeds);
        Self(seeds.0.union(&expanded.0).cloned().collect())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Lexicon {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The woman- and man-associated lexicons for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenderLexicons {
    pub woman: Lexicon,
    pub man: Lexicon,
}

impl GenderLexicons {
    /// Expand the built-in seed lists through `graph`.
    pub fn build(graph: &dyn SynonymGraph) -> Self {
        let woman = Lexicon::with_expansion(&Lexicon::from_words(WOMAN_SEEDS), graph);
        let man = Lexicon::with_expansion(&Lexicon::from_words(MAN_SEEDS), graph);
        debug!(woman = woman.len(), man = man.len(), "Built gender lexicons");
        Self { woman, man }
    }
}

/// Canonical synonyms of every seed: the lowercased first lemma of each of its
/// synonym sets. Seeds are not included unless a synset's first lemma is one.
pub fn expand(graph: &dyn SynonymGraph, seeds: &Lexicon) -> Lexicon {
    let mut result = BTreeSet::new();
    for seed in seeds {
        for synset in graph.synsets(seed) {
            if let Some(first) = synset.first() {
                result.insert(first.to_lowercase());
            }
        }
    }
    Lexicon(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::synonyms::SynonymTable;

    fn table() -> SynonymTable {
        SynonymTable::from_json(
            r#"{
                "woman": [["woman", "adult_female"], ["Charwoman", "woman"]],
                "girl": [["girl"], ["daughter", "girl"]],
                "daughter": [["daughter", "girl"]]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn expansion_takes_first_lemma_lowercased() {
        let seeds = Lexicon::from_words(["woman"]);
        let expanded = expand(&table(), &seeds);
        assert_eq!(expanded, Lexicon::from_words(["woman", "charwoman"]));
    }

    #[test]
    fn overlapping_synsets_collapse() {
        let seeds = Lexicon::from_words(["girl", "daughter"]);
        let expanded = expand(&table(), &seeds);
        assert_eq!(expanded, Lexicon::from_words(["girl", "daughter"]));
    }

    #[test]
    fn seed_without_synsets_contributes_nothing() {
        let seeds = Lexicon::from_words(["she"]);
        assert!(expand(&table(), &seeds).is_empty());
        assert_eq!(Lexicon::with_expansion(&seeds, &table()), seeds);
    }

    #[test]
    fn builtin_lexicons_contain_seeds() {
        let lexicons = GenderLexicons::build(&SynonymTable::builtin().unwrap());
        for seed in WOMAN_SEEDS {
            assert!(lexicons.woman.contains(seed));
        }
        for seed in MAN_SEEDS {
            assert!(lexicons.man.contains(seed));
        }
        assert!(lexicons.man.contains("helium"));
    }
}
