// The two normalizer contracts: a flat lemma sequence for counting, and
// sentence-bounded lemma sequences for embedding training.

use super::sentences::split_sentences;
use super::traits::LanguageAnalyzer;

/// Lowercase lemma of every token in `raw_text`, punctuation included.
pub fn normalize(analyzer: &dyn LanguageAnalyzer, raw_text: &str) -> Vec<String> {
    analyzer
        .analyze(raw_text)
        .tokens
        .into_iter()
        .map(|t| t.lemma.to_lowercase())
        .collect()
}

/// Split `raw_text` into sentences and lemmatize each one independently.
///
/// Only purely alphabetic lemmas are kept, since punctuation and numbers only
/// add noise to training contexts. Sentences left empty are dropped.
pub fn sentence_normalize(analyzer: &dyn LanguageAnalyzer, raw_text: &str) -> Vec<Vec<String>> {
    split_sentences(raw_text)
        .into_iter()
        .map(|sentence| {
            analyzer
                .analyze(sentence)
                .tokens
                .into_iter()
                .map(|t| t.lemma.to_lowercase())
                .filter(|lemma| !lemma.is_empty() && lemma.chars().all(char::is_alphabetic))
                .collect::<Vec<_>>()
        })
        .filter(|lemmas| !lemmas.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::lemmatizer::RuleBasedAnalyzer;

    #[test]
    fn normalize_keeps_punctuation_lemmas() {
        let analyzer = RuleBasedAnalyzer::default();
        assert_eq!(
            normalize(&analyzer, "The Women spoke."),
            vec!["the", "woman", "speak", "."]
        );
    }

    #[test]
    fn sentence_initial_plural_is_lemmatized() {
        let analyzer = RuleBasedAnalyzer::default();
        assert_eq!(normalize(&analyzer, "Sisters pray."), vec!["sister", "pray", "."]);
    }

    #[test]
    fn sentence_normalize_preserves_boundaries() {
        let analyzer = RuleBasedAnalyzer::default();
        let sentences = sentence_normalize(&analyzer, "Mothers pray. Fathers work, 24 hours!");
        assert_eq!(
            sentences,
            vec![vec!["mother", "pray"], vec!["father", "work", "hour"]]
        );
    }

    #[test]
    fn punctuation_only_sentences_are_dropped() {
        let analyzer = RuleBasedAnalyzer::default();
        assert!(sentence_normalize(&analyzer, "... !!!").is_empty());
    }
}
