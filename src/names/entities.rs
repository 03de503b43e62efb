// Person-name candidates from raw document text.

use std::collections::BTreeSet;

use crate::corpus::models::Document;
use crate::text::traits::{EntityLabel, LanguageAnalyzer};

/// Every distinct PERSON entity the analyzer finds across `documents`.
pub fn extract_person_names(analyzer: &dyn LanguageAnalyzer, documents: &[Document]) -> BTreeSet<String> {
    documents
        .iter()
        .flat_map(|doc| analyzer.analyze(&doc.text).entities)
        .filter(|entity| entity.label == EntityLabel::Person)
        .map(|entity| entity.text)
        .collect()
}

/// Reduce each name to its first whitespace-delimited token, taken to be the
/// given name. Order is preserved; names with no token are dropped.
pub fn reduce_to_first_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .filter_map(|name| name.as_ref().split_whitespace().next().map(String::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::lemmatizer::RuleBasedAnalyzer;

    fn doc(id: &str, text: &str) -> Document {
        Document {
            id: id.to_string(),
            text: text.to_string(),
            author_label: "Francis".to_string(),
            year: 2015,
        }
    }

    #[test]
    fn multi_word_names_keep_first_token() {
        assert_eq!(reduce_to_first_names(["Mary Smith", "John"]), vec!["Mary", "John"]);
    }

    #[test]
    fn blank_names_are_dropped() {
        assert_eq!(reduce_to_first_names(["  ", "Anne  Marie "]), vec!["Anne"]);
    }

    #[test]
    fn persons_are_deduplicated_across_documents() {
        let analyzer = RuleBasedAnalyzer::default();
        let docs = [
            doc("a", "We remember Mrs. Teresa Bojaxhiu today."),
            doc("b", "The example of Mrs. Teresa Bojaxhiu and Mr. Paul moves us."),
        ];
        let names = extract_person_names(&analyzer, &docs);
        assert_eq!(
            names.into_iter().collect::<Vec<_>>(),
            vec!["Paul".to_string(), "Teresa Bojaxhiu".to_string()]
        );
    }
}
