// Synonym graph trait: swap-ready abstraction over a lexical database.
//
// The expander only ever asks one question: which synonym sets does this word
// belong to, and what are their lemmas in order. A WordNet export, a
// thesaurus table, or a test fixture can all answer it.

/// A synonym set: lemma surface forms in the resource's canonical order.
pub type Synset = Vec<String>;

pub trait SynonymGraph {
    /// Synonym sets containing `word`. An unknown word has none.
    fn synsets(&self, word: &str) -> Vec<Synset>;
}
