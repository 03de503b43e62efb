// Text layer: tokenization, lemmatization, sentence splitting and the
// normalizer contracts built on top of the LanguageAnalyzer capability.

pub mod lemmatizer;
pub mod normalize;
pub mod sentences;
pub mod tokenizer;
pub mod traits;
