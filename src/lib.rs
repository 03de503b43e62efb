// Gendertrend: gendered-language trends across a dated document corpus
//
// This is the library root. Each module corresponds to one stage or
// collaborator of the analysis pipeline.

pub mod config;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod frequency;
pub mod lexicon;
pub mod names;
pub mod output;
pub mod pipeline;
pub mod text;
