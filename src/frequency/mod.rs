// Frequency analysis: per-year lexicon counters and the man/woman ratio.

pub mod counter;
pub mod ratio;
