// Skip-gram word2vec with negative sampling.
//
// For every position in a (sub-sampled) sentence, each word inside a randomly
// shrunk window predicts the centre word: the context word's input vector is
// pushed towards the centre word's output vector and away from `negative`
// noise words drawn from the unigram distribution raised to 0.75. The learning
// rate decays linearly from `alpha` to `min_alpha` over all epochs.
//
// Training is single-threaded and every random draw comes from one seeded
// StdRng, so the same sentences and parameters always produce the same model.

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::model::EmbeddingModel;
use super::vocab::Vocabulary;
use crate::error::AnalysisError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkipGramParams {
    /// Dimensionality of the word vectors
    pub vector_size: usize,
    /// Maximum distance between the centre word and a context word
    pub window: usize,
    /// Words occurring fewer times than this are dropped from the vocabulary
    pub min_count: usize,
    /// Noise words drawn per positive pair
    pub negative: usize,
    pub epochs: usize,
    pub alpha: f32,
    pub min_alpha: f32,
    /// Sub-sampling threshold for frequent words (0 disables it)
    pub sample: f64,
    pub seed: u64,
}

impl Default for SkipGramParams {
    fn default() -> Self {
        Self {
            vector_size: 100,
            window: 5,
            min_count: 5,
            negative: 5,
            epochs: 5,
            alpha: 0.025,
            min_alpha: 0.0001,
            sample: 1e-3,
            seed: 1,
        }
    }
}

/// Train a skip-gram model over sentence token sequences.
///
/// Either returns a complete model or fails; there is no partial result.
pub fn train(sentences: &[Vec<String>], params: &SkipGramParams) -> Result<EmbeddingModel, AnalysisError> {
    let vocab = Vocabulary::build(sentences, params.min_count.max(1));
    if vocab.is_empty() {
        return Err(AnalysisError::EmptyVocabulary {
            min_count: params.min_count,
        });
    }

    let encoded: Vec<Vec<usize>> = sentences
        .iter()
        .map(|s| s.iter().filter_map(|w| vocab.get_index(w)).collect())
        .collect();

    info!(
        vocabulary = vocab.len(),
        sentences = sentences.len(),
        words = vocab.total(),
        dim = params.vector_size,
        epochs = params.epochs,
        "Training skip-gram embeddings"
    );

    let mut trainer = Trainer::new(&vocab, params);
    trainer.run(&encoded);

    Ok(EmbeddingModel::from_vocabulary(vocab, trainer.syn0))
}

struct Trainer<'p> {
    params: &'p SkipGramParams,
    rng: StdRng,
    /// Input (word) vectors, the embeddings we keep
    syn0: Array2<f32>,
    /// Output (context) vectors used by negative sampling
    syn1neg: Array2<f32>,
    /// Cumulative count^0.75 weights for drawing noise words
    noise_cdf: Vec<f64>,
    /// Per-word probability of surviving sub-sampling
    keep_prob: Vec<f64>,
    total_words: u64,
}

impl<'p> Trainer<'p> {
    fn new(vocab: &Vocabulary, params: &'p SkipGramParams) -> Self {
        let mut rng = StdRng::seed_from_u64(params.seed);
        let n = vocab.len();
        let dim = params.vector_size;

        let syn0 = Array2::from_shape_fn((n, dim), |_| (rng.random::<f32>() - 0.5) / dim as f32);
        let syn1neg = Array2::zeros((n, dim));

        let mut acc = 0.0;
        let noise_cdf = vocab
            .counts
            .iter()
            .map(|&c| {
                acc += (c as f64).powf(0.75);
                acc
            })
            .collect();

        let total_words = vocab.total();
        let keep_prob = vocab
            .counts
            .iter()
            .map(|&c| keep_probability(c, total_words, params.sample))
            .collect();

        Self {
            params,
            rng,
            syn0,
            syn1neg,
            noise_cdf,
            keep_prob,
            total_words,
        }
    }

    fn run(&mut self, sentences: &[Vec<usize>]) {
        let total_steps = (self.params.epochs as f64 * self.total_words as f64).max(1.0);
        let mut processed = 0u64;
        let mut neu1e = Array1::<f32>::zeros(self.params.vector_size);

        for epoch in 0..self.params.epochs {
            let mut pairs = 0u64;

            for sentence in sentences {
                let alpha = self.learning_rate(processed as f64 / total_steps);
                let kept: Vec<usize> = sentence
                    .iter()
                    .copied()
                    .filter(|&w| {
                        let p = self.keep_prob[w];
                        p >= 1.0 || self.rng.random::<f64>() < p
                    })
                    .collect();

                for (pos, &centre) in kept.iter().enumerate() {
                    if self.params.window == 0 {
                        break;
                    }
                    let shrink = self.rng.random_range(0..self.params.window);
                    let span = self.params.window - shrink;
                    let start = pos.saturating_sub(span);
                    let end = (pos + span + 1).min(kept.len());

                    for (ctx_pos, &context) in kept.iter().enumerate().take(end).skip(start) {
                        if ctx_pos != pos {
                            self.train_pair(context, centre, alpha, &mut neu1e);
                            pairs += 1;
                        }
                    }
                }

                processed += sentence.len() as u64;
            }

            debug!(epoch = epoch + 1, pairs, "Finished epoch");
        }
    }

    fn learning_rate(&self, progress: f64) -> f32 {
        let alpha = self.params.alpha - (self.params.alpha - self.params.min_alpha) * progress as f32;
        alpha.max(self.params.min_alpha)
    }

    fn draw_noise(&mut self) -> usize {
        let total = self.noise_cdf.last().copied().unwrap_or(0.0);
        let r = self.rng.random::<f64>() * total;
        self.noise_cdf
            .partition_point(|&c| c <= r)
            .min(self.noise_cdf.len() - 1)
    }

    /// One positive pair plus its negative samples.
    fn train_pair(&mut self, input: usize, target: usize, alpha: f32, neu1e: &mut Array1<f32>) {
        neu1e.fill(0.0);

        for d in 0..=self.params.negative {
            let (out, label) = if d == 0 {
                (target, 1.0)
            } else {
                let noise = self.draw_noise();
                if noise == target {
                    continue;
                }
                (noise, 0.0)
            };

            let f = self.syn0.row(input).dot(&self.syn1neg.row(out));
            let g = (label - sigmoid(f)) * alpha;
            neu1e.scaled_add(g, &self.syn1neg.row(out));
            self.syn1neg.row_mut(out).scaled_add(g, &self.syn0.row(input));
        }

        let mut row = self.syn0.row_mut(input);
        row += &*neu1e;
    }
}

fn keep_probability(count: u64, total: u64, sample: f64) -> f64 {
    if sample <= 0.0 || count == 0 {
        return 1.0;
    }
    let threshold = sample * total as f64;
    let c = count as f64;
    (((c / threshold).sqrt() + 1.0) * threshold / c).min(1.0)
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<Vec<String>> {
        let raw = [
            "the woman pray in the church",
            "the girl pray with her mother",
            "the man work in the field",
            "the boy work with his father",
        ];
        (0..20)
            .flat_map(|_| raw.iter())
            .map(|s| s.split_whitespace().map(String::from).collect())
            .collect()
    }

    fn small_params() -> SkipGramParams {
        SkipGramParams {
            vector_size: 16,
            min_count: 1,
            epochs: 3,
            ..SkipGramParams::default()
        }
    }

    #[test]
    fn vocabulary_covers_corpus() {
        let model = train(&corpus(), &small_params()).unwrap();
        assert_eq!(model.vocabulary()[0], "the");
        assert!(model.contains("mother"));
        assert_eq!(model.dim(), 16);
        assert!(model.vectors().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn same_seed_same_vectors() {
        let a = train(&corpus(), &small_params()).unwrap();
        let b = train(&corpus(), &small_params()).unwrap();
        assert_eq!(a.vectors(), b.vectors());
    }

    #[test]
    fn different_seed_different_vectors() {
        let a = train(&corpus(), &small_params()).unwrap();
        let b = train(
            &corpus(),
            &SkipGramParams {
                seed: 7,
                ..small_params()
            },
        )
        .unwrap();
        assert_ne!(a.vectors(), b.vectors());
    }

    #[test]
    fn empty_vocabulary_is_an_error() {
        let sentences = vec![vec!["rare".to_string()]];
        let err = train(&sentences, &SkipGramParams::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyVocabulary { min_count: 5 }));
    }

    #[test]
    fn keep_probability_bounds() {
        assert_eq!(keep_probability(10, 100, 0.0), 1.0);
        let frequent = keep_probability(1_000_000, 1_000_000, 1e-3);
        assert!(frequent > 0.0 && frequent < 1.0);
        assert_eq!(keep_probability(1, 1_000_000, 1e-3), 1.0);
    }
}
