// Trained word vectors and their vocabulary.

use std::collections::HashMap;

use anyhow::Result;
use ndarray::{Array2, ArrayView1, Axis};

use super::similarity::cosine_similarity;
use super::vocab::Vocabulary;

/// Word -> fixed-length vector. Trained fresh per run; rows follow the
/// vocabulary order (most frequent word first).
#[derive(Debug, Clone)]
pub struct EmbeddingModel {
    index_to_key: Vec<String>,
    key_to_index: HashMap<String, usize>,
    counts: Vec<u64>,
    vectors: Array2<f32>,
}

impl EmbeddingModel {
    pub(crate) fn from_vocabulary(vocab: Vocabulary, vectors: Array2<f32>) -> Self {
        Self {
            index_to_key: vocab.words,
            key_to_index: vocab.index,
            counts: vocab.counts,
            vectors,
        }
    }

    /// Build a model from precomputed vectors, one row per word.
    pub fn from_parts(words: Vec<String>, vectors: Array2<f32>) -> Result<Self> {
        if words.len() != vectors.nrows() {
            anyhow::bail!(
                "{} words but {} vector rows",
                words.len(),
                vectors.nrows()
            );
        }
        let key_to_index = words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.clone(), i))
            .collect();
        Ok(Self {
            counts: vec![0; words.len()],
            index_to_key: words,
            key_to_index,
            vectors,
        })
    }

    pub fn get_index(&self, word: &str) -> Option<usize> {
        self.key_to_index.get(word).copied()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.key_to_index.contains_key(word)
    }

    pub fn get_vector(&self, word: &str) -> Option<ArrayView1<'_, f32>> {
        self.get_index(word).map(|i| self.vectors.row(i))
    }

    /// Training-corpus frequency of `word` (0 for models built from parts).
    pub fn count(&self, word: &str) -> Option<u64> {
        self.get_index(word).map(|i| self.counts[i])
    }

    /// Cosine similarity between two in-vocabulary words.
    pub fn similarity(&self, a: &str, b: &str) -> Option<f32> {
        let va = self.get_vector(a)?;
        let vb = self.get_vector(b)?;
        Some(cosine_similarity(va, vb))
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.index_to_key
    }

    pub fn vectors(&self) -> &Array2<f32> {
        &self.vectors
    }

    pub fn dim(&self) -> usize {
        self.vectors.ncols()
    }

    pub fn len(&self) -> usize {
        self.index_to_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_to_key.is_empty()
    }

    /// Rows scaled to unit length. All-zero rows stay zero.
    pub fn unit_vectors(&self) -> Array2<f32> {
        let mut unit = self.vectors.clone();
        for mut row in unit.axis_iter_mut(Axis(0)) {
            let norm = row.dot(&row).sqrt();
            if norm > f32::EPSILON {
                row /= norm;
            }
        }
        unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn from_parts_checks_shape() {
        let words = vec!["a".to_string(), "b".to_string()];
        assert!(EmbeddingModel::from_parts(words.clone(), array![[1.0, 0.0]]).is_err());

        let model = EmbeddingModel::from_parts(words, array![[1.0, 0.0], [0.0, 2.0]]).unwrap();
        assert_eq!(model.dim(), 2);
        assert_eq!(model.get_index("b"), Some(1));
        assert_eq!(model.get_vector("b").unwrap()[1], 2.0);
        assert!(model.get_vector("c").is_none());
    }

    #[test]
    fn unit_vectors_have_length_one() {
        let model = EmbeddingModel::from_parts(
            vec!["a".to_string(), "zero".to_string()],
            array![[3.0, 4.0], [0.0, 0.0]],
        )
        .unwrap();
        let unit = model.unit_vectors();
        assert!((unit[[0, 0]] - 0.6).abs() < 1e-6);
        assert!((unit[[0, 1]] - 0.8).abs() < 1e-6);
        assert_eq!(unit[[1, 0]], 0.0);
    }
}
