// Nearest-neighbour lookup over trained word vectors.
//
// Vectors are normalised once, so each query is a single matrix-vector
// product. Words missing from the vocabulary are common (rare seed words,
// names that never reach min_count) and are skipped rather than reported as
// errors: they simply do not appear in the resulting table.

use indexmap::IndexMap;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::model::EmbeddingModel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub word: String,
    pub similarity: f32,
}

/// Query word -> up to k neighbours, most similar first. Queries keep the
/// order they were asked in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimilarityTable {
    entries: IndexMap<String, Vec<Neighbor>>,
}

impl SimilarityTable {
    pub fn get(&self, word: &str) -> Option<&[Neighbor]> {
        self.entries.get(word).map(Vec::as_slice)
    }

    /// Just the neighbour words for `word`.
    pub fn words(&self, word: &str) -> Option<Vec<&str>> {
        self.get(word)
            .map(|neighbors| neighbors.iter().map(|n| n.word.as_str()).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Neighbor])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The `k` most cosine-similar vocabulary words for each in-vocabulary query.
///
/// The query itself is never among its neighbours. Equal similarities are
/// ordered by vocabulary index (more frequent words first).
pub fn most_similar<'a, I>(model: &EmbeddingModel, queries: I, k: usize) -> SimilarityTable
where
    I: IntoIterator<Item = &'a str>,
{
    let unit = model.unit_vectors();
    let vocabulary = model.vocabulary();
    let mut table = SimilarityTable::default();

    for query in queries {
        let Some(idx) = model.get_index(query) else {
            debug!(word = query, "Not in embedding vocabulary, skipping");
            continue;
        };

        let scores = unit.dot(&unit.row(idx));
        let mut ranked: Vec<(usize, f32)> = scores
            .iter()
            .copied()
            .enumerate()
            .filter(|&(i, _)| i != idx)
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        let neighbors = ranked
            .into_iter()
            .take(k)
            .map(|(i, similarity)| Neighbor {
                word: vocabulary[i].clone(),
                similarity,
            })
            .collect();

        table.entries.insert(query.to_string(), neighbors);
    }

    table
}

/// Cosine similarity between two vectors.
///
/// Returns a value in [-1, 1]; mismatched lengths, empty vectors and zero
/// vectors all give 0.0.
pub fn cosine_similarity(a: ArrayView1<'_, f32>, b: ArrayView1<'_, f32>) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot = a.dot(&b);
    let mag_a = a.dot(&a).sqrt();
    let mag_b = b.dot(&b).sqrt();

    let denom = mag_a * mag_b;
    if denom < f32::EPSILON {
        0.0
    } else {
        (dot / denom).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    fn model() -> EmbeddingModel {
        EmbeddingModel::from_parts(
            ["woman", "lady", "girl", "stone"].iter().map(|s| s.to_string()).collect(),
            array![[1.0, 0.0], [0.9, 0.1], [0.7, 0.3], [-1.0, 0.0]],
        )
        .unwrap()
    }

    #[test]
    fn ranks_by_descending_similarity() {
        let table = most_similar(&model(), ["woman"], 3);
        assert_eq!(table.words("woman").unwrap(), vec!["lady", "girl", "stone"]);
    }

    #[test]
    fn never_returns_query_or_more_than_k() {
        let table = most_similar(&model(), ["lady", "girl"], 2);
        for (query, neighbors) in table.iter() {
            assert!(neighbors.len() <= 2);
            assert!(neighbors.iter().all(|n| n.word != query));
        }
    }

    #[test]
    fn unknown_words_are_omitted() {
        let table = most_similar(&model(), ["woman", "mrs"], 1);
        assert!(table.contains("woman"));
        assert!(!table.contains("mrs"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn k_zero_gives_empty_lists() {
        let table = most_similar(&model(), ["woman"], 0);
        assert!(table.get("woman").unwrap().is_empty());
    }

    #[test]
    fn cosine_identical_and_opposite() {
        let a = array![1.0_f32, 2.0, 3.0];
        let b = array![2.0_f32, 4.0, 6.0];
        assert!((cosine_similarity(a.view(), b.view()) - 1.0).abs() < 1e-6);

        let c = array![-1.0_f32, -2.0, -3.0];
        assert!((cosine_similarity(a.view(), c.view()) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_degenerate_inputs_are_zero() {
        let empty: Array1<f32> = Array1::zeros(0);
        assert_eq!(cosine_similarity(empty.view(), empty.view()), 0.0);

        let zero = array![0.0_f32, 0.0];
        let one = array![1.0_f32, 0.0];
        assert_eq!(cosine_similarity(zero.view(), one.view()), 0.0);

        let three = array![1.0_f32, 0.0, 0.0];
        assert_eq!(cosine_similarity(one.view(), three.view()), 0.0);
    }
}
