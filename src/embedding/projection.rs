// Two-dimensional PCA projection of the embedding space.
//
// The plotting side only needs an (x, y) per word, so we compute the top two
// principal axes of the covariance matrix by power iteration with deflation
// rather than a full eigendecomposition. The start vector is fixed and each
// axis is sign-normalised (largest loading positive), so the projection is
// reproducible for a given model.

use std::collections::HashMap;

use ndarray::{Array1, Array2, Axis};
use serde::Serialize;

use super::model::EmbeddingModel;
use super::similarity::SimilarityTable;

const MAX_ITERATIONS: usize = 1000;
const TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedPoint {
    pub word: String,
    pub x: f64,
    pub y: f64,
}

/// A query word's point next to its closest neighbour's point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPair {
    pub word: ProjectedPoint,
    pub neighbor: ProjectedPoint,
}

/// Every vocabulary word projected onto the first two principal components,
/// in vocabulary order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Projection {
    pub points: Vec<ProjectedPoint>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Projection {
    pub fn point(&self, word: &str) -> Option<&ProjectedPoint> {
        self.index.get(word).map(|&i| &self.points[i])
    }

    /// Pairs for a "word vs. most similar" scatter plot: each query in the
    /// table with its first neighbour. Queries without neighbours are skipped.
    pub fn scatter(&self, table: &SimilarityTable) -> Vec<ScatterPair> {
        table
            .iter()
            .filter_map(|(query, neighbors)| {
                let first = neighbors.first()?;
                Some(ScatterPair {
                    word: self.point(query)?.clone(),
                    neighbor: self.point(&first.word)?.clone(),
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

pub fn project(model: &EmbeddingModel) -> Projection {
    if model.is_empty() {
        return Projection::default();
    }

    let data = model.vectors().mapv(f64::from);
    let coords = pca(&data, 2);

    let points: Vec<ProjectedPoint> = model
        .vocabulary()
        .iter()
        .enumerate()
        .map(|(i, word)| ProjectedPoint {
            word: word.clone(),
            x: coords[[i, 0]],
            y: coords[[i, 1]],
        })
        .collect();
    let index = points
        .iter()
        .enumerate()
        .map(|(i, p)| (p.word.clone(), i))
        .collect();

    Projection { points, index }
}

/// Project rows of `data` onto its top `components` principal axes.
/// Axes that do not exist (rank-deficient data) project to 0.
fn pca(data: &Array2<f64>, components: usize) -> Array2<f64> {
    let n = data.nrows();
    let mut coords = Array2::zeros((n, components));
    let Some(mean) = data.mean_axis(Axis(0)) else {
        return coords;
    };

    let centered = data - &mean;
    let mut cov = centered.t().dot(&centered) / (n.saturating_sub(1).max(1)) as f64;

    for c in 0..components {
        let Some(axis) = leading_eigenvector(&cov) else {
            break;
        };
        let eigenvalue = axis.dot(&cov.dot(&axis));
        coords.column_mut(c).assign(&centered.dot(&axis));

        let column = axis.view().insert_axis(Axis(1));
        cov = cov - column.dot(&column.t()) * eigenvalue;
    }

    coords
}

fn leading_eigenvector(matrix: &Array2<f64>) -> Option<Array1<f64>> {
    let d = matrix.nrows();
    if d == 0 {
        return None;
    }

    let mut v = Array1::from_shape_fn(d, |i| 1.0 + i as f64 / d as f64);
    let start_norm = v.dot(&v).sqrt();
    v /= start_norm;

    for _ in 0..MAX_ITERATIONS {
        let mut next = matrix.dot(&v);
        let norm = next.dot(&next).sqrt();
        if norm < TOLERANCE {
            return None;
        }
        next /= norm;
        let delta = (&next - &v).mapv(f64::abs).sum();
        v = next;
        if delta < TOLERANCE {
            break;
        }
    }

    let pivot = v
        .iter()
        .copied()
        .fold(0.0_f64, |best, x| if x.abs() > best.abs() { x } else { best });
    if pivot < 0.0 {
        v.mapv_inplace(|x| -x);
    }
    Some(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn model(rows: Array2<f32>) -> EmbeddingModel {
        let words = (0..rows.nrows()).map(|i| format!("w{i}")).collect();
        EmbeddingModel::from_parts(words, rows).unwrap()
    }

    #[test]
    fn collinear_points_lie_on_first_axis() {
        let projection = project(&model(array![
            [1.0, 2.0, 3.0],
            [2.0, 4.0, 6.0],
            [3.0, 6.0, 9.0],
        ]));
        assert_eq!(projection.len(), 3);
        for p in &projection.points {
            assert!(p.y.abs() < 1e-6, "y should vanish, got {}", p.y);
        }
        let xs: Vec<f64> = projection.points.iter().map(|p| p.x).collect();
        assert!(xs[0] < xs[1] && xs[1] < xs[2]);
        assert!(xs.iter().sum::<f64>().abs() < 1e-9);
    }

    #[test]
    fn projection_is_centered_and_spread_on_two_axes() {
        let projection = project(&model(array![
            [4.0, 0.0],
            [-4.0, 0.0],
            [0.0, 1.0],
            [0.0, -1.0],
        ]));
        let p0 = projection.point("w0").unwrap();
        let p2 = projection.point("w2").unwrap();
        assert!((p0.x.abs() - 4.0).abs() < 1e-6);
        assert!(p0.y.abs() < 1e-6);
        assert!((p2.y.abs() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn single_word_projects_to_origin() {
        let projection = project(&model(array![[0.3, -0.2]]));
        assert_eq!(projection.points[0].x, 0.0);
        assert_eq!(projection.points[0].y, 0.0);
    }

    #[test]
    fn scatter_pairs_word_with_first_neighbor() {
        let m = model(array![[1.0, 0.0], [0.9, 0.2], [-1.0, 0.5]]);
        let table = crate::embedding::similarity::most_similar(&m, ["w0", "missing"], 2);
        let pairs = project(&m).scatter(&table);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].word.word, "w0");
        assert_eq!(pairs[0].neighbor.word, "w1");
    }
}
