use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::{RankingError, Result};
use crate::model::LinearModel;

/// Per-item reconstruction errors and the reconstructed items, row-aligned with the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    pub scores: Array1<f64>,
    pub reconstructions: Array2<f64>,
}

impl Reconstruction {
    /// Index of the highest score. Ties go to the lowest index and NaN scores are
    /// never selected, so `None` means there is no comparable score at all.
    pub fn argmax(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, &score) in self.scores.iter().enumerate() {
            if score.is_nan() {
                continue;
            }
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((idx, score)),
            }
        }
        best.map(|(idx, _)| idx)
    }
}

/// Scores items by their squared distance to the model's affine subspace.
pub struct ReconstructionScorer {
    parallel_threshold: usize,
}

impl ReconstructionScorer {
    /// Batches with at least `parallel_threshold` rows are scored with rayon.
    pub fn new(parallel_threshold: usize) -> Self {
        Self { parallel_threshold }
    }

    pub fn sequential() -> Self {
        Self::new(usize::MAX)
    }

    pub fn score(&self, items: ArrayView2<f64>, model: &LinearModel) -> Result<Reconstruction> {
        if model.is_empty() {
            return Err(RankingError::EmptyModel);
        }
        if items.ncols() != model.dimension() {
            return Err(RankingError::DimensionMismatch {
                expected: model.dimension(),
                actual: items.ncols(),
            });
        }

        let num_items = items.nrows();
        let dimension = items.ncols();

        // Rows are scored independently and collected in input order, so the
        // parallel and sequential paths produce identical values.
        let rows: Vec<(f64, Array1<f64>)> = if num_items >= self.parallel_threshold {
            (0..num_items)
                .into_par_iter()
                .map(|idx| Self::score_item(items.row(idx), model))
                .collect()
        } else {
            (0..num_items)
                .map(|idx| Self::score_item(items.row(idx), model))
                .collect()
        };

        let mut scores = Array1::zeros(num_items);
        let mut flattened = Vec::with_capacity(num_items * dimension);
        for (idx, (score, reconstruction)) in rows.into_iter().enumerate() {
            scores[idx] = score;
            flattened.extend(reconstruction.iter());
        }
        let reconstructions = Array2::from_shape_vec((num_items, dimension), flattened)?;

        Ok(Reconstruction {
            scores,
            reconstructions,
        })
    }

    fn score_item(item: ArrayView1<f64>, model: &LinearModel) -> (f64, Array1<f64>) {
        let projection = model.basis.t().dot(&(&item - &model.mean));
        let reconstruction = model.basis.dot(&projection) + &model.mean;
        let score = (&item - &reconstruction).mapv(|x| x * x).sum();
        (score, reconstruction)
    }
}

impl Default for ReconstructionScorer {
    fn default() -> Self {
        Self::sequential()
    }
}
