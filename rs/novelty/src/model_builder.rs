use log::debug;
use ndarray::{s, Array1, Array2, ArrayView2, Axis};
use ndarray_linalg::{JobSvd, SVDDC};

use crate::error::{RankingError, Result};
use crate::model::LinearModel;

/// Builds a rank-`k` [`LinearModel`] from a batch of items (one item per row).
///
/// Every call recomputes the model from the whole batch with a thin SVD of the
/// mean-centered data. There is no rank-1 incremental update; callers pass all
/// items absorbed so far.
pub struct LinearModelBuilder {
    k: usize,
}

impl LinearModelBuilder {
    /// `k` is not validated here: the ranking entry points reject `k == 0`
    /// before building anything.
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn update(&self, batch: ArrayView2<f64>, current: &LinearModel) -> Result<LinearModel> {
        if batch.nrows() == 0 {
            return Err(RankingError::EmptyBatch);
        }
        if batch.ncols() == 0 {
            return Err(RankingError::InvalidParameter(
                "Items must have at least one feature".to_string(),
            ));
        }

        // A single point has no direction of variance. Seed the model with the
        // first standard basis vector so that any other point still scores > 0.
        if current.is_empty() && batch.nrows() == 1 {
            let dimension = batch.ncols();
            let mut basis = Array2::zeros((dimension, 1));
            basis[[0, 0]] = 1.0;
            return Ok(LinearModel {
                basis,
                mean: batch.row(0).to_owned(),
                singular_values: Array1::zeros(1),
                count: 1,
            });
        }

        let mean = batch.mean_axis(Axis(0)).ok_or(RankingError::EmptyBatch)?;
        let centered = &batch - &mean;

        // Decompose the d x n matrix so that the left singular vectors live in feature space.
        // Thin decomposition: `u` is d x min(d, n).
        let centered_t = centered.t().as_standard_layout().into_owned();
        let (u, sigma, _) = centered_t.svddc(JobSvd::Some)?;
        let u = u.ok_or(RankingError::MissingSingularVectors)?;

        let rank = self.k.min(sigma.len());
        if rank < self.k {
            debug!(
                "Batch of {} items supports only {} of {} requested components",
                batch.nrows(),
                rank,
                self.k
            );
        }

        Ok(LinearModel {
            basis: u.slice(s![.., ..rank]).to_owned(),
            mean,
            singular_values: sigma.slice(s![..rank]).to_owned(),
            count: batch.nrows(),
        })
    }
}
