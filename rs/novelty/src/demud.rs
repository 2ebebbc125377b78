//! DEMUD: discovery via eigenbasis modeling of uninteresting data.
//!
//! Items are selected one at a time. Each round scores the remaining pool by
//! reconstruction error against a low-rank model of everything seen so far,
//! picks the worst-explained item, and refits the model with that item added.

use std::sync::atomic::{AtomicBool, Ordering};

use config::ranking::DemudConfig;
use log::{debug, info, warn};
use ndarray::{concatenate, Array2, ArrayView2, Axis};

use crate::error::{RankingError, Result};
use crate::model::LinearModel;
use crate::model_builder::LinearModelBuilder;
use crate::result::{RankingResult, Selection};
use crate::scorer::ReconstructionScorer;

pub const ALGORITHM_NAME: &str = "demud";

/// Every selection refits the model with a full SVD, so long rankings get expensive.
const LARGE_BUDGET_WARNING: usize = 1000;

/// Outcome of one selection round.
#[derive(Debug, Clone, PartialEq)]
pub struct DemudStep {
    pub iteration: usize,
    /// Row of the selected item in the original score pool.
    pub index: usize,
    pub score: f64,
}

pub struct DemudRanker {
    config: DemudConfig,
}

impl DemudRanker {
    pub fn new(config: DemudConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DemudConfig {
        &self.config
    }

    /// Validates the inputs and builds the initial model.
    ///
    /// Without `fit` items the initial model is fitted on the score pool itself,
    /// which changes the first selections compared to ranking against a reference set.
    pub fn session(
        &self,
        fit: Option<ArrayView2<f64>>,
        score: ArrayView2<f64>,
        budget: Option<usize>,
    ) -> Result<DemudSession> {
        if self.config.k < 1 {
            return Err(RankingError::InvalidParameter(format!(
                "The number of principal components (k) must be >= 1, got {}",
                self.config.k
            )));
        }

        let num_items = score.nrows();
        let budget = budget.unwrap_or(num_items);
        if budget > num_items {
            return Err(RankingError::InvalidParameter(format!(
                "Cannot select {} items from a pool of {}",
                budget, num_items
            )));
        }

        let dimension = score.ncols();
        let fit = fit.filter(|f| f.nrows() > 0);
        if let Some(fit) = &fit {
            if fit.ncols() != dimension {
                return Err(RankingError::DimensionMismatch {
                    expected: dimension,
                    actual: fit.ncols(),
                });
            }
        }
        if dimension == 0 && (num_items > 0 || fit.is_some()) {
            return Err(RankingError::InvalidParameter(
                "Items must have at least one feature".to_string(),
            ));
        }
        if !score.iter().all(|x| x.is_finite())
            || fit.map_or(false, |f| !f.iter().all(|x| x.is_finite()))
        {
            return Err(RankingError::InvalidParameter(
                "Feature values must be finite".to_string(),
            ));
        }

        if budget > LARGE_BUDGET_WARNING {
            warn!(
                "DEMUD refits the model after each of {} selections, this may take a while",
                budget
            );
        }

        let builder = LinearModelBuilder::new(self.config.k);
        let (model, seen) = match fit {
            Some(fit) => (
                builder.update(fit, &LinearModel::empty())?,
                fit.to_owned(),
            ),
            None if num_items > 0 => (
                builder.update(score, &LinearModel::empty())?,
                Array2::zeros((0, dimension)),
            ),
            None => (LinearModel::empty(), Array2::zeros((0, dimension))),
        };

        Ok(DemudSession {
            builder,
            scorer: ReconstructionScorer::new(self.config.parallel_scoring_threshold),
            model,
            pool: score.to_owned(),
            pool_indices: (0..num_items).collect(),
            seen,
            budget,
            iteration: 0,
        })
    }

    pub fn rank(
        &self,
        fit: Option<ArrayView2<f64>>,
        score: ArrayView2<f64>,
        ids: &[String],
        budget: Option<usize>,
    ) -> Result<RankingResult> {
        self.rank_with_cancellation(fit, score, ids, budget, &AtomicBool::new(false))
    }

    /// Like [`DemudRanker::rank`], but stops with [`RankingError::Cancelled`] once `cancel`
    /// is set. The flag is only checked between selections.
    pub fn rank_with_cancellation(
        &self,
        fit: Option<ArrayView2<f64>>,
        score: ArrayView2<f64>,
        ids: &[String],
        budget: Option<usize>,
        cancel: &AtomicBool,
    ) -> Result<RankingResult> {
        if ids.len() != score.nrows() {
            return Err(RankingError::InvalidParameter(format!(
                "Got {} ids for {} items",
                ids.len(),
                score.nrows()
            )));
        }

        let mut session = self.session(fit, score, budget)?;
        info!(
            "Ranking {} items with DEMUD (k = {}, budget = {}, reference items = {})",
            score.nrows(),
            self.config.k,
            session.budget(),
            session.seen_count()
        );

        let mut selections = Vec::with_capacity(session.budget());
        loop {
            if cancel.load(Ordering::Relaxed) {
                return Err(RankingError::Cancelled);
            }
            let step = match session.step()? {
                Some(step) => step,
                None => break,
            };
            selections.push(Selection {
                rank: step.iteration,
                index: step.index,
                id: ids[step.index].clone(),
                score: step.score,
            });
        }

        Ok(RankingResult::new(ALGORITHM_NAME, selections))
    }
}

/// State of one ranking run: the current model, the items absorbed into it,
/// and the pool of items not selected yet.
pub struct DemudSession {
    builder: LinearModelBuilder,
    scorer: ReconstructionScorer,
    model: LinearModel,
    pool: Array2<f64>,
    pool_indices: Vec<usize>,
    seen: Array2<f64>,
    budget: usize,
    iteration: usize,
}

impl DemudSession {
    pub fn model(&self) -> &LinearModel {
        &self.model
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Original indices of the items still in the pool.
    pub fn remaining_indices(&self) -> &[usize] {
        &self.pool_indices
    }

    pub fn remaining(&self) -> usize {
        self.pool_indices.len()
    }

    /// Number of items the model has absorbed, reference items included.
    pub fn seen_count(&self) -> usize {
        self.seen.nrows()
    }

    pub fn is_done(&self) -> bool {
        self.iteration >= self.budget || self.pool_indices.is_empty()
    }

    /// Selects the next item and folds it into the model. Returns `None` once the
    /// budget is spent. The session is left untouched when an error is returned.
    pub fn step(&mut self) -> Result<Option<DemudStep>> {
        if self.is_done() {
            return Ok(None);
        }

        let reconstruction = self.scorer.score(self.pool.view(), &self.model)?;
        let position = reconstruction
            .argmax()
            .ok_or(RankingError::NonFiniteScores(self.pool_indices.len()))?;
        let score = reconstruction.scores[position];
        let index = self.pool_indices[position];

        let item = self.pool.row(position).insert_axis(Axis(0));
        let seen = concatenate(Axis(0), &[self.seen.view(), item])?;
        let model = self.builder.update(seen.view(), &self.model)?;

        debug!(
            "Iteration {}: selected item {} with score {:.6}, model rank {}",
            self.iteration,
            index,
            score,
            model.rank()
        );

        self.model = model;
        self.seen = seen;
        self.pool.remove_index(Axis(0), position);
        self.pool_indices.remove(position);

        let step = DemudStep {
            iteration: self.iteration,
            index,
            score,
        };
        self.iteration += 1;
        Ok(Some(step))
    }
}

impl Iterator for DemudSession {
    type Item = Result<DemudStep>;

    fn next(&mut self) -> Option<Self::Item> {
        self.step().transpose()
    }
}
