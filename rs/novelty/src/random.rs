use config::ranking::RandomConfig;
use log::info;
use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{RankingError, Result};
use crate::result::{RankingResult, Selection};

pub const ALGORITHM_NAME: &str = "random";

/// Baseline that ranks items in a seeded random order. Every score is 0.
pub struct RandomRanker {
    config: RandomConfig,
}

impl RandomRanker {
    pub fn new(config: RandomConfig) -> Self {
        Self { config }
    }

    pub fn seed(&self) -> u64 {
        self.config.seed
    }

    pub fn rank(
        &self,
        score: ArrayView2<f64>,
        ids: &[String],
        budget: Option<usize>,
    ) -> Result<RankingResult> {
        let num_items = score.nrows();
        if ids.len() != num_items {
            return Err(RankingError::InvalidParameter(format!(
                "Got {} ids for {} items",
                ids.len(),
                num_items
            )));
        }
        let budget = budget.unwrap_or(num_items);
        if budget > num_items {
            return Err(RankingError::InvalidParameter(format!(
                "Cannot select {} items from a pool of {}",
                budget, num_items
            )));
        }

        info!(
            "Ranking {} items randomly (seed = {}, budget = {})",
            num_items, self.config.seed, budget
        );

        let mut indices: Vec<usize> = (0..num_items).collect();
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        indices.shuffle(&mut rng);

        let selections = indices
            .into_iter()
            .take(budget)
            .enumerate()
            .map(|(rank, index)| Selection {
                rank,
                index,
                id: ids[index].clone(),
                score: 0.0,
            })
            .collect();
        Ok(RankingResult::new(ALGORITHM_NAME, selections))
    }
}

#[cfg(test)]
mod tests {
    use ndarray::Array2;

    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| i.to_string()).collect()
    }

    #[test]
    fn test_random_rank_is_seeded() {
        let data = Array2::<f64>::zeros((50, 2));
        let ranker = RandomRanker::new(RandomConfig { seed: 7 });
        let first = ranker.rank(data.view(), &ids(50), None).unwrap();
        let second = ranker.rank(data.view(), &ids(50), None).unwrap();
        assert_eq!(first, second);

        let other = RandomRanker::new(RandomConfig { seed: 8 })
            .rank(data.view(), &ids(50), None)
            .unwrap();
        assert_ne!(first.indices(), other.indices());
    }

    #[test]
    fn test_random_rank_is_a_permutation() {
        let data = Array2::<f64>::zeros((20, 2));
        let result = RandomRanker::new(RandomConfig::default())
            .rank(data.view(), &ids(20), None)
            .unwrap();

        let mut indices = result.indices();
        indices.sort();
        assert_eq!(indices, (0..20).collect::<Vec<_>>());
        assert!(result.scores().iter().all(|s| *s == 0.0));
        for selection in &result.selections {
            assert_eq!(selection.id, selection.index.to_string());
        }
    }

    #[test]
    fn test_random_rank_budget() {
        let data = Array2::<f64>::zeros((10, 2));
        let ranker = RandomRanker::new(RandomConfig { seed: 1 });
        let full = ranker.rank(data.view(), &ids(10), None).unwrap();
        let top = ranker.rank(data.view(), &ids(10), Some(3)).unwrap();
        assert_eq!(top.selections[..], full.selections[..3]);

        let result = ranker.rank(data.view(), &ids(10), Some(11));
        assert!(matches!(result, Err(RankingError::InvalidParameter(_))));
    }
}
