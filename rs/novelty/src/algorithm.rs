use std::str::FromStr;

use config::enums::AlgorithmType;
use config::ranking::{AlgorithmConfig, RankingConfig};
use ndarray::ArrayView2;

use crate::demud::DemudRanker;
use crate::error::{RankingError, Result};
use crate::random::RandomRanker;
use crate::result::RankingResult;

pub trait Ranker {
    fn name(&self) -> &'static str;

    /// Ranks `score` (one item per row, `ids` row-aligned) and returns at most
    /// `budget` selections, all of them when `budget` is `None`.
    fn rank(
        &self,
        fit: Option<ArrayView2<f64>>,
        score: ArrayView2<f64>,
        ids: &[String],
        budget: Option<usize>,
    ) -> Result<RankingResult>;
}

impl Ranker for DemudRanker {
    fn name(&self) -> &'static str {
        AlgorithmType::Demud.name()
    }

    fn rank(
        &self,
        fit: Option<ArrayView2<f64>>,
        score: ArrayView2<f64>,
        ids: &[String],
        budget: Option<usize>,
    ) -> Result<RankingResult> {
        DemudRanker::rank(self, fit, score, ids, budget)
    }
}

impl Ranker for RandomRanker {
    fn name(&self) -> &'static str {
        AlgorithmType::Random.name()
    }

    /// Reference items play no role in a random order.
    fn rank(
        &self,
        _fit: Option<ArrayView2<f64>>,
        score: ArrayView2<f64>,
        ids: &[String],
        budget: Option<usize>,
    ) -> Result<RankingResult> {
        RandomRanker::rank(self, score, ids, budget)
    }
}

pub enum RankingAlgorithm {
    Demud(DemudRanker),
    Random(RandomRanker),
}

impl RankingAlgorithm {
    pub fn from_config(config: &AlgorithmConfig) -> Self {
        match config {
            AlgorithmConfig::Demud(demud) => RankingAlgorithm::Demud(DemudRanker::new(demud.clone())),
            AlgorithmConfig::Random(random) => {
                RankingAlgorithm::Random(RandomRanker::new(random.clone()))
            }
        }
    }

    /// Looks up an algorithm by its configuration name, with default parameters.
    pub fn from_name(name: &str) -> Result<Self> {
        let algorithm_type = AlgorithmType::from_str(name).map_err(|_| {
            RankingError::InvalidParameter(format!("Unknown ranking algorithm: {}", name))
        })?;
        Ok(Self::from_config(&AlgorithmConfig::default_for(algorithm_type)))
    }

    pub fn algorithm_type(&self) -> AlgorithmType {
        match self {
            RankingAlgorithm::Demud(_) => AlgorithmType::Demud,
            RankingAlgorithm::Random(_) => AlgorithmType::Random,
        }
    }

    fn ranker(&self) -> &dyn Ranker {
        match self {
            RankingAlgorithm::Demud(ranker) => ranker,
            RankingAlgorithm::Random(ranker) => ranker,
        }
    }
}

impl Ranker for RankingAlgorithm {
    fn name(&self) -> &'static str {
        self.ranker().name()
    }

    fn rank(
        &self,
        fit: Option<ArrayView2<f64>>,
        score: ArrayView2<f64>,
        ids: &[String],
        budget: Option<usize>,
    ) -> Result<RankingResult> {
        self.ranker().rank(fit, score, ids, budget)
    }
}

/// Algorithms of one run, built once from the config and then only read.
pub struct AlgorithmRegistry {
    algorithms: Vec<RankingAlgorithm>,
}

impl AlgorithmRegistry {
    pub fn new(algorithms: Vec<RankingAlgorithm>) -> Self {
        Self { algorithms }
    }

    pub fn from_config(config: &RankingConfig) -> Self {
        Self::new(
            config
                .algorithms
                .iter()
                .map(RankingAlgorithm::from_config)
                .collect(),
        )
    }

    pub fn get(&self, algorithm_type: AlgorithmType) -> Option<&RankingAlgorithm> {
        self.algorithms
            .iter()
            .find(|algorithm| algorithm.algorithm_type() == algorithm_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankingAlgorithm> {
        self.algorithms.iter()
    }

    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use config::ranking::{DemudConfig, RandomConfig};
    use ndarray::array;

    use super::*;

    #[test]
    fn test_from_name() {
        let demud = RankingAlgorithm::from_name("demud").unwrap();
        assert_eq!(demud.algorithm_type(), AlgorithmType::Demud);
        assert_eq!(demud.name(), "demud");

        let random = RankingAlgorithm::from_name("random").unwrap();
        assert_eq!(random.algorithm_type(), AlgorithmType::Random);
        assert_eq!(random.name(), "random");

        assert!(matches!(
            RankingAlgorithm::from_name("iforest"),
            Err(RankingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_registry_from_config() {
        let config = RankingConfig {
            algorithms: vec![
                AlgorithmConfig::Demud(DemudConfig {
                    k: 1,
                    ..DemudConfig::default()
                }),
                AlgorithmConfig::Random(RandomConfig { seed: 3 }),
            ],
            ..RankingConfig::default()
        };
        let registry = AlgorithmRegistry::from_config(&config);
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());

        let names: Vec<&str> = registry.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["demud", "random"]);

        match registry.get(AlgorithmType::Demud) {
            Some(RankingAlgorithm::Demud(ranker)) => assert_eq!(ranker.config().k, 1),
            _ => panic!("DEMUD should be registered"),
        }
        match registry.get(AlgorithmType::Random) {
            Some(RankingAlgorithm::Random(ranker)) => assert_eq!(ranker.seed(), 3),
            _ => panic!("Random should be registered"),
        }
    }

    #[test]
    fn test_dispatch_through_registry() {
        let data = array![[0.0, 0.0], [-1.0, 1.0]];
        let fit = array![[1.0, 1.0], [-1.0, -1.0]];
        let ids = vec!["a".to_string(), "b".to_string()];

        let registry = AlgorithmRegistry::new(vec![
            RankingAlgorithm::Demud(DemudRanker::new(DemudConfig {
                k: 1,
                ..DemudConfig::default()
            })),
            RankingAlgorithm::from_name("random").unwrap(),
        ]);

        for algorithm in registry.iter() {
            let result = algorithm
                .rank(Some(fit.view()), data.view(), &ids, None)
                .unwrap();
            assert_eq!(result.algorithm, algorithm.name());
            assert_eq!(result.len(), 2);
        }

        let demud = registry
            .get(AlgorithmType::Demud)
            .unwrap()
            .rank(Some(fit.view()), data.view(), &ids, None)
            .unwrap();
        assert_eq!(demud.ids(), vec!["b", "a"]);
    }
}
