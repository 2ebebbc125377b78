use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::enums::AlgorithmType;

/// Config for the DEMUD ranking algorithm.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DemudConfig {
    /// Number of principal components kept in the model of already-seen items.
    /// Must be at least 1 and should not exceed the number of features.
    /// Default: 2
    pub k: usize,

    /// Pools with at least this many remaining items are scored on the rayon
    /// thread pool. Smaller pools are scored on the calling thread.
    /// Default: 4096
    pub parallel_scoring_threshold: usize,
}

impl Default for DemudConfig {
    fn default() -> Self {
        Self {
            k: 2,
            parallel_scoring_threshold: 4096,
        }
    }
}

/// Config for the random baseline ranking.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct RandomConfig {
    /// Seed for the shuffle. The same seed always yields the same order.
    /// Default: 0
    pub seed: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmConfig {
    Demud(DemudConfig),
    Random(RandomConfig),
}

impl AlgorithmConfig {
    pub fn algorithm_type(&self) -> AlgorithmType {
        match self {
            AlgorithmConfig::Demud(_) => AlgorithmType::Demud,
            AlgorithmConfig::Random(_) => AlgorithmType::Random,
        }
    }

    /// Default config for the given algorithm.
    pub fn default_for(algorithm_type: AlgorithmType) -> Self {
        match algorithm_type {
            AlgorithmType::Demud => AlgorithmConfig::Demud(DemudConfig::default()),
            AlgorithmType::Random => AlgorithmConfig::Random(RandomConfig::default()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory where `selections-<algorithm>.csv` files are written.
    /// Default: "."
    pub output_dir: String,

    /// Whether to write the selections CSV for each algorithm.
    /// Default: true
    pub save_scores_csv: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
            save_scores_csv: true,
        }
    }
}

/// Top level config of a ranking run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RankingConfig {
    /// Algorithms to run, in order. Each one ranks the same score pool independently.
    /// Default: a single DEMUD run with default parameters.
    pub algorithms: Vec<AlgorithmConfig>,

    /// How many items each algorithm should select. `None` ranks the whole pool.
    /// Default: None
    pub top_n: Option<usize>,

    pub output: OutputConfig,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            algorithms: vec![AlgorithmConfig::Demud(DemudConfig::default())],
            top_n: None,
            output: OutputConfig::default(),
        }
    }
}

impl RankingConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: RankingConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&yaml)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Catches configuration mistakes before any data is loaded.
    pub fn validate(&self) -> Result<()> {
        if self.algorithms.is_empty() {
            return Err(anyhow!("At least one ranking algorithm must be configured"));
        }
        for algorithm in &self.algorithms {
            if let AlgorithmConfig::Demud(demud) = algorithm {
                if demud.k < 1 {
                    return Err(anyhow!(
                        "The number of principal components (k) must be >= 1, got {}",
                        demud.k
                    ));
                }
            }
        }
        Ok(())
    }
}
