use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Ranking algorithms known to the pipeline. Names are the ones used in
/// configuration files, e.g. `demud` or `random`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlgorithmType {
    #[default]
    Demud,
    Random,
}

impl AlgorithmType {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}
