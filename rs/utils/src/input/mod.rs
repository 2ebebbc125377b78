pub mod csv;

use anyhow::Result;
use ndarray::Array2;

/// Feature vectors with their ids, fully loaded into memory.
#[derive(Debug)]
pub struct Dataset {
    pub ids: Vec<String>,
    /// One item per row.
    pub features: Array2<f64>,
}

impl Dataset {
    pub fn num_rows(&self) -> usize {
        self.features.nrows()
    }

    pub fn dimension(&self) -> usize {
        self.features.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.features.nrows() == 0
    }
}

pub trait Input {
    // Read every row. Ranking never starts on partially loaded data.
    fn read_all(&mut self) -> Result<Dataset>;
}
