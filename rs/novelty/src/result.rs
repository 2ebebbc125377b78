use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

/// One selected item.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Position in selection order, 0 is the most novel item.
    pub rank: usize,
    /// Row of the item in the original score pool.
    pub index: usize,
    pub id: String,
    pub score: f64,
}

/// Output of a ranking algorithm, in selection order.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingResult {
    pub algorithm: String,
    pub selections: Vec<Selection>,
}

impl RankingResult {
    pub fn new(algorithm: &str, selections: Vec<Selection>) -> Self {
        Self {
            algorithm: algorithm.to_string(),
            selections,
        }
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.selections.iter().map(|s| s.id.as_str()).collect()
    }

    pub fn indices(&self) -> Vec<usize> {
        self.selections.iter().map(|s| s.index).collect()
    }

    pub fn scores(&self) -> Vec<f64> {
        self.selections.iter().map(|s| s.score).collect()
    }
}

/// Writes `selections-<algorithm>.csv` with columns `rank, index, id, score`.
pub struct SelectionsCsvWriter {
    output_dir: PathBuf,
}

impl SelectionsCsvWriter {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn output_path(&self, algorithm: &str) -> PathBuf {
        self.output_dir.join(format!("selections-{}.csv", algorithm))
    }

    /// Returns the path of the written file.
    pub fn write(&self, result: &RankingResult) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create output directory {}",
                self.output_dir.display()
            )
        })?;

        let path = self.output_path(&result.algorithm);
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        writer.write_record(["rank", "index", "id", "score"])?;
        for selection in &result.selections {
            writer.write_record(&[
                selection.rank.to_string(),
                selection.index.to_string(),
                selection.id.clone(),
                selection.score.to_string(),
            ])?;
        }
        writer.flush()?;

        info!(
            "Wrote {} selections of {} to {}",
            result.len(),
            result.algorithm,
            path.display()
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> RankingResult {
        RankingResult::new(
            "demud",
            vec![
                Selection {
                    rank: 0,
                    index: 1,
                    id: "img_b".to_string(),
                    score: 2.0,
                },
                Selection {
                    rank: 1,
                    index: 0,
                    id: "img_a".to_string(),
                    score: 0.25,
                },
            ],
        )
    }

    #[test]
    fn test_accessors() {
        let result = sample_result();
        assert_eq!(result.len(), 2);
        assert!(!result.is_empty());
        assert_eq!(result.ids(), vec!["img_b", "img_a"]);
        assert_eq!(result.indices(), vec![1, 0]);
        assert_eq!(result.scores(), vec![2.0, 0.25]);
    }

    #[test]
    fn test_write_selections_csv() {
        let temp_dir = tempdir::TempDir::new("selections_csv_test")
            .expect("Failed to create temporary directory");
        let output_dir = temp_dir.path().join("results");
        let writer = SelectionsCsvWriter::new(&output_dir);

        let path = writer.write(&sample_result()).expect("Write should succeed");
        assert_eq!(path, output_dir.join("selections-demud.csv"));

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "rank,index,id,score\n0,1,img_b,2\n1,0,img_a,0.25\n");
    }
}
