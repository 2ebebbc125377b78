use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::debug;
use ndarray::Array2;

use super::{Dataset, Input};

/// Reads items stored one per line as `id,f1,f2,...,fd`.
pub struct CsvMatrixReader<R: Read> {
    reader: csv::Reader<R>,
    source: String,
}

impl CsvMatrixReader<File> {
    pub fn from_path<P: AsRef<Path>>(path: P, has_header: bool) -> Result<Self> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let reader = csv::ReaderBuilder::new()
            .has_headers(has_header)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        Ok(Self {
            reader,
            source: path.display().to_string(),
        })
    }
}

impl<R: Read> CsvMatrixReader<R> {
    pub fn from_reader(reader: R, has_header: bool) -> Self {
        Self {
            reader: csv::ReaderBuilder::new()
                .has_headers(has_header)
                .flexible(true)
                .trim(csv::Trim::All)
                .from_reader(reader),
            source: "<reader>".to_string(),
        }
    }
}

impl<R: Read> Input for CsvMatrixReader<R> {
    fn read_all(&mut self) -> Result<Dataset> {
        let mut ids = Vec::new();
        let mut flattened = Vec::new();
        let mut dimension: Option<usize> = None;

        for (row_idx, record) in self.reader.records().enumerate() {
            let record = record.with_context(|| format!("Failed to read {}", self.source))?;
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(row_idx as u64 + 1);

            let mut fields = record.iter();
            let id = fields
                .next()
                .filter(|id| !id.is_empty())
                .ok_or_else(|| anyhow!("{}:{}: missing item id", self.source, line))?;

            let mut num_features = 0;
            for field in fields {
                let value: f64 = field.parse().with_context(|| {
                    format!("{}:{}: invalid feature value {:?}", self.source, line, field)
                })?;
                if !value.is_finite() {
                    return Err(anyhow!(
                        "{}:{}: feature value {:?} is not finite",
                        self.source,
                        line,
                        field
                    ));
                }
                flattened.push(value);
                num_features += 1;
            }
            if num_features == 0 {
                return Err(anyhow!("{}:{}: item {} has no features", self.source, line, id));
            }

            match dimension {
                None => dimension = Some(num_features),
                Some(expected) if expected != num_features => {
                    return Err(anyhow!(
                        "{}:{}: expected {} features, got {}",
                        self.source,
                        line,
                        expected,
                        num_features
                    ));
                }
                Some(_) => {}
            }
            ids.push(id.to_string());
        }

        let dimension = dimension.unwrap_or(0);
        debug!(
            "Read {} items of dimension {} from {}",
            ids.len(),
            dimension,
            self.source
        );
        let features = Array2::from_shape_vec((ids.len(), dimension), flattened)?;
        Ok(Dataset { ids, features })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_read_csv_matrix() {
        let data = "a,1.0,2.0,3.0\nb, 4.5 ,5,6\nc,-1,0,1e-3\n";
        let mut reader = CsvMatrixReader::from_reader(data.as_bytes(), false);
        let dataset = reader.read_all().expect("Read should succeed");

        assert_eq!(dataset.ids, vec!["a", "b", "c"]);
        assert_eq!(dataset.num_rows(), 3);
        assert_eq!(dataset.dimension(), 3);
        assert_eq!(dataset.features[[1, 0]], 4.5);
        assert_eq!(dataset.features[[2, 2]], 1e-3);
    }

    #[test]
    fn test_read_csv_with_header() {
        let data = "id,x,y\nfirst,0,0\nsecond,-1,1\n";
        let mut reader = CsvMatrixReader::from_reader(data.as_bytes(), true);
        let dataset = reader.read_all().unwrap();
        assert_eq!(dataset.ids, vec!["first", "second"]);
        assert_eq!(dataset.features.shape(), &[2, 2]);
    }

    #[test]
    fn test_read_empty_csv() {
        let mut reader = CsvMatrixReader::from_reader("".as_bytes(), false);
        let dataset = reader.read_all().unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_reject_ragged_rows() {
        let data = "a,1,2\nb,1,2,3\n";
        let mut reader = CsvMatrixReader::from_reader(data.as_bytes(), false);
        let err = reader.read_all().unwrap_err();
        assert!(err.to_string().contains("expected 2 features, got 3"));
    }

    #[test]
    fn test_reject_invalid_value() {
        let data = "a,1,two\n";
        let mut reader = CsvMatrixReader::from_reader(data.as_bytes(), false);
        assert!(reader.read_all().is_err());
    }

    #[test]
    fn test_reject_rows_without_features() {
        let data = "a\n";
        let mut reader = CsvMatrixReader::from_reader(data.as_bytes(), false);
        let err = reader.read_all().unwrap_err();
        assert!(err.to_string().contains("has no features"));
    }

    #[test]
    fn test_reject_non_finite_values() {
        for data in ["a,1,NaN\n", "a,inf,2\n", "a,1,-inf\n"] {
            let mut reader = CsvMatrixReader::from_reader(data.as_bytes(), false);
            let err = reader.read_all().unwrap_err();
            assert!(err.to_string().contains("is not finite"));
        }
    }

    #[test]
    fn test_from_path() {
        let temp_dir = tempdir::TempDir::new("csv_matrix_reader_test")
            .expect("Failed to create temporary directory");
        let path = temp_dir.path().join("items.csv");
        fs::write(&path, "x,0.5,0.25\n").unwrap();

        let mut reader = CsvMatrixReader::from_path(&path, false).unwrap();
        let dataset = reader.read_all().unwrap();
        assert_eq!(dataset.ids, vec!["x"]);
        assert_eq!(dataset.features.row(0).to_vec(), vec![0.5, 0.25]);
    }
}
