//! Historical Dataset

use crate::InsightError;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use tracing::debug;

/// One row of the historical maintenance dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    #[serde(rename = "Failure Type")]
    pub failure_type: String,
    #[serde(rename = "Air temperature [K]")]
    pub air_temperature: f64,
    #[serde(rename = "Process temperature [K]")]
    pub process_temperature: f64,
    #[serde(rename = "Rotational speed [rpm]")]
    pub rotational_speed: f64,
    #[serde(rename = "Torque [Nm]")]
    pub torque: f64,
}

/// Historical records in file order
#[derive(Debug, Clone, Default)]
pub struct HistoricalDataset {
    records: Vec<HistoricalRecord>,
}

impl HistoricalDataset {
    /// Load a CSV dataset. Columns other than the ones above are ignored.
    pub fn load(path: &Path) -> Result<Self, InsightError> {
        let mut reader = match csv::Reader::from_path(path) {
            Ok(reader) => reader,
            Err(e) if is_not_found(&e) => {
                return Err(InsightError::DatasetMissing {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => return Err(malformed(path, e)),
        };

        let records = reader
            .deserialize()
            .collect::<Result<Vec<HistoricalRecord>, _>>()
            .map_err(|e| malformed(path, e))?;

        debug!("Loaded {} historical records from {}", records.len(), path.display());
        Ok(Self { records })
    }

    /// Build from in-memory records
    pub fn from_records(records: Vec<HistoricalRecord>) -> Self {
        Self { records }
    }

    /// All records
    pub fn records(&self) -> &[HistoricalRecord] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn is_not_found(err: &csv::Error) -> bool {
    matches!(err.kind(), csv::ErrorKind::Io(io_err) if io_err.kind() == io::ErrorKind::NotFound)
}

fn malformed(path: &Path, err: csv::Error) -> InsightError {
    InsightError::Malformed {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_ignores_extra_columns() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "UDI,Product ID,Type,Air temperature [K],Process temperature [K],Rotational speed [rpm],Torque [Nm],Tool wear [min],Target,Failure Type"
        )
        .unwrap();
        writeln!(file, "1,M14860,M,298.1,308.6,1551,42.8,0,0,No Failure").unwrap();
        writeln!(file, "2,L47181,L,298.2,308.7,1408,46.3,3,1,Power Failure").unwrap();

        let dataset = HistoricalDataset::load(file.path()).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[1].failure_type, "Power Failure");
        assert_eq!(dataset.records()[0].rotational_speed, 1551.0);
    }

    #[test]
    fn test_missing_file() {
        let err = HistoricalDataset::load(Path::new("/nonexistent/predictive_maintenance.csv"))
            .unwrap_err();
        assert_eq!(err.kind(), "dataset_missing");
    }

    #[test]
    fn test_missing_column_is_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Failure Type,Torque [Nm]").unwrap();
        writeln!(file, "No Failure,40.0").unwrap();

        let err = HistoricalDataset::load(file.path()).unwrap_err();
        assert_eq!(err.kind(), "dataset_malformed");
    }
}
