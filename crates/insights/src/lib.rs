//! Sensor Insights
//!
//! Loads the historical maintenance dataset on demand and computes the
//! aggregates behind the dashboard charts, optionally overlaying the
//! current reading. Prediction never depends on anything in this crate.

mod dataset;
mod renderer;
mod report;

pub use dataset::{HistoricalDataset, HistoricalRecord};
pub use renderer::InsightRenderer;
pub use report::{FailureCount, InsightOverlay, InsightReport, RpmComparison, ScatterPoint};

use std::path::PathBuf;
use thiserror::Error;

/// Insight rendering errors
#[derive(Debug, Error)]
pub enum InsightError {
    /// Dataset file does not exist
    #[error("Historical dataset not found at {}", path.display())]
    DatasetMissing { path: PathBuf },

    /// Dataset exists but could not be read or parsed
    #[error("Historical dataset at {} is unreadable: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
}

impl InsightError {
    /// Stable short name for reporting
    pub fn kind(&self) -> &'static str {
        match self {
            InsightError::DatasetMissing { .. } => "dataset_missing",
            InsightError::Malformed { .. } => "dataset_malformed",
        }
    }
}
