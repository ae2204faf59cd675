//! Insight Renderer

use crate::dataset::HistoricalDataset;
use crate::report::{InsightOverlay, InsightReport};
use crate::InsightError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default scatter cap
const DEFAULT_MAX_SCATTER_POINTS: usize = 2000;

/// Produces chart data from the historical dataset.
///
/// The dataset is read on every call, so a missing file only disables the
/// request that hit it.
#[derive(Debug, Clone)]
pub struct InsightRenderer {
    dataset_path: PathBuf,
    max_scatter_points: usize,
}

impl InsightRenderer {
    /// Create a renderer over a dataset file
    pub fn new(dataset_path: impl Into<PathBuf>) -> Self {
        Self {
            dataset_path: dataset_path.into(),
            max_scatter_points: DEFAULT_MAX_SCATTER_POINTS,
        }
    }

    /// Cap the number of scatter points (0 = unlimited)
    pub fn with_max_scatter_points(mut self, max_scatter_points: usize) -> Self {
        self.max_scatter_points = max_scatter_points;
        self
    }

    /// Load the dataset and build the report
    pub fn render(&self, overlay: Option<InsightOverlay>) -> Result<InsightReport, InsightError> {
        let dataset = HistoricalDataset::load(&self.dataset_path).map_err(|e| {
            warn!("Charts unavailable: {}", e);
            e
        })?;

        let report = InsightReport::build(&dataset, overlay, self.max_scatter_points);
        debug!(
            "Rendered insights: {} records, {} failure types",
            report.record_count,
            report.failure_distribution.len()
        );
        Ok(report)
    }

    /// Whether the dataset file is currently present
    pub fn dataset_available(&self) -> bool {
        self.dataset_path.is_file()
    }

    /// Dataset location
    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }
}
