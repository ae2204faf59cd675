//! Chart Aggregates

use crate::dataset::{HistoricalDataset, HistoricalRecord};
use feature_engine::RawInput;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Current reading as plotted on top of the historical data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InsightOverlay {
    pub air_temperature: f64,
    pub torque: f64,
    pub rotational_speed: f64,
}

impl From<&RawInput> for InsightOverlay {
    fn from(input: &RawInput) -> Self {
        Self {
            air_temperature: input.air_temperature,
            torque: input.torque,
            rotational_speed: input.rotational_speed as f64,
        }
    }
}

/// Number of records per failure type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureCount {
    pub failure_type: String,
    pub count: usize,
}

/// One point of the air temperature vs torque scatter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub air_temperature: f64,
    pub torque: f64,
    pub rotational_speed: f64,
    pub failure_type: String,
}

impl From<&HistoricalRecord> for ScatterPoint {
    fn from(record: &HistoricalRecord) -> Self {
        Self {
            air_temperature: record.air_temperature,
            torque: record.torque,
            rotational_speed: record.rotational_speed,
            failure_type: record.failure_type.clone(),
        }
    }
}

/// Current RPM next to the dataset average
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RpmComparison {
    pub input_rpm: Option<f64>,
    pub average_rpm: Option<f64>,
}

/// Everything the chart section draws
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightReport {
    pub record_count: usize,
    /// Descending by count, ties by name
    pub failure_distribution: Vec<FailureCount>,
    pub scatter: Vec<ScatterPoint>,
    pub overlay: Option<InsightOverlay>,
    pub rpm: RpmComparison,
}

impl InsightReport {
    /// Aggregate a dataset. `max_points` caps the scatter by even
    /// subsampling; zero means no cap.
    pub fn build(
        dataset: &HistoricalDataset,
        overlay: Option<InsightOverlay>,
        max_points: usize,
    ) -> Self {
        let records = dataset.records();

        let average_rpm = if dataset.is_empty() {
            None
        } else {
            Some(records.iter().map(|r| r.rotational_speed).sum::<f64>() / dataset.len() as f64)
        };

        Self {
            record_count: dataset.len(),
            failure_distribution: failure_distribution(records),
            scatter: scatter(records, max_points),
            overlay,
            rpm: RpmComparison {
                input_rpm: overlay.map(|o| o.rotational_speed),
                average_rpm,
            },
        }
    }
}

fn failure_distribution(records: &[HistoricalRecord]) -> Vec<FailureCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.failure_type.as_str()).or_insert(0) += 1;
    }

    let mut distribution: Vec<FailureCount> = counts
        .into_iter()
        .map(|(failure_type, count)| FailureCount {
            failure_type: failure_type.to_string(),
            count,
        })
        .collect();
    distribution.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.failure_type.cmp(&b.failure_type))
    });
    distribution
}

fn scatter(records: &[HistoricalRecord], max_points: usize) -> Vec<ScatterPoint> {
    let step = if max_points == 0 || records.len() <= max_points {
        1
    } else {
        records.len().div_ceil(max_points)
    };
    records.iter().step_by(step).map(ScatterPoint::from).collect()
}
