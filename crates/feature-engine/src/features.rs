//! Feature Vector Assembly

use crate::encoding::LabelEncoder;
use crate::schema::{FEATURE_COLUMNS, FEATURE_DIMENSION};
use crate::EncodingError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One sensor reading as collected from the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    /// Machine quality variant (category of the machine-type encoder)
    pub machine_type: String,
    /// Air temperature (K)
    pub air_temperature: f64,
    /// Process temperature (K)
    pub process_temperature: f64,
    /// Rotational speed (rpm)
    pub rotational_speed: i64,
    /// Torque (Nm)
    pub torque: f64,
    /// Tool wear (min)
    pub tool_wear: i64,
}

/// Feature vector for ML inference, in training column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    /// Wrap raw values. Dimension is checked by the scaler, not here.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Feature values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of features
    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    /// Values paired with their column names
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_COLUMNS.iter().copied().zip(self.values.iter().copied())
    }
}

/// Encodes raw readings into feature vectors
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    /// Machine-type label encoder
    type_encoder: LabelEncoder,
}

impl FeatureEncoder {
    /// Create a new feature encoder
    pub fn new(type_encoder: LabelEncoder) -> Self {
        Self { type_encoder }
    }

    /// Assemble the feature vector for one reading.
    ///
    /// Numeric fields are copied through unchanged; range checks belong to
    /// the caller.
    pub fn encode(&self, raw: &RawInput) -> Result<FeatureVector, EncodingError> {
        let encoded_type = self.type_encoder.encode(&raw.machine_type)?;

        let mut values = Vec::with_capacity(FEATURE_DIMENSION);
        values.push(encoded_type as f64);
        values.push(raw.air_temperature);
        values.push(raw.process_temperature);
        values.push(raw.rotational_speed as f64);
        values.push(raw.torque);
        values.push(raw.tool_wear as f64);

        debug!(
            "Encoded {} {:?} as {}",
            self.type_encoder.name(),
            raw.machine_type,
            encoded_type
        );
        Ok(FeatureVector { values })
    }

    /// Machine-type encoder
    pub fn type_encoder(&self) -> &LabelEncoder {
        &self.type_encoder
    }
}
