//! Feature Engineering Engine
//!
//! Turns a raw sensor reading into the fixed-order feature vector the
//! scaler and classifiers were fit on.

mod encoding;
mod features;
pub mod schema;

pub use encoding::LabelEncoder;
pub use features::{FeatureEncoder, FeatureVector, RawInput};
pub use schema::{FEATURE_COLUMNS, FEATURE_DIMENSION};

use thiserror::Error;

/// Errors during categorical encoding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// Category is not one of the encoder's known classes
    #[error("Unknown {encoder} category: {value:?}")]
    UnknownCategory { encoder: String, value: String },

    /// Integer code has no class behind it
    #[error("Unknown {encoder} code: {code}")]
    UnknownCode { encoder: String, code: i64 },

    /// Encoder classes are unusable (empty or duplicated)
    #[error("Invalid {encoder} label encoder: {reason}")]
    InvalidEncoder { encoder: String, reason: String },
}
