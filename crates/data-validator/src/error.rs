//! Validation Error Types

use serde::Serialize;
use thiserror::Error;

/// Errors during data validation
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    /// Value out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// NaN or infinite value
    #[error("{field} value is not a finite number")]
    NotFinite { field: &'static str },

    /// Submitted text is not a number
    #[error("{field} value {value:?} is not a number")]
    NotANumber { field: &'static str, value: String },

    /// Range configured with min above max
    #[error("Invalid range for {field}: [{min}, {max}]")]
    InvalidRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
}
