//! Data Validation
//!
//! Range checking of raw sensor readings against the bounds the input form
//! declares.

mod error;
mod validator;

pub use error::ValidationError;
pub use validator::{ValidationConfig, ValidationResult, Validator};
