//! Data Validator for Range Checking

use crate::error::ValidationError;
use feature_engine::RawInput;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Declared input bounds (inclusive)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Air temperature valid range (K)
    pub air_temperature_range: (f64, f64),
    /// Process temperature valid range (K)
    pub process_temperature_range: (f64, f64),
    /// Rotational speed valid range (rpm)
    pub rotational_speed_range: (i64, i64),
    /// Torque valid range (Nm)
    pub torque_range: (f64, f64),
    /// Tool wear valid range (min)
    pub tool_wear_range: (i64, i64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            air_temperature_range: (290.0, 315.0),
            process_temperature_range: (290.0, 320.0),
            rotational_speed_range: (1000, 3000),
            torque_range: (20.0, 80.0),
            tool_wear_range: (0, 300),
        }
    }
}

impl ValidationConfig {
    /// Reject ranges whose lower bound exceeds the upper bound
    pub fn check(&self) -> Result<(), ValidationError> {
        let ranges = [
            ("air_temperature", self.air_temperature_range),
            ("process_temperature", self.process_temperature_range),
            (
                "rotational_speed",
                (
                    self.rotational_speed_range.0 as f64,
                    self.rotational_speed_range.1 as f64,
                ),
            ),
            ("torque", self.torque_range),
            (
                "tool_wear",
                (self.tool_wear_range.0 as f64, self.tool_wear_range.1 as f64),
            ),
        ];

        for (field, (min, max)) in ranges {
            if min.is_nan() || max.is_nan() || min > max {
                return Err(ValidationError::InvalidRange { field, min, max });
            }
        }
        Ok(())
    }
}

/// Result of validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether all values are valid
    pub valid: bool,
    /// List of validation errors
    pub errors: Vec<ValidationError>,
    /// Number of fields validated
    pub fields_checked: usize,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid(fields_checked: usize) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            fields_checked,
        }
    }

    /// Create an invalid result with errors
    pub fn invalid(errors: Vec<ValidationError>, fields_checked: usize) -> Self {
        Self {
            valid: false,
            errors,
            fields_checked,
        }
    }
}

/// Data validator for raw sensor readings
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite { field });
        }
        if value < range.0 || value > range.1 {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate air temperature
    pub fn validate_air_temperature(&self, value: f64) -> Result<(), ValidationError> {
        self.validate_range("air_temperature", value, self.config.air_temperature_range)
    }

    /// Validate process temperature
    pub fn validate_process_temperature(&self, value: f64) -> Result<(), ValidationError> {
        self.validate_range(
            "process_temperature",
            value,
            self.config.process_temperature_range,
        )
    }

    /// Validate rotational speed
    pub fn validate_rotational_speed(&self, value: i64) -> Result<(), ValidationError> {
        let (min, max) = self.config.rotational_speed_range;
        self.validate_range("rotational_speed", value as f64, (min as f64, max as f64))
    }

    /// Validate torque
    pub fn validate_torque(&self, value: f64) -> Result<(), ValidationError> {
        self.validate_range("torque", value, self.config.torque_range)
    }

    /// Validate tool wear
    pub fn validate_tool_wear(&self, value: i64) -> Result<(), ValidationError> {
        let (min, max) = self.config.tool_wear_range;
        self.validate_range("tool_wear", value as f64, (min as f64, max as f64))
    }

    /// Validate every numeric field of a reading, collecting all failures
    pub fn validate_input(&self, input: &RawInput) -> ValidationResult {
        let checks = [
            self.validate_air_temperature(input.air_temperature),
            self.validate_process_temperature(input.process_temperature),
            self.validate_rotational_speed(input.rotational_speed),
            self.validate_torque(input.torque),
            self.validate_tool_wear(input.tool_wear),
        ];
        let fields_checked = checks.len();

        let errors: Vec<_> = checks.into_iter().filter_map(Result::err).collect();
        if errors.is_empty() {
            ValidationResult::valid(fields_checked)
        } else {
            debug!("Input rejected with {} range errors", errors.len());
            ValidationResult::invalid(errors, fields_checked)
        }
    }

    /// Declared bounds
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reading() -> RawInput {
        RawInput {
            machine_type: "L".into(),
            air_temperature: 300.0,
            process_temperature: 305.0,
            rotational_speed: 1500,
            torque: 50.0,
            tool_wear: 100,
        }
    }

    #[test]
    fn test_valid_reading() {
        let result = Validator::default().validate_input(&reading());
        assert!(result.valid);
        assert_eq!(result.fields_checked, 5);
    }

    #[test]
    fn test_exact_bounds_accepted() {
        let validator = Validator::default();
        assert!(validator.validate_air_temperature(290.0).is_ok());
        assert!(validator.validate_air_temperature(315.0).is_ok());
        assert!(validator.validate_process_temperature(320.0).is_ok());
        assert!(validator.validate_rotational_speed(1000).is_ok());
        assert!(validator.validate_rotational_speed(3000).is_ok());
        assert!(validator.validate_torque(20.0).is_ok());
        assert!(validator.validate_tool_wear(0).is_ok());
        assert!(validator.validate_tool_wear(300).is_ok());
    }

    #[test]
    fn test_out_of_range_collected() {
        let input = RawInput {
            air_temperature: 289.9,
            tool_wear: 301,
            ..reading()
        };
        let result = Validator::default().validate_input(&input);
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 2);
        assert!(matches!(
            result.errors[0],
            ValidationError::OutOfRange { field: "air_temperature", .. }
        ));
        assert!(matches!(
            result.errors[1],
            ValidationError::OutOfRange { field: "tool_wear", .. }
        ));
    }

    #[test]
    fn test_nan_rejected() {
        let validator = Validator::default();
        assert_eq!(
            validator.validate_torque(f64::NAN),
            Err(ValidationError::NotFinite { field: "torque" })
        );
        assert!(validator.validate_air_temperature(f64::INFINITY).is_err());
    }

    #[test]
    fn test_config_check() {
        assert!(ValidationConfig::default().check().is_ok());

        let inverted = ValidationConfig {
            torque_range: (80.0, 20.0),
            ..Default::default()
        };
        assert!(matches!(
            inverted.check(),
            Err(ValidationError::InvalidRange { field: "torque", .. })
        ));
    }

    proptest! {
        #[test]
        fn in_bounds_readings_pass(
            air in 290.0f64..=315.0,
            process in 290.0f64..=320.0,
            rpm in 1000i64..=3000,
            torque in 20.0f64..=80.0,
            wear in 0i64..=300,
        ) {
            let input = RawInput {
                machine_type: "H".into(),
                air_temperature: air,
                process_temperature: process,
                rotational_speed: rpm,
                torque,
                tool_wear: wear,
            };
            prop_assert!(Validator::default().validate_input(&input).valid);
        }
    }
}
