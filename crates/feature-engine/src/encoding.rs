//! Label Encoding

use crate::EncodingError;
use std::collections::HashSet;
use tracing::debug;

/// Fixed mapping between class names and integer codes.
///
/// A class's code is its position in `classes`, the way the encoder was
/// fit at artifact-build time. The mapping never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    /// Encoder name used in error messages
    name: String,
    /// Known classes in code order
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Create an encoder from its fitted classes
    pub fn new(name: &str, classes: Vec<String>) -> Result<Self, EncodingError> {
        if classes.is_empty() {
            return Err(EncodingError::InvalidEncoder {
                encoder: name.to_string(),
                reason: "no classes".to_string(),
            });
        }

        let mut seen = HashSet::with_capacity(classes.len());
        for class in &classes {
            if !seen.insert(class.as_str()) {
                return Err(EncodingError::InvalidEncoder {
                    encoder: name.to_string(),
                    reason: format!("duplicate class {:?}", class),
                });
            }
        }

        debug!("Label encoder '{}' with {} classes", name, classes.len());
        Ok(Self {
            name: name.to_string(),
            classes,
        })
    }

    /// Encode a category to its integer code
    pub fn encode(&self, category: &str) -> Result<i64, EncodingError> {
        self.classes
            .iter()
            .position(|c| c == category)
            .map(|idx| idx as i64)
            .ok_or_else(|| EncodingError::UnknownCategory {
                encoder: self.name.clone(),
                value: category.to_string(),
            })
    }

    /// Decode an integer code back to its category
    pub fn decode(&self, code: i64) -> Result<&str, EncodingError> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| self.classes.get(idx))
            .map(String::as_str)
            .ok_or_else(|| EncodingError::UnknownCode {
                encoder: self.name.clone(),
                code,
            })
    }

    /// Known classes in code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Encoder name
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine_types() -> LabelEncoder {
        LabelEncoder::new("machine type", vec!["H".into(), "L".into(), "M".into()]).unwrap()
    }

    fn failure_types() -> LabelEncoder {
        LabelEncoder::new(
            "failure type",
            [
                "Heat Dissipation Failure",
                "No Failure",
                "Overstrain Failure",
                "Power Failure",
                "Random Failures",
                "Tool Wear Failure",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_codes_follow_class_order() {
        let encoder = machine_types();
        assert_eq!(encoder.encode("H").unwrap(), 0);
        assert_eq!(encoder.encode("L").unwrap(), 1);
        assert_eq!(encoder.encode("M").unwrap(), 2);
    }

    #[test]
    fn test_round_trip_both_encoders() {
        for encoder in [machine_types(), failure_types()] {
            for class in encoder.classes() {
                let code = encoder.encode(class).unwrap();
                assert_eq!(encoder.decode(code).unwrap(), class);
            }
        }
    }

    #[test]
    fn test_unknown_category() {
        let err = machine_types().encode("Z").unwrap_err();
        assert_eq!(
            err,
            EncodingError::UnknownCategory {
                encoder: "machine type".into(),
                value: "Z".into(),
            }
        );
    }

    #[test]
    fn test_unknown_code() {
        let encoder = failure_types();
        assert!(matches!(encoder.decode(6), Err(EncodingError::UnknownCode { code: 6, .. })));
        assert!(matches!(encoder.decode(-1), Err(EncodingError::UnknownCode { code: -1, .. })));
    }

    #[test]
    fn test_rejects_bad_classes() {
        assert!(LabelEncoder::new("empty", vec![]).is_err());
        assert!(LabelEncoder::new("dup", vec!["L".into(), "L".into()]).is_err());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let encoder = machine_types();
        assert!(encoder.encode("L").is_ok());
        assert!(encoder.encode("l").is_err());
    }
}
