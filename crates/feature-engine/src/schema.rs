//! Training-time feature schema
//!
//! The scaler and both classifiers were fit on columns in exactly this
//! order. Reordering them does not fail, it silently yields wrong predictions.

/// Number of features in the vector
pub const FEATURE_DIMENSION: usize = 6;

/// Column names in training order
pub const FEATURE_COLUMNS: [&str; FEATURE_DIMENSION] = [
    "Type",
    "Air temperature [K]",
    "Process temperature [K]",
    "Rotational speed [rpm]",
    "Torque [Nm]",
    "Tool wear [min]",
];

/// Index of the encoded machine type
pub const TYPE_INDEX: usize = 0;
/// Index of the air temperature reading
pub const AIR_TEMPERATURE_INDEX: usize = 1;
/// Index of the process temperature reading
pub const PROCESS_TEMPERATURE_INDEX: usize = 2;
/// Index of the rotational speed reading
pub const ROTATIONAL_SPEED_INDEX: usize = 3;
/// Index of the torque reading
pub const TORQUE_INDEX: usize = 4;
/// Index of the tool wear counter
pub const TOOL_WEAR_INDEX: usize = 5;

/// Check that a recorded column list matches the training schema
pub fn matches_schema<S: AsRef<str>>(columns: &[S]) -> bool {
    columns.len() == FEATURE_DIMENSION
        && columns
            .iter()
            .zip(FEATURE_COLUMNS.iter())
            .all(|(a, b)| a.as_ref() == *b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_follow_columns() {
        assert_eq!(FEATURE_COLUMNS[TYPE_INDEX], "Type");
        assert_eq!(FEATURE_COLUMNS[AIR_TEMPERATURE_INDEX], "Air temperature [K]");
        assert_eq!(FEATURE_COLUMNS[PROCESS_TEMPERATURE_INDEX], "Process temperature [K]");
        assert_eq!(FEATURE_COLUMNS[ROTATIONAL_SPEED_INDEX], "Rotational speed [rpm]");
        assert_eq!(FEATURE_COLUMNS[TORQUE_INDEX], "Torque [Nm]");
        assert_eq!(FEATURE_COLUMNS[TOOL_WEAR_INDEX], "Tool wear [min]");
    }

    #[test]
    fn test_matches_schema() {
        assert!(matches_schema(&FEATURE_COLUMNS));

        let mut swapped = FEATURE_COLUMNS.to_vec();
        swapped.swap(1, 2);
        assert!(!matches_schema(&swapped));
        assert!(!matches_schema(&FEATURE_COLUMNS[..5]));
    }
}
