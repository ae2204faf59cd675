//! Request-level errors
//!
//! Every per-request failure ends here and becomes a response. Nothing
//! below the handlers is allowed to take the process down.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use data_validator::ValidationError;
use feature_engine::EncodingError;
use inference_engine::InferenceError;
use insights::InsightError;
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced to API and page users
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid input: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error(transparent)]
    Insight(#[from] InsightError),
    #[error("Malformed request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ValidationError>,
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Encoding(EncodingError::UnknownCategory { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Encoding(_) | ApiError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Insight(InsightError::DatasetMissing { .. }) => StatusCode::NOT_FOUND,
            ApiError::Insight(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Stable short name for clients
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::Encoding(EncodingError::UnknownCategory { .. }) => "unknown_category",
            ApiError::Encoding(EncodingError::UnknownCode { .. }) => "decode_error",
            ApiError::Encoding(EncodingError::InvalidEncoder { .. }) => "invalid_encoder",
            ApiError::Inference(e) => e.kind(),
            ApiError::Insight(e) => e.kind(),
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
            details: match self {
                ApiError::Validation(errors) => errors,
                _ => Vec::new(),
            },
        };
        (status, Json(body)).into_response()
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_status_mapping() {
        let unknown = ApiError::from(EncodingError::UnknownCategory {
            encoder: "machine type encoder".into(),
            value: "Z".into(),
        });
        assert_eq!(unknown.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(unknown.kind(), "unknown_category");

        let scaling = ApiError::from(InferenceError::ScalingError {
            expected: 6,
            actual: 5,
        });
        assert_eq!(scaling.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(scaling.kind(), "scaling_error");

        let missing = ApiError::from(InsightError::DatasetMissing {
            path: PathBuf::from("predictive_maintenance.csv"),
        });
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(missing.kind(), "dataset_missing");

        let malformed = ApiError::BadRequest("expected a number".into());
        assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
        assert_eq!(malformed.kind(), "bad_request");
    }

    #[test]
    fn test_validation_message_lists_fields() {
        let err = ApiError::Validation(vec![
            ValidationError::NotFinite { field: "torque" },
            ValidationError::OutOfRange {
                field: "tool_wear",
                value: 400.0,
                min: 0.0,
                max: 300.0,
            },
        ]);
        let message = err.to_string();
        assert!(message.contains("torque"));
        assert!(message.contains("tool_wear value 400 is out of range [0, 300]"));
    }
}
