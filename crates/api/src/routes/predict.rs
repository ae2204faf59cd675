//! Prediction Route

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use feature_engine::{FeatureVector, RawInput};
use inference_engine::PredictionResult;
use serde::Serialize;
use std::sync::Arc;

use crate::{ApiError, AppState};

/// Response for the predict endpoint
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub input: RawInput,
    pub features: FeatureVector,
    pub prediction: PredictionResult,
    pub latency_us: u64,
}

/// Classify one sensor reading
pub async fn post_predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RawInput>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(input) = payload?;
    let outcome = state.predict_blocking(input.clone()).await?;

    Ok(Json(PredictResponse {
        input,
        features: outcome.features,
        prediction: outcome.prediction,
        latency_us: outcome.latency_us,
    }))
}
