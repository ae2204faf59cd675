//! Schema Route

use axum::{extract::State, Json};
use data_validator::ValidationConfig;
use feature_engine::FEATURE_COLUMNS;
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

/// What the loaded artifacts accept and produce
#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub machine_types: Vec<String>,
    pub failure_types: Vec<String>,
    pub feature_columns: Vec<&'static str>,
    pub bounds: ValidationConfig,
}

/// Describe the accepted input
pub async fn get_schema(State(state): State<Arc<AppState>>) -> Json<SchemaResponse> {
    let pipeline = state.artifacts.pipeline();

    Json(SchemaResponse {
        machine_types: state.artifacts.encoder().type_encoder().classes().to_vec(),
        failure_types: pipeline.failure_encoder().classes().to_vec(),
        feature_columns: FEATURE_COLUMNS.to_vec(),
        bounds: state.validator.config().clone(),
    })
}
