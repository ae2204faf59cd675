//! Predictive Maintenance Dashboard Server
//!
//! Serves the single-page dashboard and a small JSON API around the
//! validate → encode → scale → classify pipeline.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use data_validator::Validator;
use feature_engine::{FeatureVector, RawInput};
use inference_engine::PredictionResult;
use insights::{InsightOverlay, InsightRenderer, InsightReport};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use storage::Artifacts;
use tower_governor::GovernorLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
mod error;
mod page;
pub mod rate_limit;
mod routes;

pub use config::{AppConfig, LoggingConfig};
pub use error::{ApiError, ErrorBody};

/// Application state shared across handlers. Read-only after startup.
pub struct AppState {
    /// Encoder and inference pipeline
    pub artifacts: Artifacts,
    /// Declared input bounds
    pub validator: Validator,
    /// Chart data source
    pub renderer: InsightRenderer,
    /// Prometheus handle when the recorder is installed
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

/// Features and prediction for one accepted reading
#[derive(Debug, Clone, Serialize)]
pub struct PredictionOutcome {
    pub features: FeatureVector,
    pub prediction: PredictionResult,
    pub latency_us: u64,
}

impl AppState {
    /// Create new application state
    pub fn new(artifacts: Artifacts, validator: Validator, renderer: InsightRenderer) -> Self {
        Self {
            artifacts,
            validator,
            renderer,
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Attach the Prometheus handle
    pub fn with_metrics(mut self, metrics: Option<PrometheusHandle>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Run one reading through validation, encoding and inference
    pub fn predict(&self, input: &RawInput) -> Result<PredictionOutcome, ApiError> {
        let result = self.run_pipeline(input);

        let outcome = match &result {
            Ok(o) if o.prediction.will_fail => "failure",
            Ok(_) => "healthy",
            Err(ApiError::Validation(_)) | Err(ApiError::Encoding(_)) => "rejected",
            Err(_) => "error",
        };
        metrics::counter!("pdm_predictions_total", "outcome" => outcome).increment(1);

        if let Err(e) = &result {
            warn!("Prediction failed ({}): {}", e.kind(), e);
        }
        result
    }

    /// Run `predict` on the blocking pool
    pub async fn predict_blocking(
        self: &Arc<Self>,
        input: RawInput,
    ) -> Result<PredictionOutcome, ApiError> {
        let state = Arc::clone(self);
        tokio::task::spawn_blocking(move || state.predict(&input))
            .await
            .map_err(|e| ApiError::Internal(format!("Task failed: {}", e)))?
    }

    /// Read the dataset and build chart data on the blocking pool
    pub async fn insights(
        self: &Arc<Self>,
        overlay: Option<InsightOverlay>,
    ) -> Result<InsightReport, ApiError> {
        let state = Arc::clone(self);
        tokio::task::spawn_blocking(move || state.renderer.render(overlay))
            .await
            .map_err(|e| ApiError::Internal(format!("Task failed: {}", e)))?
            .map_err(ApiError::from)
    }

    fn run_pipeline(&self, input: &RawInput) -> Result<PredictionOutcome, ApiError> {
        let validation = self.validator.validate_input(input);
        if !validation.valid {
            return Err(ApiError::Validation(validation.errors));
        }
        debug!("Validated {} fields", validation.fields_checked);

        let features = self.artifacts.encoder().encode(input)?;
        debug!("Features: {:?}", features.named().collect::<Vec<_>>());
        let result = self.artifacts.pipeline().run(&features)?;
        metrics::histogram!("pdm_inference_latency_seconds")
            .record(result.latency_us as f64 / 1_000_000.0);

        debug!(
            "Prediction for type {}: will_fail={} failure_type={:?}",
            input.machine_type, result.prediction.will_fail, result.prediction.failure_type
        );

        Ok(PredictionOutcome {
            features,
            prediction: result.prediction,
            latency_us: result.latency_us,
        })
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: ComponentStatus,
}

/// Component status
#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    pub inference: ComponentHealth,
    pub dataset: ComponentHealth,
}

/// Individual component health
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: String,
    pub detail: String,
}

/// Create the application router
pub fn create_router(
    state: Arc<AppState>,
    governor: Option<Arc<rate_limit::DefaultGovernorConfig>>,
) -> Router {
    let mut api = Router::new()
        .route("/health", get(health_handler))
        .route("/schema", get(routes::schema::get_schema))
        .route("/predict", post(routes::predict::post_predict))
        .route("/insights", get(routes::insights::get_insights));

    if let Some(config) = governor {
        api = api.layer(GovernorLayer { config });
    }

    Router::new()
        .route("/", get(routes::dashboard::get_dashboard))
        .route("/metrics", get(metrics_handler))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let pipeline = state.artifacts.pipeline();
    let dataset = if state.renderer.dataset_available() {
        ComponentHealth {
            status: "ok".to_string(),
            detail: state.renderer.dataset_path().display().to_string(),
        }
    } else {
        ComponentHealth {
            status: "unavailable".to_string(),
            detail: "charts disabled".to_string(),
        }
    };

    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        components: ComponentStatus {
            inference: ComponentHealth {
                status: "ok".to_string(),
                detail: format!(
                    "scaler={} failure_types={}",
                    pipeline.scaler().method_name(),
                    pipeline.failure_encoder().classes().len()
                ),
            },
            dataset,
        },
    };

    Json(response)
}

/// Prometheus exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled".to_string()),
    }
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let level = config.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    }
}

/// Run the server
pub async fn run_server(
    state: Arc<AppState>,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let governor = if config.rate_limit.enabled {
        let governor = rate_limit::create_governor_config(&config.rate_limit);
        if governor.is_none() {
            warn!("Rate limit settings unusable, API is not rate limited");
        }
        governor
    } else {
        None
    };
    let app = create_router(state, governor);

    info!("Starting dashboard server on {}", config.server.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
