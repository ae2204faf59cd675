//! Predictive Maintenance Dashboard - Main Entry Point

use anyhow::Context;
use api::{init_logging, run_server, AppConfig, AppState};
use data_validator::Validator;
use insights::InsightRenderer;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use storage::ArtifactStore;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_logging(&config.logging).context("Failed to initialize logging")?;

    info!("=== Predictive Maintenance Dashboard v{} ===", env!("CARGO_PKG_VERSION"));

    config.bounds.check().context("Invalid input bounds")?;

    let artifacts = match ArtifactStore::new(config.artifacts.clone()).load() {
        Ok(artifacts) => artifacts,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };

    let metrics = if config.metrics.enabled {
        match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("Metrics disabled: {}", e);
                None
            }
        }
    } else {
        None
    };

    let renderer = InsightRenderer::new(&config.dataset.path)
        .with_max_scatter_points(config.dataset.max_scatter_points);
    if !renderer.dataset_available() {
        warn!(
            "Dataset {} not found, charts are not available",
            config.dataset.path.display()
        );
    }

    let state = AppState::new(artifacts, Validator::new(config.bounds.clone()), renderer)
        .with_metrics(metrics);

    run_server(Arc::new(state), &config)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
