//! Dashboard configuration

use crate::rate_limit::RateLimitConfig;
use data_validator::ValidationConfig;
use serde::Deserialize;
use std::path::PathBuf;
use storage::ArtifactPaths;

/// Environment variable naming the config file (without extension)
pub const CONFIG_PATH_ENV: &str = "PDM_CONFIG";

/// Default config file name (without extension)
const DEFAULT_CONFIG_PATH: &str = "dashboard";

/// Full application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub artifacts: ArtifactPaths,
    pub dataset: DatasetConfig,
    pub bounds: ValidationConfig,
    pub logging: LoggingConfig,
    pub rate_limit: RateLimitConfig,
    pub metrics: MetricsConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Historical dataset used by the chart section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: PathBuf,
    /// Scatter plot cap (0 = unlimited)
    pub max_scatter_points: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("predictive_maintenance.csv"),
            max_scatter_points: 2000,
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Prometheus exporter settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl AppConfig {
    /// Load from the optional config file, then `PDM_*` environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load from a specific config file (extension optional)
    pub fn load_from(path: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("PDM")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.dataset.path, PathBuf::from("predictive_maintenance.csv"));
        assert_eq!(config.artifacts.scaler, PathBuf::from("scaler.json"));
        assert_eq!(config.bounds.air_temperature_range, (290.0, 315.0));
        assert!(!config.rate_limit.enabled);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        fs::write(
            &path,
            r#"
[server]
bind_addr = "127.0.0.1:9000"

[artifacts]
dir = "/opt/models"

[bounds]
torque_range = [10.0, 90.0]

[logging]
json = true
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.server.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.artifacts.dir, PathBuf::from("/opt/models"));
        assert_eq!(config.artifacts.binary_model, PathBuf::from("model_binary.onnx"));
        assert_eq!(config.bounds.torque_range, (10.0, 90.0));
        assert_eq!(config.bounds.tool_wear_range, (0, 300));
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent");
        let config = AppConfig::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(config.dataset.max_scatter_points, 2000);
    }
}
