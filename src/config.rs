//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use faultwatch_core::sensor::{SafeRange, SafeRanges, SensorKey};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::api::ApiConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub predictor: PredictorConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    /// Per-sensor overrides of the default safe ranges
    #[serde(default)]
    pub ranges: BTreeMap<SensorKey, SafeRange>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which predictor serves `/predict`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictorKind {
    /// Built-in range-deviation scorer
    #[default]
    Range,
    /// Forward to an external model service
    Remote,
}

/// Predictor configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PredictorConfig {
    #[serde(default)]
    pub kind: PredictorKind,

    /// Model service endpoint, required for `remote`
    #[serde(default)]
    pub url: Option<String>,

    /// Probed by the readiness check when set
    #[serde(default)]
    pub health_url: Option<String>,

    #[serde(default = "default_predictor_timeout")]
    pub timeout_ms: u64,

    #[serde(default = "default_bias")]
    pub bias: f64,

    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_predictor_timeout() -> u64 {
    5000
}

fn default_bias() -> f64 {
    -4.0
}

fn default_weight() -> f64 {
    6.0
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            kind: PredictorKind::default(),
            url: None,
            health_url: None,
            timeout_ms: default_predictor_timeout(),
            bias: default_bias(),
            weight: default_weight(),
        }
    }
}

/// Prediction history configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    /// Entries served by `/logs`
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Append every prediction to this CSV file when set
    #[serde(default)]
    pub audit_csv: Option<String>,
}

fn default_capacity() -> usize {
    20
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            audit_csv: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse and validate TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("faultwatch").join("config.toml")),
            Some(PathBuf::from("/etc/faultwatch/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Default ranges with the `[ranges]` overrides applied
    pub fn safe_ranges(&self) -> SafeRanges {
        self.ranges
            .iter()
            .fold(SafeRanges::default(), |ranges, (key, range)| ranges.with(*key, *range))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (key, range) in &self.ranges {
            if !range.is_valid() {
                return Err(ConfigError::Invalid(format!(
                    "range for {} must be finite with min <= max, got {}",
                    key, range
                )));
            }
        }

        if self.predictor.kind == PredictorKind::Remote && self.predictor.url.is_none() {
            return Err(ConfigError::Invalid(
                "predictor.url is required when predictor.kind = \"remote\"".to_string(),
            ));
        }

        if self.history.capacity == 0 {
            return Err(ConfigError::Invalid("history.capacity must be at least 1".to_string()));
        }

        Ok(())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // API overrides
        if let Ok(host) = std::env::var("FAULTWATCH_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = std::env::var("FAULTWATCH_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Predictor overrides
        if let Ok(url) = std::env::var("FAULTWATCH_PREDICTOR_URL") {
            self.predictor.kind = PredictorKind::Remote;
            self.predictor.url = Some(url);
        }

        // History overrides
        if let Ok(path) = std::env::var("FAULTWATCH_AUDIT_CSV") {
            self.history.audit_csv = Some(path);
        }

        // Logging overrides
        if let Ok(level) = std::env::var("FAULTWATCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("FAULTWATCH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    let mut ranges = String::new();
    for (key, range) in SafeRanges::default().iter() {
        ranges.push_str(&format!(
            "# {} = [{:.1}, {:.1}]  # {} ({})\n",
            key,
            range.min,
            range.max,
            key.label(),
            key.unit()
        ));
    }

    format!(
        r#"# Faultwatch Configuration
#
# Environment variables override these settings:
# - FAULTWATCH_HOST
# - FAULTWATCH_PORT
# - FAULTWATCH_PREDICTOR_URL (switches to the remote predictor)
# - FAULTWATCH_AUDIT_CSV
# - FAULTWATCH_LOG_LEVEL
# - FAULTWATCH_LOG_FORMAT

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 5000

[predictor]
# "range" scores readings against the safe ranges below,
# "remote" forwards them to an external model service
kind = "range"

# Model service endpoint (remote only)
# url = "http://localhost:9000/score"
# health_url = "http://localhost:9000/health"

# Remote request timeout in milliseconds
timeout_ms = 5000

# Range scorer: probability = sigmoid(bias + weight * sum of deviations)
bias = -4.0
weight = 6.0

[history]
# Number of predictions served by GET /logs
capacity = 20

# Append every prediction to a CSV file
# audit_csv = "prediction_logs.csv"

[ranges]
# Inclusive safe range per sensor; uncomment to override
{ranges}
[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();

        assert_eq!(config.api.port, 5000);
        assert_eq!(config.predictor.kind, PredictorKind::Range);
        assert_eq!(config.history.capacity, 20);
        assert!(config.ranges.is_empty());
        assert_eq!(config.safe_ranges(), SafeRanges::default());
    }

    #[test]
    fn test_range_override() {
        let config = Config::parse(
            r#"
            [ranges]
            temp = [10.0, 40.0]
            "#,
        )
        .unwrap();

        let ranges = config.safe_ranges();
        assert_eq!(ranges.get(SensorKey::Temp), SafeRange::new(10.0, 40.0));
        assert_eq!(
            ranges.get(SensorKey::Humidity),
            SafeRanges::default().get(SensorKey::Humidity)
        );
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = Config::parse("[ranges]\nco2 = [900.0, 300.0]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_unknown_sensor_rejected() {
        let err = Config::parse("[ranges]\nrpm = [1.0, 2.0]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_remote_requires_url() {
        let err = Config::parse("[predictor]\nkind = \"remote\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let config = Config::parse(
            "[predictor]\nkind = \"remote\"\nurl = \"http://model:9000/score\"\n",
        )
        .unwrap();
        assert_eq!(config.predictor.url.as_deref(), Some("http://model:9000/score"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[history]\ncapacity = 5\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.history.capacity, 5);
        assert_eq!(config.logging.format, "pretty");
    }
}
