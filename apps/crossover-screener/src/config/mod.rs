//! Configuration module for the crossover screener.
//!
//! Configuration comes from an optional YAML file with `${VAR}` and
//! `${VAR:-default}` interpolation, followed by `SCREENER_*` environment
//! overrides, followed by validation. Every section is optional.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crossover_screener::config::{Config, load_config};
//!
//! // Load from a file
//! let config = load_config(Some("screener.yaml"))?;
//!
//! // Or from defaults plus environment overrides
//! let config = Config::from_env()?;
//!
//! println!("batch size: {}", config.runner.batch_size);
//! ```

mod observability;
mod price_source;
mod runner;
mod signal;
mod store;
mod universe;

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use observability::{LoggingConfig, MetricsSettings, ObservabilityConfig};
pub use price_source::PriceSourceConfig;
pub use runner::RunnerConfig;
pub use signal::SignalConfig;
pub use store::StoreConfig;
pub use universe::UniverseConfig;

use crate::application::use_cases::RunSettings;

/// Environment variable naming the YAML config file.
pub const CONFIG_PATH_ENV: &str = "SCREENER_CONFIG";

/// Accepted log formats.
pub const LOG_FORMATS: [&str; 3] = ["pretty", "json", "compact"];

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),

    /// An environment override could not be parsed.
    #[error("Invalid value for {var}: '{value}'")]
    InvalidEnvVar {
        /// Variable name.
        var: String,
        /// Offending value.
        value: String,
    },
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Batch runner configuration.
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Crossover windows.
    #[serde(default)]
    pub signal: SignalConfig,
    /// Price source configuration.
    #[serde(default)]
    pub price_source: PriceSourceConfig,
    /// Snapshot store configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Ticker universe configuration.
    #[serde(default)]
    pub universe: UniverseConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Defaults with `SCREENER_*` environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        apply_overrides(&mut config, |var| std::env::var(var).ok())?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load the file named by `SCREENER_CONFIG` if set, else [`Config::from_env`].
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.is_empty() => load_config(Some(&path)),
            _ => Self::from_env(),
        }
    }

    /// Scheduler settings derived from this configuration.
    #[must_use]
    pub fn run_settings(&self) -> RunSettings {
        RunSettings {
            batch_size: self.runner.batch_size,
            max_workers: self.runner.max_workers,
            lookback_days: self.runner.lookback_days,
            fetch_retry: self.runner.fetch_retry_policy(),
            write_retry: self.runner.write_retry_policy(),
            crossover: self.signal.params(),
            fallback_tickers: self.universe.fallback.clone(),
        }
    }

    /// Parsed metrics listen address.
    pub fn metrics_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = &self.observability.metrics.listen_addr;
        raw.parse().map_err(|_| {
            ConfigError::ValidationError(format!(
                "observability.metrics.listen_addr '{raw}' is not a socket address"
            ))
        })
    }
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// `SCREENER_*` overrides are applied on top of the file.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "screener.yaml".
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("screener.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    let interpolated = interpolate_env_vars(&contents);
    let mut config: Config = serde_yaml_bw::from_str(&interpolated)?;

    apply_overrides(&mut config, |var| std::env::var(var).ok())?;
    validate_config(&config)?;

    Ok(config)
}

/// Load configuration from a YAML string (useful for testing).
///
/// Environment overrides are not applied.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Apply `SCREENER_*` overrides using `lookup` to read variables.
fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    fn parsed<T: std::str::FromStr>(var: &str, value: String) -> Result<T, ConfigError> {
        value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                value,
            })
    }

    let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("SCREENER_BATCH_SIZE") {
        config.runner.batch_size = parsed("SCREENER_BATCH_SIZE", v)?;
    }
    if let Some(v) = get("SCREENER_MAX_WORKERS") {
        config.runner.max_workers = parsed("SCREENER_MAX_WORKERS", v)?;
    }
    if let Some(v) = get("SCREENER_RETRIES") {
        config.runner.retries = parsed("SCREENER_RETRIES", v)?;
    }
    if let Some(v) = get("SCREENER_LOOKBACK_DAYS") {
        config.runner.lookback_days = parsed("SCREENER_LOOKBACK_DAYS", v)?;
    }
    if let Some(v) = get("SCREENER_RUN_INTERVAL_SECS") {
        config.runner.run_interval_secs = parsed("SCREENER_RUN_INTERVAL_SECS", v)?;
    }
    if let Some(v) = get("SCREENER_STATE_FILE") {
        config.store.snapshot_path = PathBuf::from(v);
    }
    if let Some(v) = get("SCREENER_TICKERS_FILE") {
        config.universe.path = Some(PathBuf::from(v));
    }

    Ok(())
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let runner = &config.runner;

    if runner.batch_size == 0 {
        return Err(ConfigError::ValidationError(
            "runner.batch_size must be at least 1".to_string(),
        ));
    }

    if runner.max_workers == 0 {
        return Err(ConfigError::ValidationError(
            "runner.max_workers must be at least 1".to_string(),
        ));
    }

    if runner.lookback_days == 0 {
        return Err(ConfigError::ValidationError(
            "runner.lookback_days must be at least 1".to_string(),
        ));
    }

    if runner.store_write_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "runner.store_write_attempts must be at least 1".to_string(),
        ));
    }

    if !(0.0..=1.0).contains(&runner.backoff_jitter) {
        return Err(ConfigError::ValidationError(
            "runner.backoff_jitter must be between 0.0 and 1.0".to_string(),
        ));
    }

    let signal = &config.signal;
    if signal.short_window == 0 || signal.short_window >= signal.long_window {
        return Err(ConfigError::ValidationError(
            "signal.short_window must be positive and less than signal.long_window".to_string(),
        ));
    }

    let format = config.observability.logging.format.as_str();
    if !LOG_FORMATS.contains(&format) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {LOG_FORMATS:?}"
        )));
    }

    config.metrics_addr()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.runner.batch_size, 100);
        assert_eq!(config.runner.max_workers, 4);
        assert_eq!(config.runner.retries, 2);
        assert_eq!(config.runner.lookback_days, 365);
        assert_eq!(config.signal.short_window, 50);
        assert_eq!(config.signal.long_window, 200);
        assert_eq!(config.store.snapshot_path, PathBuf::from("./data/state.json"));
        assert_eq!(config.universe.fallback.len(), 6);
        assert!(!config.observability.metrics.enabled);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_empty_config() {
        let config = match load_config_from_string("{}") {
            Ok(c) => c,
            Err(e) => panic!("should load empty config: {e}"),
        };
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
runner:
  batch_size: 25
  max_workers: 8
  retries: 3
  lookback_days: 730
  backoff_base_ms: 500
  store_write_attempts: 5
  run_interval_secs: 3600

signal:
  short_window: 20
  long_window: 100

price_source:
  base_url: "http://localhost:8080"
  timeout_secs: 5
  ca_cert_path: "/etc/ssl/custom.pem"

store:
  snapshot_path: "/var/lib/screener/state.json"

universe:
  path: "tickers.txt"
  fallback: []

observability:
  logging:
    level: "debug"
    format: "json"
  metrics:
    enabled: true
    listen_addr: "127.0.0.1:9100"
"#;

        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load full config: {e}"),
        };

        assert_eq!(config.runner.batch_size, 25);
        assert_eq!(config.runner.run_interval(), Some(Duration::from_secs(3600)));
        assert_eq!(config.signal.params().long_window, 100);
        assert_eq!(config.price_source.timeout_secs, 5);
        assert!(config.price_source.ca_cert_path.is_some());
        assert!(config.universe.fallback.is_empty());
        assert_eq!(config.observability.logging.format, "json");
        assert_eq!(config.metrics_addr().unwrap().port(), 9100);

        let settings = config.run_settings();
        assert_eq!(settings.fetch_retry.retries, 3);
        assert_eq!(settings.fetch_retry.base_delay, Duration::from_millis(500));
        assert_eq!(settings.write_retry.max_attempts(), 5);
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "path: ${SCREENER_CONFIG_TEST_NONEXISTENT_VAR:-./state.json}";
        assert_eq!(interpolate_env_vars(input), "path: ./state.json");
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "path: ${SCREENER_CONFIG_TEST_UNLIKELY_TO_EXIST}";
        assert_eq!(interpolate_env_vars(input), "path: ");
    }

    #[test]
    #[expect(clippy::literal_string_with_formatting_args)] // ${...} is env var syntax
    fn test_env_var_with_default_uses_existing() {
        let result = interpolate_env_vars("path: ${PATH:-default}");
        assert_ne!(result, "path: default");
        assert!(result.starts_with("path: "));
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = Config::default();
        let lookup = env(&[
            ("SCREENER_BATCH_SIZE", "10"),
            ("SCREENER_MAX_WORKERS", " 2 "),
            ("SCREENER_RETRIES", "0"),
            ("SCREENER_LOOKBACK_DAYS", "90"),
            ("SCREENER_STATE_FILE", "/tmp/state.json"),
            ("SCREENER_TICKERS_FILE", "tickers.txt"),
            ("SCREENER_RUN_INTERVAL_SECS", "60"),
        ]);

        apply_overrides(&mut config, lookup).unwrap();

        assert_eq!(config.runner.batch_size, 10);
        assert_eq!(config.runner.max_workers, 2);
        assert_eq!(config.runner.retries, 0);
        assert_eq!(config.runner.lookback_days, 90);
        assert_eq!(config.store.snapshot_path, PathBuf::from("/tmp/state.json"));
        assert_eq!(config.universe.path, Some(PathBuf::from("tickers.txt")));
        assert_eq!(config.runner.run_interval_secs, 60);
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let mut config = Config::default();
        apply_overrides(&mut config, env(&[("SCREENER_BATCH_SIZE", "  ")])).unwrap();
        assert_eq!(config.runner.batch_size, 100);
    }

    #[test]
    fn test_invalid_override() {
        let mut config = Config::default();
        let Err(err) = apply_overrides(&mut config, env(&[("SCREENER_MAX_WORKERS", "four")])) else {
            panic!("expected error for non-numeric override");
        };
        assert!(err.to_string().contains("SCREENER_MAX_WORKERS"));
    }

    #[test]
    fn test_validation_zero_batch_size() {
        let Err(err) = load_config_from_string("runner:\n  batch_size: 0\n") else {
            panic!("expected error for zero batch size");
        };
        assert!(err.to_string().contains("batch_size"));
    }

    #[test]
    fn test_validation_windows_out_of_order() {
        let yaml = "signal:\n  short_window: 200\n  long_window: 50\n";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for inverted windows");
        };
        assert!(err.to_string().contains("short_window"));
    }

    #[test]
    fn test_validation_log_format() {
        let yaml = "observability:\n  logging:\n    format: xml\n";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for unknown log format");
        };
        assert!(err.to_string().contains("format"));
    }

    #[test]
    fn test_validation_metrics_addr() {
        let yaml = "observability:\n  metrics:\n    listen_addr: nowhere\n";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for bad address");
        };
        assert!(err.to_string().contains("listen_addr"));
    }

    #[test]
    fn test_validation_jitter_range() {
        let Err(err) = load_config_from_string("runner:\n  backoff_jitter: 1.5\n") else {
            panic!("expected error for jitter");
        };
        assert!(err.to_string().contains("backoff_jitter"));
    }

    #[test]
    fn test_missing_file() {
        let Err(err) = load_config(Some("/nonexistent/screener.yaml")) else {
            panic!("expected read error");
        };
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}
