//! Configuration loading for the simulation engine.
//!
//! Loads YAML with `${VAR}` and `${VAR:-default}` environment interpolation,
//! then validates it before anything runs.
//!
//! # Usage
//!
//! ```rust,ignore
//! use simulation_engine::config::load_config;
//!
//! // Load from default path (simulation.yaml)
//! let config = load_config(None)?;
//!
//! println!("trials: {}", config.simulation.trial_count);
//! ```
//!
//! # Example file
//!
//! ```yaml
//! simulation:
//!   initial_investment: 100000
//!   horizon_days: 30
//!   trial_count: ${SIM_TRIALS:-10000}
//!   mean_daily_return: 0.0006
//!   daily_volatility: 0.012
//!   current_price: 596.56
//! engine:
//!   seed: 42
//!   max_threads: 0
//! observability:
//!   logging:
//!     level: info
//!     format: pretty
//! ```

mod observability;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::SimulationError;
use crate::observability::record_validation_failure;
use crate::simulation::{EngineConfig, SimulationConfig};

pub use observability::{LogFormat, LoggingConfig, ObservabilityConfig};

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "simulation.yaml";

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
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Simulation parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Engine execution settings.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Load configuration from a YAML file.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to `simulation.yaml`.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist.
///
/// # Errors
///
/// Returns a `ConfigError` if an existing file cannot be read, parsed, or
/// validated.
pub fn load_config_or_default(path: &str) -> Result<Config, ConfigError> {
    if Path::new(path).exists() {
        load_config(Some(path))
    } else {
        let config = Config::default();
        validate_config(&config)?;
        Ok(config)
    }
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map(|m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if let Err(e) = config.simulation.validate() {
        if let SimulationError::InvalidConfig { field, .. } = &e {
            record_validation_failure(field);
        }
        return Err(ConfigError::ValidationError(e.to_string()));
    }

    if config.engine.chunk_size == 0 {
        record_validation_failure("chunk_size");
        return Err(ConfigError::ValidationError(
            "engine.chunk_size must be positive".to_string(),
        ));
    }

    if config.observability.logging.level.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "observability.logging.level must not be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.simulation.trial_count, 10_000);
        assert_eq!(config.simulation.horizon_days, 30);
        assert!((config.simulation.current_price - 596.56).abs() < f64::EPSILON);
        assert_eq!(config.engine.seed, None);
        assert_eq!(config.observability.logging.level, "info");
        assert_eq!(config.observability.logging.format, LogFormat::Pretty);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_empty_config_uses_defaults() {
        let config = match load_config_from_string("{}") {
            Ok(c) => c,
            Err(e) => panic!("should load empty config: {e}"),
        };
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_minimal_config() {
        let yaml = r"
simulation:
  trial_count: 500
  horizon_days: 10
";

        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load minimal config: {e}"),
        };
        assert_eq!(config.simulation.trial_count, 500);
        assert_eq!(config.simulation.horizon_days, 10);
        assert!((config.simulation.initial_investment - 100_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "trial_count: ${SIMULATION_CONFIG_TEST_NONEXISTENT_VAR:-250}";
        let result = interpolate_env_vars(input);
        assert_eq!(result, "trial_count: 250");
    }

    #[test]
    #[expect(clippy::literal_string_with_formatting_args)] // ${...} is env var syntax, not format args
    fn test_env_var_with_default_uses_existing() {
        // PATH should always exist
        let input = "path: ${PATH:-default}";
        let result = interpolate_env_vars(input);
        assert_ne!(result, "path: default");
        assert!(result.starts_with("path: "));
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "seed: ${SIMULATION_CONFIG_TEST_UNLIKELY_TO_EXIST}";
        let result = interpolate_env_vars(input);
        assert_eq!(result, "seed: ");
    }

    #[test]
    fn test_validation_zero_trials() {
        let yaml = r"
simulation:
  trial_count: 0
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for zero trials");
        };
        assert!(err.to_string().contains("trial_count"));
    }

    #[test]
    fn test_validation_negative_volatility() {
        let yaml = r"
simulation:
  daily_volatility: -0.1
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for negative volatility");
        };
        assert!(err.to_string().contains("daily_volatility"));
    }

    #[test]
    fn test_negative_horizon_is_parse_error() {
        let yaml = r"
simulation:
  horizon_days: -3
";
        let result = load_config_from_string(yaml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_validation_zero_chunk_size() {
        let yaml = r"
engine:
  chunk_size: 0
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for zero chunk size");
        };
        assert!(err.to_string().contains("chunk_size"));
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let yaml = r"
observability:
  logging:
    format: xml
";
        assert!(matches!(
            load_config_from_string(yaml),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
simulation:
  initial_investment: 250000
  horizon_days: 60
  trial_count: 2000
  mean_daily_return: -0.0002
  daily_volatility: 0.02
  current_price: 123.45

engine:
  seed: 42
  max_threads: 4
  min_parallel_trials: 100
  chunk_size: 64

observability:
  logging:
    level: "simulation_engine=debug"
    format: "json"
    include_spans: false
"#;

        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load full config: {e}"),
        };

        assert!((config.simulation.initial_investment - 250_000.0).abs() < f64::EPSILON);
        assert_eq!(config.simulation.horizon_days, 60);
        assert_eq!(config.simulation.trial_count, 2000);
        assert!((config.simulation.mean_daily_return + 0.0002).abs() < f64::EPSILON);
        assert_eq!(config.engine.seed, Some(42));
        assert_eq!(config.engine.max_threads, 4);
        assert_eq!(config.engine.min_parallel_trials, 100);
        assert_eq!(config.engine.chunk_size, 64);
        assert_eq!(config.observability.logging.level, "simulation_engine=debug");
        assert_eq!(config.observability.logging.format, LogFormat::Json);
        assert!(!config.observability.logging.include_spans);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "simulation:\n  trial_count: 77").unwrap();

        let config = load_config(file.path().to_str()).unwrap();
        assert_eq!(config.simulation.trial_count, 77);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = load_config(Some("/nonexistent/simulation-engine/config.yaml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = load_config_or_default("/nonexistent/simulation-engine/config.yaml").unwrap();
        assert_eq!(config, Config::default());
    }
}
