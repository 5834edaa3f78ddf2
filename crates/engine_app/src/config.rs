//! Host loop configuration, loaded from JSON.
//!
//! ```json
//! {
//!     "tick_rate": 30.0,
//!     "max_ticks": 120,
//!     "schedule": ["movement", "move_logger"]
//! }
//! ```
//!
//! Every field is optional; see [`TickConfig::default`].

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Errors raised while loading or validating a [`TickConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Configuration for the host tick loop.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TickConfig {
    /// Target ticks per second.
    pub tick_rate: f64,
    /// Maximum number of ticks to run (0 = unlimited).
    pub max_ticks: u64,
    /// System names to update each tick, in order. Empty means every
    /// registered system in registration order.
    pub schedule: Vec<String>,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_ticks: 0,
            schedule: Vec::new(),
        }
    }
}

impl TickConfig {
    /// Seconds per tick.
    #[must_use]
    pub fn tick_interval(&self) -> f64 {
        1.0 / self.tick_rate
    }

    /// Reject a non-positive or non-finite tick rate and blank schedule
    /// entries.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tick_rate.is_finite() || self.tick_rate <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "tick_rate must be a positive number, got {}",
                self.tick_rate
            )));
        }
        if let Some(name) = self.schedule.iter().find(|name| name.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "schedule contains a blank system name: {name:?}"
            )));
        }
        Ok(())
    }
}

/// Parse and validate a config from a JSON string.
pub fn from_json_str(json: &str) -> Result<TickConfig, ConfigError> {
    let config: TickConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

/// Read, parse, and validate the config file at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<TickConfig, ConfigError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = from_json_str(&json)?;
    info!(
        path = %path.display(),
        tick_rate = config.tick_rate,
        max_ticks = config.max_ticks,
        schedule = ?config.schedule,
        "loaded tick config"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = from_json_str("{}").unwrap();
        assert_eq!(config, TickConfig::default());
        assert!((config.tick_interval() - 1.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_full_config() {
        let config = from_json_str(
            r#"{ "tick_rate": 30.0, "max_ticks": 5, "schedule": ["movement", "logger"] }"#,
        )
        .unwrap();
        assert!((config.tick_rate - 30.0).abs() < f64::EPSILON);
        assert_eq!(config.max_ticks, 5);
        assert_eq!(config.schedule, vec!["movement", "logger"]);
    }

    #[test]
    fn test_rejects_non_positive_tick_rate() {
        let err = from_json_str(r#"{ "tick_rate": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{err:?}");
    }

    #[test]
    fn test_rejects_blank_schedule_entry() {
        let err = from_json_str(r#"{ "schedule": ["movement", " "] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{err:?}");
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            from_json_str("{ tick_rate: }"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            from_json_str(r#"{ "tick_rat": 10 }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("tick-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "max_ticks": 3 }"#).unwrap();
        let config = load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.max_ticks, 3);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
