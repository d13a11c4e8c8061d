//! Engine configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! gives the standard limits: rule durations of 15-180 minutes and ad-hoc
//! durations of at least 20 minutes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validate::ValidationLimits;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid limits: {0}")]
    Limits(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub limits: ValidationLimits,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    fn check(&self) -> Result<(), ConfigError> {
        let limits = &self.limits;
        if limits.min_rule_duration == 0 || limits.min_adhoc_duration == 0 {
            return Err(ConfigError::Limits(
                "minimum durations must be at least 1 minute".to_string(),
            ));
        }
        if limits.min_rule_duration > limits.max_rule_duration {
            return Err(ConfigError::Limits(format!(
                "min_rule_duration ({}) exceeds max_rule_duration ({})",
                limits.min_rule_duration, limits.max_rule_duration
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_default_limits() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config.limits, ValidationLimits::default());
    }

    #[test]
    fn partial_limits_keep_other_defaults() {
        let config =
            EngineConfig::from_json_str(r#"{"limits":{"min_adhoc_duration":10}}"#).unwrap();
        assert_eq!(config.limits.min_adhoc_duration, 10);
        assert_eq!(config.limits.max_rule_duration, 180);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(matches!(
            EngineConfig::from_json_str(r#"{"limit":{}}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn inverted_rule_bounds_are_rejected() {
        let json = r#"{"limits":{"min_rule_duration":90,"max_rule_duration":60}}"#;
        assert!(matches!(
            EngineConfig::from_json_str(json),
            Err(ConfigError::Limits(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            EngineConfig::load("/nonexistent/slot-engine.json"),
            Err(ConfigError::Io { .. })
        ));
    }
}
