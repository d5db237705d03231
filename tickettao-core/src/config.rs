//! Configuration types

use crate::error::{ConfigError, TicketError, TicketResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Output format of the log layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line output
    #[default]
    Compact,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidValue {
                field: "log.format".to_string(),
                value: other.to_string(),
                reason: "expected \"compact\" or \"json\"".to_string(),
            }),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive string, e.g. `"tickettao=debug,info"`
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "tickettao=info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// Top-level configuration for a process embedding the ticketing core.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TicketingConfig {
    pub log: LogConfig,
}

impl TicketingConfig {
    /// Create from environment variables with fallback to defaults.
    ///
    /// Environment variables:
    /// - `TICKETTAO_LOG`: filter directives (default: `tickettao=info`)
    /// - `TICKETTAO_LOG_FORMAT`: `compact` or `json` (default: `compact`)
    ///
    /// An unparseable format falls back to the default; use [`validate`](Self::validate)
    /// to reject other bad values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading variables through `get`.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = LogConfig::default();

        Self {
            log: LogConfig {
                filter: get("TICKETTAO_LOG").unwrap_or(defaults.filter),
                format: get("TICKETTAO_LOG_FORMAT")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.format),
            },
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> TicketResult<()> {
        if self.log.filter.trim().is_empty() {
            return Err(TicketError::Config(ConfigError::InvalidValue {
                field: "log.filter".to_string(),
                value: self.log.filter.clone(),
                reason: "log filter must not be empty".to_string(),
            }));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_from_env_defaults() {
        let config = TicketingConfig::from_lookup(lookup(&[]));
        assert_eq!(config, TicketingConfig::default());
    }

    #[test]
    fn test_from_env_reads_overrides() {
        let config = TicketingConfig::from_lookup(lookup(&[
            ("TICKETTAO_LOG", "tickettao=debug,warn"),
            ("TICKETTAO_LOG_FORMAT", "Json"),
        ]));
        assert_eq!(config.log.filter, "tickettao=debug,warn");
        assert_eq!(config.log.format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_env_bad_format_falls_back() {
        let config = TicketingConfig::from_lookup(lookup(&[("TICKETTAO_LOG_FORMAT", "pretty")]));
        assert_eq!(config.log.format, LogFormat::Compact);
        assert_eq!(config.log.filter, "tickettao=info");
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = TicketingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.log.format, LogFormat::Compact);
    }

    #[test]
    fn test_config_rejects_empty_filter() {
        let config = TicketingConfig {
            log: LogConfig {
                filter: "  ".to_string(),
                format: LogFormat::Json,
            },
        };
        assert!(matches!(
            config.validate(),
            Err(TicketError::Config(ConfigError::InvalidValue { field, .. })) if field == "log.filter"
        ));
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("compact".parse::<LogFormat>(), Ok(LogFormat::Compact));
        assert!("pretty".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_config_serde() {
        let config = TicketingConfig::default();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["log"]["format"], "compact");
        let back: TicketingConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }
}
