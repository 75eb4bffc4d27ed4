//! Configuration loading and representation.
//!
//! `AppConfig` is built once at startup (normally from the environment) and
//! passed explicitly to whatever needs it.

use std::net::SocketAddr;
use std::str::FromStr;

use movietrack_observability::LogFormat;
use thiserror::Error;

pub const ENV_BIND_ADDR: &str = "MOVIETRACK_BIND_ADDR";
pub const ENV_BACKEND: &str = "MOVIETRACK_BACKEND";
pub const ENV_LOG_FORMAT: &str = "MOVIETRACK_LOG_FORMAT";
pub const ENV_ENABLE_METRICS: &str = "ENABLE_METRICS";
pub const ENV_MONGODB_CONNECTION_STRING: &str = "MONGODB_CONNECTION_STRING";
pub const ENV_MONGODB_DATABASE_NAME: &str = "MONGODB_DATABASE_NAME";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MONGODB_CONNECTION_STRING: &str = "mongodb://localhost:27017";
pub const DEFAULT_MONGODB_DATABASE_NAME: &str = "movie_track_db";
pub const DEFAULT_ENABLE_METRICS: bool = true;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: invalid value `{value}` ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(var: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Which storage backend serves the movie repository.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum BackendKind {
    #[default]
    Memory,
    Mongo,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "in-memory" | "in_memory" => Ok(Self::Memory),
            "mongo" | "mongodb" => Ok(Self::Mongo),
            _ => Err("expected one of: memory, mongo".to_string()),
        }
    }
}

/// MongoDB connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoConfig {
    pub connection_string: String,
    pub database_name: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            connection_string: DEFAULT_MONGODB_CONNECTION_STRING.to_string(),
            database_name: DEFAULT_MONGODB_DATABASE_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub backend: BackendKind,
    pub log_format: LogFormat,
    /// Collect request metrics and serve them on `/metrics`.
    pub enable_metrics: bool,
    pub mongo: MongoConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            backend: BackendKind::default(),
            log_format: LogFormat::default(),
            enable_metrics: DEFAULT_ENABLE_METRICS,
            mongo: MongoConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source; unset or blank variables use defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let bind_addr = match get(ENV_BIND_ADDR) {
            Some(v) => v
                .parse::<SocketAddr>()
                .map_err(|e| ConfigError::invalid(ENV_BIND_ADDR, &v, e.to_string()))?,
            None => DEFAULT_BIND_ADDR
                .parse()
                .map_err(|_| ConfigError::invalid(ENV_BIND_ADDR, DEFAULT_BIND_ADDR, "bad default"))?,
        };

        let backend = match get(ENV_BACKEND) {
            Some(v) => v
                .parse::<BackendKind>()
                .map_err(|e| ConfigError::invalid(ENV_BACKEND, &v, e))?,
            None => BackendKind::default(),
        };

        let log_format = match get(ENV_LOG_FORMAT) {
            Some(v) => v
                .parse::<LogFormat>()
                .map_err(|e| ConfigError::invalid(ENV_LOG_FORMAT, &v, e))?,
            None => LogFormat::default(),
        };

        let enable_metrics = match get(ENV_ENABLE_METRICS) {
            Some(v) => parse_bool(&v).ok_or_else(|| {
                ConfigError::invalid(ENV_ENABLE_METRICS, &v, "expected true or false")
            })?,
            None => DEFAULT_ENABLE_METRICS,
        };

        let mongo = MongoConfig {
            connection_string: get(ENV_MONGODB_CONNECTION_STRING)
                .unwrap_or_else(|| DEFAULT_MONGODB_CONNECTION_STRING.to_string()),
            database_name: get(ENV_MONGODB_DATABASE_NAME)
                .unwrap_or_else(|| DEFAULT_MONGODB_DATABASE_NAME.to_string()),
        };

        Ok(Self {
            bind_addr,
            backend,
            log_format,
            enable_metrics,
            mongo,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.mongo.database_name, "movie_track_db");
        assert!(config.enable_metrics);
    }

    #[test]
    fn reads_every_variable() {
        let config = config_from(&[
            (ENV_BIND_ADDR, "127.0.0.1:9000"),
            (ENV_BACKEND, "MongoDB"),
            (ENV_LOG_FORMAT, "pretty"),
            (ENV_ENABLE_METRICS, "False"),
            (ENV_MONGODB_CONNECTION_STRING, "mongodb://db:27017"),
            (ENV_MONGODB_DATABASE_NAME, "movies_test"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.backend, BackendKind::Mongo);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(!config.enable_metrics);
        assert_eq!(config.mongo.connection_string, "mongodb://db:27017");
        assert_eq!(config.mongo.database_name, "movies_test");
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[(ENV_BACKEND, "  "), (ENV_MONGODB_DATABASE_NAME, "")]).unwrap();
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.mongo.database_name, DEFAULT_MONGODB_DATABASE_NAME);
    }

    #[test]
    fn malformed_values_are_reported() {
        let err = config_from(&[(ENV_BACKEND, "postgres")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: ENV_BACKEND, .. }));

        let err = config_from(&[(ENV_BIND_ADDR, "not-an-addr")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: ENV_BIND_ADDR, .. }));

        let err = config_from(&[(ENV_ENABLE_METRICS, "maybe")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: ENV_ENABLE_METRICS, .. }));
    }
}
