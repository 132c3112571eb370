use chrono_tz::Tz;
use std::env;
use std::str::FromStr;
use thiserror::Error;

use crate::services::presenter::DEFAULT_STUDIO_ZONE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub studio: StudioConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
    pub acquire_timeout_seconds: u64,
    pub statement_timeout_ms: u64,
}

#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Zone in which class times are authored and stored.
    pub timezone: Tz,
    pub seed_on_startup: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);
        Ok(Config {
            app: AppConfig {
                host: vars.or("HOST", "0.0.0.0"),
                port: vars.parse_or("PORT", 8000)?,
                rust_log: vars.or("RUST_LOG", "fitness_studio=debug,tower_http=debug"),
                log_format: vars.parse_or("LOG_FORMAT", LogFormat::Pretty)?,
            },
            database: DatabaseConfig {
                url: vars.required("DATABASE_URL")?,
                pool_size: vars.parse_or("DB_POOL_SIZE", 10)?,
                acquire_timeout_seconds: vars.parse_or("DB_ACQUIRE_TIMEOUT_SECONDS", 5)?,
                statement_timeout_ms: vars.parse_or("DB_STATEMENT_TIMEOUT_MS", 5_000)?,
            },
            studio: StudioConfig {
                timezone: vars.parse_or("STUDIO_TIMEZONE", DEFAULT_STUDIO_ZONE)?,
                seed_on_startup: vars.parse_or("SEED_ON_STARTUP", true)?,
            },
        })
    }
}

struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::Missing(key))
    }

    fn parse_or<T: FromStr>(&self, key: &'static str, default: T) -> Result<T, ConfigError> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key, value }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/studio")]).unwrap();
        assert_eq!(config.app.port, 8000);
        assert_eq!(config.app.log_format, LogFormat::Pretty);
        assert_eq!(config.database.pool_size, 10);
        assert_eq!(config.studio.timezone, chrono_tz::Asia::Kolkata);
        assert!(config.studio.seed_on_startup);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/studio"),
            ("PORT", "5000"),
            ("LOG_FORMAT", "JSON"),
            ("STUDIO_TIMEZONE", "Europe/Berlin"),
            ("SEED_ON_STARTUP", "false"),
        ])
        .unwrap();
        assert_eq!(config.app.port, 5000);
        assert_eq!(config.app.log_format, LogFormat::Json);
        assert_eq!(config.studio.timezone, chrono_tz::Europe::Berlin);
        assert!(!config.studio.seed_on_startup);
    }

    #[test]
    fn test_database_url_is_required() {
        assert!(matches!(config_from(&[]), Err(ConfigError::Missing("DATABASE_URL"))));
    }

    #[test]
    fn test_bad_values_are_reported() {
        let err = config_from(&[
            ("DATABASE_URL", "postgres://localhost/studio"),
            ("STUDIO_TIMEZONE", "Atlantis/Capital"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "STUDIO_TIMEZONE", .. }));

        let err = config_from(&[("DATABASE_URL", "x"), ("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }
}
