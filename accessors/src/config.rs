use crate::error::AccessorError;
use ::config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::str::FromStr;

/// Every setting is read from `ACCESSORS_<FIELD>`, e.g. `ACCESSORS_INITIAL_CAPACITY`.
pub const ENV_PREFIX: &str = "ACCESSORS";
pub const LOG_ENV: &str = "ACCESSORS_LOG";

pub const DEFAULT_INITIAL_CAPACITY: usize = 64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
#[repr(u8)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    #[default]
    Warn = 2,
    Info = 3,
    Debug = 4,
}

impl LogLevel {
    pub(crate) fn from_u8(raw: u8) -> LogLevel {
        match raw {
            0 => LogLevel::Off,
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            _ => LogLevel::Debug,
        }
    }
}

impl FromStr for LogLevel {
    type Err = AccessorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(LogLevel::Off),
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            _ => Err(AccessorError::InvalidConfig { key: LOG_ENV, value: s.to_string() }),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = AccessorError;

    fn try_from(value: String) -> Result<Self, <LogLevel as TryFrom<String>>::Error> {
        value.parse()
    }
}

/// Settings of an [`AccessorRegistry`](crate::AccessorRegistry) and of the crate logger.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Threshold of the crate logger.
    pub log: LogLevel,
    /// Initial number of type slots reserved in each of the two caches.
    pub initial_capacity: usize,
    /// Build factories of all derived types when the registry is created.
    pub preload: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig { log: LogLevel::default(), initial_capacity: DEFAULT_INITIAL_CAPACITY, preload: false }
    }
}

impl RegistryConfig {
    /// Reads `ACCESSORS_*` from the process environment.
    pub fn from_env() -> RegistryConfig {
        Self::resolve(Environment::with_prefix(ENV_PREFIX))
    }

    pub fn load(environment: Environment) -> Result<RegistryConfig, ConfigError> {
        Config::builder().add_source(environment.try_parsing(true)).build()?.try_deserialize()
    }

    /// Unreadable settings fall back to defaults with a warning.
    pub(crate) fn resolve(environment: Environment) -> RegistryConfig {
        match Self::load(environment) {
            Ok(config) => config,
            Err(e) => {
                warn!("Invalid {}_* settings, using defaults: {}", ENV_PREFIX, e);
                RegistryConfig::default()
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn env_source(pairs: &[(&str, &str)]) -> Environment {
    let vars: ::config::Map<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    Environment::with_prefix(ENV_PREFIX).source(Some(vars))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_nothing_is_set() {
        assert_eq!(RegistryConfig::load(env_source(&[])).unwrap(), RegistryConfig::default());
    }

    #[test]
    fn reads_prefixed_settings() {
        let config = RegistryConfig::load(env_source(&[
            ("ACCESSORS_LOG", "DEBUG"),
            ("ACCESSORS_INITIAL_CAPACITY", "8"),
            ("ACCESSORS_PRELOAD", "true"),
            ("OTHER_PRELOAD", "false"),
        ]))
        .unwrap();
        assert_eq!(config, RegistryConfig { log: LogLevel::Debug, initial_capacity: 8, preload: true });
    }

    #[test]
    fn invalid_values_are_rejected_and_resolve_to_defaults() {
        for pairs in [
            [("ACCESSORS_INITIAL_CAPACITY", "many")],
            [("ACCESSORS_PRELOAD", "maybe")],
            [("ACCESSORS_LOG", "loud")],
        ] {
            assert!(RegistryConfig::load(env_source(&pairs)).is_err(), "{:?} accepted", pairs);
            assert_eq!(RegistryConfig::resolve(env_source(&pairs)), RegistryConfig::default());
        }
    }

    #[test]
    fn log_level_parsing() {
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!(" off ".parse::<LogLevel>().unwrap(), LogLevel::Off);
        assert!(matches!("loud".parse::<LogLevel>(), Err(AccessorError::InvalidConfig { key: LOG_ENV, .. })));
        assert!(LogLevel::Error < LogLevel::Debug);
        assert_eq!(LogLevel::from_u8(LogLevel::Info as u8), LogLevel::Info);
    }
}
