//! Runtime configuration from the environment.
//!
//! `main` loads an optional `.env` first (dotenvy), then reads:
//!
//! | Variable                   | Default   |
//! |----------------------------|-----------|
//! | `ARENA_PORT`               | 8081      |
//! | `DUELIST_URL`              | unset: embedded directory |
//! | `DUELIST_PORT`             | 50051     |
//! | `ARENA_HISTORY_PATH`       | unset: in-memory history |
//! | `ARENA_FIGHTERS_PATH`      | unset     |
//! | `ARENA_SEED`               | unset: OS entropy |
//! | `ARENA_FETCH_TIMEOUT_SECS` | 5         |
//!
//! Command-line flags override these values.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub(crate) const DEFAULT_ARENA_PORT: u16 = 8081;
pub(crate) const DEFAULT_DUELIST_PORT: u16 = 50051;
pub(crate) const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub(crate) enum ConfigError {
    #[error("invalid value {value:?} for {key}: {message}")]
    Invalid {
        key: &'static str,
        value: String,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ArenaConfig {
    pub(crate) port: u16,
    pub(crate) duelist_url: Option<String>,
    pub(crate) duelist_port: u16,
    pub(crate) history_path: Option<PathBuf>,
    pub(crate) fighters_path: Option<PathBuf>,
    pub(crate) seed: Option<u64>,
    pub(crate) fetch_timeout: Duration,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_ARENA_PORT,
            duelist_url: None,
            duelist_port: DEFAULT_DUELIST_PORT,
            history_path: None,
            fighters_path: None,
            seed: None,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

impl ArenaConfig {
    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Empty values count as unset.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let fetch_timeout = match parse::<u64>(&get, "ARENA_FETCH_TIMEOUT_SECS")? {
            Some(0) => {
                return Err(ConfigError::Invalid {
                    key: "ARENA_FETCH_TIMEOUT_SECS",
                    value: "0".to_string(),
                    message: "timeout must be at least one second".to_string(),
                })
            }
            Some(secs) => Duration::from_secs(secs),
            None => defaults.fetch_timeout,
        };

        Ok(Self {
            port: parse(&get, "ARENA_PORT")?.unwrap_or(defaults.port),
            duelist_url: get("DUELIST_URL"),
            duelist_port: parse(&get, "DUELIST_PORT")?.unwrap_or(defaults.duelist_port),
            history_path: get("ARENA_HISTORY_PATH").map(PathBuf::from),
            fighters_path: get("ARENA_FIGHTERS_PATH").map(PathBuf::from),
            seed: parse(&get, "ARENA_SEED")?,
            fetch_timeout,
        })
    }
}

fn parse<T>(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::Invalid {
                key,
                value: raw.clone(),
                message: e.to_string(),
            }),
    }
}
