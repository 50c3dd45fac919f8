//! Process configuration.
//!
//! Loaded once at startup and passed to the components that need it. Nothing
//! below `main` reads the environment.

use crate::error::ConfigError;
use std::path::PathBuf;

pub const SOURCE_ROOT_VAR: &str = "SUMMARY_SOURCE_ROOT";
pub const STORE_TARGET_VAR: &str = "SUMMARY_STORE_TARGET";
pub const NOTIFY_TARGET_VAR: &str = "SUMMARY_NOTIFY_TARGET";
pub const INPUT_PREFIX_VAR: &str = "SUMMARY_INPUT_PREFIX";

/// Addresses of the input store and both sinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory that holds one subdirectory per container.
    pub source_root: PathBuf,
    /// Ledger file the persistence sink appends to.
    pub store_target: PathBuf,
    /// Outbox directory the notification sink writes to.
    pub notify_target: PathBuf,
    /// Only objects whose key starts with this prefix are processed.
    pub input_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_root: PathBuf::from("."),
            store_target: PathBuf::from("summary_records.csv"),
            notify_target: PathBuf::from("outbox"),
            input_prefix: "input/".to_string(),
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Unset variables fall back to the defaults. A variable that is set to an
    /// empty string is an error, except for the input prefix, where empty
    /// means "every key".
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let path = |var: &'static str, default: PathBuf| match lookup(var) {
            None => Ok(default),
            Some(v) if v.is_empty() => Err(ConfigError::Empty { var }),
            Some(v) => Ok(PathBuf::from(v)),
        };

        Ok(Config {
            source_root: path(SOURCE_ROOT_VAR, defaults.source_root)?,
            store_target: path(STORE_TARGET_VAR, defaults.store_target)?,
            notify_target: path(NOTIFY_TARGET_VAR, defaults.notify_target)?,
            input_prefix: lookup(INPUT_PREFIX_VAR).unwrap_or(defaults.input_prefix),
        })
    }
}
