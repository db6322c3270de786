//! Process configuration resolved from environment variables.
//!
//! # Responsibility
//! - Resolve database path and logging settings once at startup.
//!
//! # Invariants
//! - Blank values are treated as unset.
//! - `log_level` is always one of `trace|debug|info|warn|error`.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "PROGRESS_TRACKER_DB_PATH";
pub const LOG_DIR_ENV: &str = "PROGRESS_TRACKER_LOG_DIR";
pub const LOG_LEVEL_ENV: &str = "PROGRESS_TRACKER_LOG_LEVEL";
const DEFAULT_DB_FILE_NAME: &str = "progress_tracker.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(message) => write!(f, "{LOG_LEVEL_ENV}: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Startup configuration for the core engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    /// Logging stays disabled when unset.
    pub log_dir: Option<PathBuf>,
    pub log_level: &'static str,
}

impl CoreConfig {
    /// Reads `PROGRESS_TRACKER_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = non_blank(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
        let log_dir = non_blank(LOG_DIR_ENV).map(PathBuf::from);
        let log_level = match non_blank(LOG_LEVEL_ENV) {
            Some(raw) => normalize_level(&raw).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };

        Ok(Self {
            db_path,
            log_dir,
            log_level,
        })
    }
}
