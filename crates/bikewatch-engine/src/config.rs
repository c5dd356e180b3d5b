//! Configuration loading
//!
//! Resolution order, later wins: built-in defaults, the TOML file, then
//! `BIKEWATCH_*` environment variables. Command-line flags are applied by
//! the caller on top of the returned `Config`.

use std::path::{Path, PathBuf};

use bikewatch_core::errors::{ExError, ExErrorKind, ExResult};
use bikewatch_core::logging_facility::Profile;
use serde::{Deserialize, Serialize};

/// File read when no explicit config path is given and it exists
pub const DEFAULT_CONFIG_FILE: &str = "bikewatch.toml";

pub const ENV_DB_PATH: &str = "BIKEWATCH_DB_PATH";
pub const ENV_MAX_CONFLICT_RETRIES: &str = "BIKEWATCH_MAX_CONFLICT_RETRIES";
pub const ENV_LOG_PROFILE: &str = "BIKEWATCH_LOG_PROFILE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// SQLite database file
    pub db_path: PathBuf,

    /// How many times a conflicting transition is recomputed and reapplied
    pub max_conflict_retries: u32,

    pub log_profile: Profile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(".bikewatch/store.db"),
            max_conflict_retries: 3,
            log_profile: Profile::Development,
        }
    }
}

fn config_error(message: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::Config)
        .with_op("load_config")
        .with_message(message)
}

impl Config {
    /// Load from `path` (which must exist) or from `bikewatch.toml` if present,
    /// then apply environment overrides
    ///
    /// # Errors
    /// `Config` for unreadable files, malformed TOML or invalid values.
    pub fn load(path: Option<&Path>) -> ExResult<Self> {
        let file = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.is_file()),
        };

        let config = match file {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };

        config.with_env(|key| std::env::var(key).ok())
    }

    /// Parse a TOML file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> ExResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| config_error(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
            .map_err(|e| e.with_entity_id(path.display().to_string()))
    }

    pub fn from_toml_str(text: &str) -> ExResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| config_error(format!("invalid TOML: {}", e)))?;
        config.validate()
    }

    /// Apply `BIKEWATCH_*` overrides read through `lookup`
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> ExResult<Self> {
        if let Some(path) = lookup(ENV_DB_PATH).filter(|v| !v.is_empty()) {
            self.db_path = PathBuf::from(path);
        }

        if let Some(raw) = lookup(ENV_MAX_CONFLICT_RETRIES) {
            self.max_conflict_retries = raw.trim().parse().map_err(|_| {
                config_error(format!(
                    "{} must be a positive integer, got '{}'",
                    ENV_MAX_CONFLICT_RETRIES, raw
                ))
            })?;
        }

        if let Some(raw) = lookup(ENV_LOG_PROFILE) {
            self.log_profile = raw
                .parse()
                .map_err(|e: String| config_error(format!("{}: {}", ENV_LOG_PROFILE, e)))?;
        }

        self.validate()
    }

    /// # Errors
    /// `Config` if `max_conflict_retries` is zero or `db_path` is empty.
    pub fn validate(self) -> ExResult<Self> {
        if self.max_conflict_retries == 0 {
            return Err(config_error("max_conflict_retries must be at least 1"));
        }
        if self.db_path.as_os_str().is_empty() {
            return Err(config_error("db_path must not be empty"));
        }
        Ok(self)
    }
}
