//! Runtime configuration for the pet catalog core.
//!
//! # Responsibility
//! - Describe where the database lives, which authority is routed, and how
//!   logging is set up.
//! - Load those settings from `PETS_*` environment variables.
//!
//! # Invariants
//! - A missing database path means an in-memory database.
//! - The authority is a single non-empty URI authority (no `/`, no whitespace).
//! - Empty or whitespace-only variables fall back to the defaults.

use crate::contract::CONTENT_AUTHORITY;
use crate::db::{DbLocation, PetDbHelper};
use crate::logging::{default_log_level, init_logging, normalize_level};
use crate::provider::pet_provider::PetProvider;
use ::config::{Config, Environment};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Environment prefix: `PETS_DB_PATH`, `PETS_AUTHORITY`, `PETS_LOG_LEVEL`, `PETS_LOG_DIR`.
pub const ENV_PREFIX: &str = "PETS";

/// Database file name used by callers that need a default on-disk location.
pub const DEFAULT_DB_FILE_NAME: &str = "pets.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Load(String),
    InvalidAuthority(String),
    InvalidLogLevel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(message) => write!(f, "failed to load configuration: {message}"),
            Self::InvalidAuthority(value) => write!(f, "invalid content authority `{value}`"),
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
        }
    }
}

impl Error for ConfigError {}

impl From<::config::ConfigError> for ConfigError {
    fn from(value: ::config::ConfigError) -> Self {
        Self::Load(value.to_string())
    }
}

/// Pet catalog settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PetStoreConfig {
    /// Database file; `None` selects an in-memory database.
    pub db_path: Option<PathBuf>,
    /// Content authority answered by the router.
    pub authority: String,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for PetStoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            authority: CONTENT_AUTHORITY.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl PetStoreConfig {
    /// Loads settings from `PETS_*` environment variables over the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(Environment::with_prefix(ENV_PREFIX))
    }

    fn load(environment: Environment) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(environment.ignore_empty(true))
            .build()?;
        let config = settings.try_deserialize::<Self>()?.without_blank_values();
        config.validate()?;
        Ok(config)
    }

    // Whitespace-only values count as unset.
    fn without_blank_values(mut self) -> Self {
        let defaults = Self::default();
        let is_blank_path = |path: &Option<PathBuf>| {
            path.as_ref()
                .is_some_and(|path| path.to_string_lossy().trim().is_empty())
        };
        if is_blank_path(&self.db_path) {
            self.db_path = None;
        }
        if is_blank_path(&self.log_dir) {
            self.log_dir = None;
        }
        self.authority = self.authority.trim().to_string();
        if self.authority.is_empty() {
            self.authority = defaults.authority;
        }
        self.log_level = self.log_level.trim().to_string();
        if self.log_level.is_empty() {
            self.log_level = defaults.log_level;
        }
        self
    }

    /// Checks authority shape and log level.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let authority = self.authority.as_str();
        if authority.is_empty()
            || authority
                .chars()
                .any(|c| c == '/' || c == '?' || c == '#' || c.is_whitespace())
        {
            return Err(ConfigError::InvalidAuthority(self.authority.clone()));
        }
        normalize_level(&self.log_level).map_err(ConfigError::InvalidLogLevel)?;
        Ok(())
    }

    pub fn db_location(&self) -> DbLocation {
        match &self.db_path {
            Some(path) => DbLocation::File(path.clone()),
            None => DbLocation::Memory,
        }
    }

    /// Builds a router over the configured database and authority.
    ///
    /// The database is not opened until the first operation.
    pub fn build_provider(&self) -> PetProvider {
        PetProvider::with_authority(PetDbHelper::new(self.db_location()), self.authority.clone())
    }

    /// Starts file logging when `log_dir` is set.
    ///
    /// Returns `Ok(false)` when no log directory is configured.
    pub fn init_logging(&self) -> Result<bool, String> {
        let Some(log_dir) = &self.log_dir else {
            return Ok(false);
        };
        let log_dir = log_dir
            .to_str()
            .ok_or_else(|| format!("log_dir `{}` is not valid UTF-8", log_dir.display()))?;
        init_logging(&self.log_level, log_dir)?;
        Ok(true)
    }
}
