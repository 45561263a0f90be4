//! Catalog configuration: backend selection and logging settings.
//!
//! # Responsibility
//! - Decode configuration documents into typed settings.
//! - Construct the one repository backend a process will use.
//!
//! # Invariants
//! - The backend is picked here, once; callers only see `ItemRepository`.
//!
//! Example document:
//!
//! ```json
//! {
//!   "store": { "backend": "sqlite", "path": "/var/lib/catalog/items.db" },
//!   "logging": { "level": "info", "dir": "/var/log/catalog" }
//! }
//! ```

use crate::logging::{default_log_level, init_logging, LoggingError};
use crate::repo::json_repo::JsonItemRepository;
use crate::repo::sqlite_repo::SqliteItemRepository;
use crate::repo::{ItemRepository, RepoResult};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Storage backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreConfig {
    /// Whole collection in one JSON document.
    Json { path: PathBuf },
    /// Normalized SQLite database.
    Sqlite { path: PathBuf },
}

impl StoreConfig {
    /// Opens the configured backend.
    pub fn open(&self) -> RepoResult<Box<dyn ItemRepository + Send>> {
        let repo: Box<dyn ItemRepository + Send> = match self {
            Self::Json { path } => Box::new(JsonItemRepository::open(path.clone())?),
            Self::Sqlite { path } => Box::new(SqliteItemRepository::open(path)?),
        };
        Ok(repo)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogConfig {
    /// Defaults to [`default_log_level`].
    #[serde(default)]
    pub level: Option<String>,
    pub dir: PathBuf,
}

/// Top-level configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogConfig {
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: Option<LogConfig>,
}

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid catalog config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

impl CatalogConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(ConfigError::Parse)
    }

    /// Reads and decodes the config file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Starts file logging when a `logging` section is present.
    ///
    /// Without one this is a no-op.
    pub fn init_logging(&self) -> Result<(), LoggingError> {
        match &self.logging {
            Some(logging) => init_logging(
                logging.level.as_deref().unwrap_or(default_log_level()),
                &logging.dir,
            ),
            None => Ok(()),
        }
    }
}
