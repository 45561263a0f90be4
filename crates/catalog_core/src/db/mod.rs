//! SQLite storage bootstrap for the relational item store.
//!
//! # Responsibility
//! - Open and configure SQLite connections.
//! - Create the catalog schema before any repository touches the connection.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - A database written by a newer schema is rejected, never downgraded.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or querying the catalog database.
#[derive(Debug)]
pub enum DbError {
    /// The database at `location` could not be opened.
    Open {
        location: String,
        source: rusqlite::Error,
    },
    /// A statement against an open catalog database failed.
    Statement(rusqlite::Error),
    /// The file was written by a newer catalog schema than this build knows.
    NewerSchema { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { location, source } => {
                write!(f, "failed to open catalog database `{location}`: {source}")
            }
            Self::Statement(err) => write!(f, "catalog query failed: {err}"),
            Self::NewerSchema { found, supported } => write!(
                f,
                "catalog schema version {found} is newer than supported {supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Statement(err) => Some(err),
            Self::NewerSchema { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Statement(value)
    }
}
