//! Repository contract and persistence backends for catalog items.
//!
//! # Responsibility
//! - Define one storage-agnostic contract for insert/list/lookup/search.
//! - Keep file and SQL details inside each backend.
//!
//! # Invariants
//! - Write paths call `NewItem::validate()` before touching storage.
//! - `NotFound` is a semantic outcome and is never used for storage failures.
//! - No failure is logged and dropped; every error reaches the caller.

use crate::db::DbError;
use crate::model::item::{Item, ItemId, ItemValidationError, NewItem};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod category;
pub mod json_repo;
pub mod sqlite_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error returned by every repository operation.
#[derive(Debug)]
pub enum RepoError {
    /// Insert payload breaks an item invariant.
    Validation(ItemValidationError),
    /// Lookup key is not a number.
    InvalidId(String),
    /// No item has the requested identifier.
    NotFound(ItemId),
    /// SQLite or bootstrap failure.
    Db(DbError),
    /// Document file could not be read or written.
    Io(std::io::Error),
    /// Document contents could not be decoded, or the collection could not
    /// be encoded.
    Document(serde_json::Error),
    /// Persisted state cannot be mapped to an [`Item`].
    InvalidData(String),
    /// The repository was closed before this call.
    Closed,
}

/// Coarse error class used by front ends to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    Storage,
}

impl RepoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Validation(_) | Self::InvalidId(_) => ErrorKind::InvalidInput,
            Self::Db(_) | Self::Io(_) | Self::Document(_) | Self::InvalidData(_) | Self::Closed => {
                ErrorKind::Storage
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidId(raw) => write!(f, "invalid item id `{raw}`"),
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "item document io failed: {err}"),
            Self::Document(err) => write!(f, "malformed item document: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted item data: {message}"),
            Self::Closed => write!(f, "item repository is closed"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Document(err) => Some(err),
            Self::InvalidId(_) | Self::NotFound(_) | Self::InvalidData(_) | Self::Closed => None,
        }
    }
}

impl From<ItemValidationError> for RepoError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Statement(value))
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Document(value)
    }
}

/// Repository interface shared by the document and relational stores.
///
/// Exactly one backend is chosen when the repository is constructed.
pub trait ItemRepository {
    /// Persists a new item and returns the identifier the backend assigned.
    fn insert(&mut self, item: &NewItem) -> RepoResult<ItemId>;
    /// Returns every item in backend-natural order.
    fn get_all(&self) -> RepoResult<Vec<Item>>;
    /// Returns the item with `id`, or `RepoError::NotFound` (including for
    /// negative ids).
    fn get_by_id(&self, id: ItemId) -> RepoResult<Item>;
    /// Returns items whose name contains `keyword` (case-sensitive).
    fn search_by_name(&self, keyword: &str) -> RepoResult<Vec<Item>>;
    /// Releases the storage handle. Later calls other than `close` fail with
    /// `RepoError::Closed`.
    fn close(&mut self) -> RepoResult<()>;
}

impl<R: ItemRepository + ?Sized> ItemRepository for Box<R> {
    fn insert(&mut self, item: &NewItem) -> RepoResult<ItemId> {
        (**self).insert(item)
    }

    fn get_all(&self) -> RepoResult<Vec<Item>> {
        (**self).get_all()
    }

    fn get_by_id(&self, id: ItemId) -> RepoResult<Item> {
        (**self).get_by_id(id)
    }

    fn search_by_name(&self, keyword: &str) -> RepoResult<Vec<Item>> {
        (**self).search_by_name(keyword)
    }

    fn close(&mut self) -> RepoResult<()> {
        (**self).close()
    }
}

/// Parses an untrusted lookup key.
///
/// Only malformed keys fail here. Negative numbers parse and then fail the
/// lookup as `NotFound`.
pub fn parse_item_id(raw: &str) -> RepoResult<ItemId> {
    raw.parse()
        .map_err(|_| RepoError::InvalidId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{parse_item_id, ErrorKind, RepoError};

    #[test]
    fn parse_item_id_rejects_only_malformed_keys() {
        assert_eq!(parse_item_id("42").unwrap(), 42);
        assert_eq!(parse_item_id("-3").unwrap(), -3);
        assert!(matches!(parse_item_id("4x"), Err(RepoError::InvalidId(raw)) if raw == "4x"));
        assert!(matches!(parse_item_id(""), Err(RepoError::InvalidId(_))));
    }

    #[test]
    fn error_kind_keeps_not_found_apart_from_storage() {
        assert_eq!(RepoError::NotFound(7).kind(), ErrorKind::NotFound);
        assert_eq!(RepoError::Closed.kind(), ErrorKind::Storage);
        assert_eq!(
            RepoError::InvalidId("x".to_string()).kind(),
            ErrorKind::InvalidInput
        );
        assert!(RepoError::NotFound(0).is_not_found());
    }
}
