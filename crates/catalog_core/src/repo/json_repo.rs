//! Document-store item repository backed by a single JSON file.
//!
//! # Responsibility
//! - Persist the whole item collection as `{"items":[...]}`.
//! - Derive identifiers from list position on every load.
//!
//! # Invariants
//! - A zero-length file is an empty collection.
//! - Identifiers are never written to the file; `id == index`.
//! - The collection is encoded before the file is touched, and replaced via
//!   temp-file rename, so a failed insert leaves the previous file intact.
//! - The replacement keeps the permissions of the file it replaces.
//! - No locking: concurrent inserts race on read-modify-write. Callers must
//!   serialize writers.

use crate::model::item::{Item, ItemId, NewItem};
use crate::repo::{ItemRepository, RepoError, RepoResult};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ItemsDocument {
    // Some writers emit `null` for an empty list.
    #[serde(default, deserialize_with = "null_as_empty")]
    items: Vec<StoredItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredItem {
    name: String,
    category: String,
    #[serde(default)]
    image_name: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<StoredItem>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<Vec<StoredItem>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// JSON-file-backed item repository.
#[derive(Debug)]
pub struct JsonItemRepository {
    path: PathBuf,
    closed: bool,
}

impl JsonItemRepository {
    /// Opens the document at `path`, creating an empty file if none exists.
    ///
    /// Existing contents are not validated here; decoding happens per call.
    pub fn open(path: impl Into<PathBuf>) -> RepoResult<Self> {
        let path = path.into();
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .inspect_err(|err| {
                error!(
                    "event=store_open module=repo backend=json status=error error_code=file_open_failed error={err}"
                )
            })?;
        info!(
            "event=store_open module=repo backend=json status=ok path={}",
            path.display()
        );
        Ok(Self {
            path,
            closed: false,
        })
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> RepoResult<Vec<StoredItem>> {
        if self.closed {
            return Err(RepoError::Closed);
        }

        let bytes = std::fs::read(&self.path)?;
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        let document: ItemsDocument = serde_json::from_slice(&bytes)?;
        Ok(document.items)
    }

    fn store(&self, items: Vec<StoredItem>) -> RepoResult<()> {
        let encoded = serde_json::to_vec_pretty(&ItemsDocument { items })?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let permissions = std::fs::metadata(&self.path)?.permissions();
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(&encoded)?;
        staged.as_file().set_permissions(permissions)?;
        staged.as_file().sync_all()?;
        staged
            .persist(&self.path)
            .map_err(|err| RepoError::Io(err.error))?;
        Ok(())
    }
}

impl ItemRepository for JsonItemRepository {
    fn insert(&mut self, item: &NewItem) -> RepoResult<ItemId> {
        item.validate()?;

        let mut items = self.load()?;
        let id = position_to_id(items.len())?;
        items.push(StoredItem {
            name: item.name.clone(),
            category: item.category.clone(),
            image_name: item.image_name.clone(),
        });

        if let Err(err) = self.store(items) {
            error!(
                "event=item_insert module=repo backend=json status=error error={err}"
            );
            return Err(err);
        }
        debug!("event=item_insert module=repo backend=json status=ok item_id={id}");
        Ok(id)
    }

    fn get_all(&self) -> RepoResult<Vec<Item>> {
        self.load()?
            .into_iter()
            .enumerate()
            .map(|(index, stored)| to_item(index, stored))
            .collect()
    }

    fn get_by_id(&self, id: ItemId) -> RepoResult<Item> {
        let items = self.load()?;
        let index = usize::try_from(id).map_err(|_| RepoError::NotFound(id))?;
        match items.into_iter().nth(index) {
            Some(stored) => to_item(index, stored),
            None => Err(RepoError::NotFound(id)),
        }
    }

    fn search_by_name(&self, keyword: &str) -> RepoResult<Vec<Item>> {
        self.load()?
            .into_iter()
            .enumerate()
            .filter(|(_, stored)| stored.name.contains(keyword))
            .map(|(index, stored)| to_item(index, stored))
            .collect()
    }

    fn close(&mut self) -> RepoResult<()> {
        if !self.closed {
            self.closed = true;
            info!("event=store_close module=repo backend=json status=ok");
        }
        Ok(())
    }
}

fn position_to_id(index: usize) -> RepoResult<ItemId> {
    ItemId::try_from(index)
        .map_err(|_| RepoError::InvalidData(format!("item position {index} overflows item id")))
}

fn to_item(index: usize, stored: StoredItem) -> RepoResult<Item> {
    Ok(Item {
        id: position_to_id(index)?,
        name: stored.name,
        category: stored.category,
        image_name: stored.image_name,
    })
}
