//! Item use-case service.
//!
//! # Responsibility
//! - Accept untrusted lookup keys and search keywords from front ends.
//! - Pair image storage with item registration for upload flows.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.
//! - Repository errors pass through unchanged, including `NotFound`.

use crate::image_store::{store_image, ImageError};
use crate::model::item::{Item, ItemId, NewItem};
use crate::repo::{parse_item_id, ItemRepository, RepoError, RepoResult};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Error for flows that touch both image storage and the repository.
#[derive(Debug)]
pub enum ItemServiceError {
    Image(ImageError),
    Repo(RepoError),
}

impl Display for ItemServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ItemServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Image(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ImageError> for ItemServiceError {
    fn from(value: ImageError) -> Self {
        Self::Image(value)
    }
}

impl From<RepoError> for ItemServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case service wrapper for catalog item operations.
pub struct ItemService<R: ItemRepository> {
    repo: R,
}

impl<R: ItemRepository> ItemService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers one item and returns its assigned identifier.
    pub fn add_item(&mut self, item: &NewItem) -> RepoResult<ItemId> {
        self.repo.insert(item)
    }

    /// Stores the item image at `image_path`, then registers the item.
    ///
    /// The image is written first and is not removed if the insert fails.
    pub fn add_item_with_image(
        &mut self,
        item: &NewItem,
        image_path: impl AsRef<Path>,
        image: &[u8],
    ) -> Result<ItemId, ItemServiceError> {
        item.validate().map_err(RepoError::from)?;
        store_image(image_path, image)?;
        self.repo.insert(item).map_err(|err| {
            warn!("event=item_insert module=service status=error image_kept=true error={err}");
            ItemServiceError::Repo(err)
        })
    }

    /// Lists every item.
    pub fn list_items(&self) -> RepoResult<Vec<Item>> {
        self.repo.get_all()
    }

    /// Gets one item by its raw (string) identifier.
    ///
    /// # Contract
    /// - Non-numeric keys return `RepoError::InvalidId`.
    /// - Negative keys and unknown ids return `RepoError::NotFound`.
    pub fn get_item(&self, raw_id: &str) -> RepoResult<Item> {
        let id = parse_item_id(raw_id)?;
        self.repo.get_by_id(id)
    }

    /// Searches items whose name contains `keyword`.
    pub fn search_items(&self, keyword: &str) -> RepoResult<Vec<Item>> {
        self.repo.search_by_name(keyword)
    }

    /// Releases the underlying repository handle.
    pub fn close(&mut self) -> RepoResult<()> {
        self.repo.close()
    }

    /// Returns the wrapped repository.
    pub fn into_inner(self) -> R {
        self.repo
    }
}
