//! Item domain model.
//!
//! # Responsibility
//! - Define the record shape shared by the document and relational stores.
//! - Validate insert payloads before any storage is touched.
//!
//! # Invariants
//! - `name` and `category` are non-blank on every stored item.
//! - `image_name` may be empty for items without an image.
//! - `id` is backend-assigned: list position for the document store,
//!   autoincrement row id for the relational store.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Backend-assigned item identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
/// Stored ids are never negative; lookups may still carry any value.
pub type ItemId = i64;

/// Catalog record as returned by read operations.
///
/// A fresh value is built on every read; holding one does not pin storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Category name, denormalized from the category table on relational reads.
    pub category: String,
    /// File name of the stored image, or empty when the item has none.
    pub image_name: String,
}

/// Insert payload: an item that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub image_name: String,
}

/// Validation failures for [`NewItem`] payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemValidationError {
    EmptyName,
    EmptyCategory,
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "item name must not be empty"),
            Self::EmptyCategory => write!(f, "item category must not be empty"),
        }
    }
}

impl Error for ItemValidationError {}

impl NewItem {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        image_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            image_name: image_name.into(),
        }
    }

    /// Checks the payload against stored-item invariants.
    ///
    /// Whitespace-only values count as empty.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.name.trim().is_empty() {
            return Err(ItemValidationError::EmptyName);
        }
        if self.category.trim().is_empty() {
            return Err(ItemValidationError::EmptyCategory);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ItemValidationError, NewItem};

    #[test]
    fn validate_accepts_item_without_image() {
        let item = NewItem::new("shirt", "fashion", "");
        assert!(item.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_name_and_category() {
        assert_eq!(
            NewItem::new("  ", "fashion", "a.jpg").validate(),
            Err(ItemValidationError::EmptyName)
        );
        assert_eq!(
            NewItem::new("shirt", "", "a.jpg").validate(),
            Err(ItemValidationError::EmptyCategory)
        );
    }

    #[test]
    fn new_item_decodes_without_image_name() {
        let item: NewItem =
            serde_json::from_str(r#"{"name":"jacket","category":"fashion"}"#).unwrap();
        assert_eq!(item.image_name, "");
    }
}
