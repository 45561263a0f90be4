//! Category resolution for the relational item store.
//!
//! # Invariants
//! - `categories.name` is unique; resolution never creates a second row for
//!   a name that already exists.
//! - Resolution only runs inside the caller's write transaction, so a
//!   created category is rolled back together with a failed item write.

use crate::repo::{RepoError, RepoResult};
use log::debug;
use rusqlite::{Connection, OptionalExtension, Transaction};

/// Row of the `categories` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Outcome of resolving a category name to its row id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryResolution {
    Existing(i64),
    Created(i64),
}

impl CategoryResolution {
    pub fn id(self) -> i64 {
        match self {
            Self::Existing(id) | Self::Created(id) => id,
        }
    }
}

/// Looks up `name` by exact match, inserting it when absent.
pub fn resolve_category(tx: &Transaction<'_>, name: &str) -> RepoResult<CategoryResolution> {
    let existing = tx
        .query_row(
            "SELECT id FROM categories WHERE name = ?1;",
            [name],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    if let Some(id) = existing {
        return Ok(CategoryResolution::Existing(id));
    }

    tx.execute("INSERT INTO categories (name) VALUES (?1);", [name])?;
    let id = tx.last_insert_rowid();
    debug!("event=category_create module=repo status=ok category_id={id}");
    Ok(CategoryResolution::Created(id))
}

/// Lists every category ordered by id.
pub fn list_categories(conn: &Connection) -> RepoResult<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT id, name FROM categories ORDER BY id ASC;")?;
    let mut rows = stmt.query([])?;
    let mut categories = Vec::new();
    while let Some(row) = rows.next()? {
        let name: String = row.get("name")?;
        if name.trim().is_empty() {
            return Err(RepoError::InvalidData(
                "blank value in categories.name".to_string(),
            ));
        }
        categories.push(Category {
            id: row.get("id")?,
            name,
        });
    }
    Ok(categories)
}
