//! Relational item repository backed by SQLite.
//!
//! # Responsibility
//! - Store items in a normalized `items` table referencing `categories`.
//! - Join the category name back into the flat `Item` shape on every read.
//!
//! # Invariants
//! - Category resolution and the item write commit or roll back together.
//! - Inserts take the write lock up front (`IMMEDIATE`), so concurrent
//!   inserts of the same new category name serialize instead of racing.
//! - `NotFound` means the join returned zero rows; query failures are `Db`.
//! - Item ids are SQLite rowids, starting at 1.

use crate::db::migrations::latest_version;
use crate::db::{open_db, open_db_in_memory};
use crate::model::item::{Item, ItemId, NewItem};
use crate::repo::category::{list_categories, resolve_category, Category, CategoryResolution};
use crate::repo::{ItemRepository, RepoError, RepoResult};
use log::{debug, error, info};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::path::Path;

const ITEM_SELECT_SQL: &str = "SELECT
    items.id,
    items.name,
    categories.name AS category,
    items.image_name
FROM items
INNER JOIN categories ON items.category_id = categories.id";

/// SQLite-backed item repository owning its connection.
#[derive(Debug)]
pub struct SqliteItemRepository {
    conn: Option<Connection>,
}

impl SqliteItemRepository {
    /// Opens (or creates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        let conn = open_db(path)?;
        info!("event=store_open module=repo backend=sqlite status=ok mode=file");
        Ok(Self { conn: Some(conn) })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> RepoResult<Self> {
        let conn = open_db_in_memory()?;
        info!("event=store_open module=repo backend=sqlite status=ok mode=memory");
        Ok(Self { conn: Some(conn) })
    }

    /// Wraps a connection that was already bootstrapped by `db::open_db*`.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        let actual: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        let expected = latest_version();
        if actual != expected {
            return Err(RepoError::InvalidData(format!(
                "catalog schema version {actual} does not match expected {expected}"
            )));
        }
        Ok(Self { conn: Some(conn) })
    }

    /// Lists category rows ordered by id.
    pub fn categories(&self) -> RepoResult<Vec<Category>> {
        list_categories(self.conn()?)
    }

    fn conn(&self) -> RepoResult<&Connection> {
        self.conn.as_ref().ok_or(RepoError::Closed)
    }

    fn query_items(&self, sql: &str, params: impl rusqlite::Params) -> RepoResult<Vec<Item>> {
        let mut stmt = self.conn()?.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }
        Ok(items)
    }
}

impl ItemRepository for SqliteItemRepository {
    fn insert(&mut self, item: &NewItem) -> RepoResult<ItemId> {
        item.validate()?;
        let conn = self.conn.as_mut().ok_or(RepoError::Closed)?;

        match insert_in_transaction(conn, item) {
            Ok((id, category)) => {
                debug!(
                    "event=item_insert module=repo backend=sqlite status=ok item_id={id} category_id={} category_created={}",
                    category.id(),
                    matches!(category, CategoryResolution::Created(_))
                );
                Ok(id)
            }
            Err(err) => {
                error!("event=item_insert module=repo backend=sqlite status=error error={err}");
                Err(err)
            }
        }
    }

    fn get_all(&self) -> RepoResult<Vec<Item>> {
        self.query_items(&format!("{ITEM_SELECT_SQL} ORDER BY items.id ASC;"), [])
    }

    fn get_by_id(&self, id: ItemId) -> RepoResult<Item> {
        let item = self
            .conn()?
            .query_row(
                &format!("{ITEM_SELECT_SQL} WHERE items.id = ?1;"),
                [id],
                |row| Ok(parse_item_row(row)),
            )
            .optional()?;

        match item {
            Some(parsed) => parsed,
            None => Err(RepoError::NotFound(id)),
        }
    }

    fn search_by_name(&self, keyword: &str) -> RepoResult<Vec<Item>> {
        // instr() keeps matching case-sensitive and treats `%`/`_` literally.
        self.query_items(
            &format!(
                "{ITEM_SELECT_SQL}
                 WHERE (?1 = '' OR instr(items.name, ?1) > 0)
                 ORDER BY items.id ASC;"
            ),
            [keyword],
        )
    }

    fn close(&mut self) -> RepoResult<()> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };

        match conn.close() {
            Ok(()) => {
                info!("event=store_close module=repo backend=sqlite status=ok");
                Ok(())
            }
            Err((conn, err)) => {
                error!("event=store_close module=repo backend=sqlite status=error error={err}");
                self.conn = Some(conn);
                Err(err.into())
            }
        }
    }
}

fn insert_in_transaction(
    conn: &mut Connection,
    item: &NewItem,
) -> RepoResult<(ItemId, CategoryResolution)> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let category = resolve_category(&tx, &item.category)?;
    tx.execute(
        "INSERT INTO items (name, category_id, image_name) VALUES (?1, ?2, ?3);",
        params![item.name.as_str(), category.id(), item.image_name.as_str()],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;
    Ok((id, category))
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    Ok(Item {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        image_name: row.get(3)?,
    })
}
