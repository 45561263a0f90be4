use catalog_core::db::open_db_in_memory;
use catalog_core::{ItemRepository, NewItem, RepoError, SqliteItemRepository};
use rusqlite::Connection;
use std::path::Path;
use std::thread;

fn category_id_of(path: &Path, item_id: i64) -> i64 {
    let conn = Connection::open(path).unwrap();
    conn.query_row(
        "SELECT category_id FROM items WHERE id = ?1;",
        [item_id],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn empty_store_lists_nothing() {
    let repo = SqliteItemRepository::open_in_memory().unwrap();

    assert!(repo.get_all().unwrap().is_empty());
    assert!(repo.search_by_name("").unwrap().is_empty());
    assert!(repo.categories().unwrap().is_empty());
}

#[test]
fn insert_assigns_increasing_ids_and_get_by_id_returns_exact_item() {
    let mut repo = SqliteItemRepository::open_in_memory().unwrap();

    let first = repo.insert(&NewItem::new("jacket", "fashion", "jacket.jpg")).unwrap();
    let second = repo.insert(&NewItem::new("phone", "electronics", "")).unwrap();
    assert_eq!(first, 1);
    assert_eq!(second, 2);

    let loaded = repo.get_by_id(second).unwrap();
    assert_eq!(loaded.id, second);
    assert_eq!(loaded.name, "phone");
    assert_eq!(loaded.category, "electronics");
    assert_eq!(loaded.image_name, "");
}

#[test]
fn round_trip_preserves_fields_through_join() {
    let mut repo = SqliteItemRepository::open_in_memory().unwrap();
    repo.insert(&NewItem::new("shirt", "fashion", "a.jpg")).unwrap();

    let items = repo.get_all().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "shirt");
    assert_eq!(items[0].category, "fashion");
    assert_eq!(items[0].image_name, "a.jpg");
}

#[test]
fn get_all_returns_insertion_order() {
    let mut repo = SqliteItemRepository::open_in_memory().unwrap();
    for (name, category) in [("c", "x"), ("a", "y"), ("b", "x")] {
        repo.insert(&NewItem::new(name, category, "")).unwrap();
    }

    let names: Vec<String> = repo.get_all().unwrap().into_iter().map(|i| i.name).collect();
    assert_eq!(names, vec!["c", "a", "b"]);
}

#[test]
fn new_category_creates_one_row_and_reuse_creates_none() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");
    let mut repo = SqliteItemRepository::open(&path).unwrap();

    let first = repo.insert(&NewItem::new("jacket", "fashion", "")).unwrap();
    let categories = repo.categories().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "fashion");

    let second = repo.insert(&NewItem::new("shoes", "fashion", "")).unwrap();
    assert_eq!(repo.categories().unwrap().len(), 1);
    assert_eq!(category_id_of(&path, first), category_id_of(&path, second));
    assert_eq!(category_id_of(&path, first), categories[0].id);

    repo.insert(&NewItem::new("phone", "electronics", "")).unwrap();
    let names: Vec<String> = repo
        .categories()
        .unwrap()
        .into_iter()
        .map(|category| category.name)
        .collect();
    assert_eq!(names, vec!["fashion", "electronics"]);
}

#[test]
fn category_names_match_exactly() {
    let mut repo = SqliteItemRepository::open_in_memory().unwrap();
    repo.insert(&NewItem::new("jacket", "fashion", "")).unwrap();
    repo.insert(&NewItem::new("coat", "Fashion", "")).unwrap();

    assert_eq!(repo.categories().unwrap().len(), 2);
}

#[test]
fn unknown_or_negative_id_is_not_found() {
    let mut repo = SqliteItemRepository::open_in_memory().unwrap();
    repo.insert(&NewItem::new("jacket", "fashion", "")).unwrap();

    assert!(matches!(repo.get_by_id(2), Err(RepoError::NotFound(2))));
    assert!(matches!(repo.get_by_id(0), Err(RepoError::NotFound(0))));
    assert!(matches!(repo.get_by_id(-5), Err(RepoError::NotFound(-5))));
}

#[test]
fn query_failure_is_not_reported_as_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");
    let repo = SqliteItemRepository::open(&path).unwrap();

    let raw = Connection::open(&path).unwrap();
    raw.execute_batch("DROP TABLE items;").unwrap();
    drop(raw);

    let err = repo.get_by_id(1).unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    assert!(!err.is_not_found());
    assert!(matches!(repo.get_all(), Err(RepoError::Db(_))));
}

#[test]
fn search_by_name_is_case_sensitive_substring_match() {
    let mut repo = SqliteItemRepository::open_in_memory().unwrap();
    for name in ["apple", "pineapple", "banana", "Apple pie"] {
        repo.insert(&NewItem::new(name, "food", "")).unwrap();
    }

    let names: Vec<String> = repo
        .search_by_name("apple")
        .unwrap()
        .into_iter()
        .map(|item| item.name)
        .collect();
    assert_eq!(names, vec!["apple", "pineapple"]);

    assert_eq!(repo.search_by_name("").unwrap().len(), 4);
    assert!(repo.search_by_name("cherry").unwrap().is_empty());
}

#[test]
fn search_treats_like_wildcards_literally() {
    let mut repo = SqliteItemRepository::open_in_memory().unwrap();
    repo.insert(&NewItem::new("100% cotton", "fashion", "")).unwrap();
    repo.insert(&NewItem::new("linen", "fashion", "")).unwrap();

    let hits = repo.search_by_name("%").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "100% cotton");
    assert!(repo.search_by_name("_").unwrap().is_empty());
}

#[test]
fn failed_item_write_rolls_back_new_category() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");
    let mut repo = SqliteItemRepository::open(&path).unwrap();
    repo.insert(&NewItem::new("jacket", "fashion", "")).unwrap();

    let raw = Connection::open(&path).unwrap();
    raw.execute_batch(
        "CREATE TRIGGER reject_item BEFORE INSERT ON items
         WHEN NEW.name = 'rejected'
         BEGIN
            SELECT RAISE(ABORT, 'item rejected');
         END;",
    )
    .unwrap();
    drop(raw);

    let err = repo
        .insert(&NewItem::new("rejected", "brand-new", ""))
        .unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));

    let names: Vec<String> = repo
        .categories()
        .unwrap()
        .into_iter()
        .map(|category| category.name)
        .collect();
    assert_eq!(names, vec!["fashion"]);
    assert_eq!(repo.get_all().unwrap().len(), 1);

    repo.insert(&NewItem::new("accepted", "brand-new", "")).unwrap();
    assert_eq!(repo.categories().unwrap().len(), 2);
}

#[test]
fn invalid_item_is_rejected_without_writes() {
    let mut repo = SqliteItemRepository::open_in_memory().unwrap();

    let err = repo.insert(&NewItem::new("jacket", "  ", "")).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert!(repo.categories().unwrap().is_empty());
}

#[test]
fn concurrent_inserts_of_new_category_never_duplicate_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");
    SqliteItemRepository::open(&path).unwrap().close().unwrap();

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let path = path.clone();
            thread::spawn(move || {
                let mut repo = SqliteItemRepository::open(&path).unwrap();
                for n in 0..5 {
                    repo.insert(&NewItem::new(format!("item-{worker}-{n}"), "limited", ""))
                        .unwrap();
                }
                repo.close().unwrap();
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let repo = SqliteItemRepository::open(&path).unwrap();
    let categories = repo.categories().unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "limited");
    assert_eq!(repo.get_all().unwrap().len(), 20);
}

#[test]
fn data_survives_close_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");
    let mut repo = SqliteItemRepository::open(&path).unwrap();
    repo.insert(&NewItem::new("shirt", "fashion", "a.jpg")).unwrap();

    repo.close().unwrap();
    repo.close().unwrap();
    assert!(matches!(repo.get_all(), Err(RepoError::Closed)));
    assert!(matches!(repo.categories(), Err(RepoError::Closed)));

    let reopened = SqliteItemRepository::open(&path).unwrap();
    let item = reopened.get_by_id(1).unwrap();
    assert_eq!(item.name, "shirt");
    assert_eq!(item.category, "fashion");
}

#[test]
fn try_new_accepts_bootstrapped_connection_only() {
    let conn = open_db_in_memory().unwrap();
    assert!(SqliteItemRepository::try_new(conn).is_ok());

    let raw = Connection::open_in_memory().unwrap();
    let err = SqliteItemRepository::try_new(raw).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
