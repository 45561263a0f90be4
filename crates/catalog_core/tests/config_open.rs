use catalog_core::{CatalogConfig, ItemRepository, ItemService, NewItem, RepoError};

fn config_for(backend: &str, path: &std::path::Path) -> CatalogConfig {
    let document = serde_json::json!({
        "store": { "backend": backend, "path": path }
    });
    CatalogConfig::from_json_str(&document.to_string()).unwrap()
}

#[test]
fn both_backends_satisfy_the_same_contract() {
    let dir = tempfile::tempdir().unwrap();
    let configs = [
        config_for("json", &dir.path().join("items.json")),
        config_for("sqlite", &dir.path().join("items.db")),
    ];

    for config in &configs {
        let mut repo = config.store.open().unwrap();
        assert!(repo.get_all().unwrap().is_empty());

        for name in ["apple", "pineapple", "banana"] {
            repo.insert(&NewItem::new(name, "food", "")).unwrap();
        }
        let first = repo.get_all().unwrap().remove(0);
        assert_eq!(repo.get_by_id(first.id).unwrap(), first);

        let hits: Vec<String> = repo
            .search_by_name("apple")
            .unwrap()
            .into_iter()
            .map(|item| item.name)
            .collect();
        assert_eq!(hits, vec!["apple", "pineapple"]);
        assert!(matches!(repo.get_by_id(-1), Err(RepoError::NotFound(-1))));

        repo.close().unwrap();
    }
}

#[test]
fn service_works_over_boxed_repository() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("catalog.json");
    let db_path = dir.path().join("items.db");
    std::fs::write(
        &config_path,
        serde_json::json!({ "store": { "backend": "sqlite", "path": db_path } }).to_string(),
    )
    .unwrap();

    let config = CatalogConfig::load(&config_path).unwrap();
    config.init_logging().unwrap();

    let mut service = ItemService::new(config.store.open().unwrap());
    let id = service
        .add_item(&NewItem::new("shirt", "fashion", "a.jpg"))
        .unwrap();
    assert_eq!(service.get_item(&id.to_string()).unwrap().category, "fashion");

    let mut repo = service.into_inner();
    repo.close().unwrap();
    assert!(matches!(repo.get_all(), Err(RepoError::Closed)));
}
