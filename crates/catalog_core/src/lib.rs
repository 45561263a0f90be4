//! Core storage logic for the item catalog.
//! This crate owns the repository contract and both persistence backends.

pub mod config;
pub mod db;
pub mod image_store;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{CatalogConfig, ConfigError, LogConfig, StoreConfig};
pub use image_store::{load_image, store_image, ImageError, ImageResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::item::{Item, ItemId, ItemValidationError, NewItem};
pub use repo::category::Category;
pub use repo::json_repo::JsonItemRepository;
pub use repo::sqlite_repo::SqliteItemRepository;
pub use repo::{parse_item_id, ErrorKind, ItemRepository, RepoError, RepoResult};
pub use service::item_service::{ItemService, ItemServiceError};
