//! Infrastructure layer: configuration, database lifecycle, product storage.

pub mod config;
pub mod db;
pub mod product_store;

pub use config::{ConfigError, DatabaseConfig};
pub use db::Database;
pub use product_store::{InMemoryProductStore, PostgresProductStore, ProductStore, StoreError};
