//! Product persistence boundary.
//!
//! `ProductStore` is the data-access contract for product records. The
//! Postgres implementation is the production backend; the in-memory one backs
//! tests and local development.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryProductStore;
pub use postgres::PostgresProductStore;
pub use r#trait::{ProductStore, StoreError};
