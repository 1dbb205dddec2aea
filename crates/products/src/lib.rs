//! Products domain module.
//!
//! This crate contains the `Product` record and its validation rules,
//! implemented purely as deterministic domain logic (no IO, no storage).
//! Persistence lives in `catalog-infra`.

pub mod category;
pub mod document;
pub mod price;
pub mod product;

pub use category::Category;
pub use document::Document;
pub use price::PriceQuery;
pub use product::{Product, ProductId};

pub use rust_decimal::Decimal;
