use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use catalog_core::DomainError;
use catalog_products::{Category, PriceQuery, Product, ProductId};

/// Product store operation error.
///
/// ## Error Categories
///
/// - **Validation**: the record or lookup input failed a domain check (e.g. update
///   without an id, unparseable price). Never retried.
/// - **NotFound**: the record's id matches no stored row.
/// - **Database**: driver/database failure, passed through unmodified.
/// - **Backend**: non-database backend failure (in-memory store lock poisoned).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error("product {0} not found")]
    NotFound(ProductId),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("store backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }
}

/// Persistence and lookup for product records.
///
/// ## Write Semantics
///
/// - `create()` and `update()` run [`Product::validate`] first, so every store
///   rejects the same records (overlong text, out-of-range price) before writing.
/// - `create()` always inserts a new row and assigns its id to the record.
/// - `update()` and `delete()` address the row by the record's id; a record
///   without one is rejected with a validation error instead of being inserted.
///
/// ## Lookup Semantics
///
/// Every `find_by_*` returns exactly the stored records whose attribute equals
/// the given value, ordered by id. `find_by_price()` normalizes its input to an
/// exact decimal first, so `12.5` and `"12.50"` match the same rows.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Insert the record as a new row and assign it the generated id.
    async fn create(&self, product: &mut Product) -> Result<ProductId, StoreError>;

    /// Write the record's current fields to its existing row.
    async fn update(&self, product: &Product) -> Result<(), StoreError>;

    /// Remove the record's row.
    async fn delete(&self, product: &Product) -> Result<(), StoreError>;

    async fn find(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    async fn all(&self) -> Result<Vec<Product>, StoreError>;

    async fn find_by_name(&self, name: &str) -> Result<Vec<Product>, StoreError>;

    async fn find_by_availability(&self, available: bool) -> Result<Vec<Product>, StoreError>;

    async fn find_by_category(&self, category: Category) -> Result<Vec<Product>, StoreError>;

    async fn find_by_price(&self, price: PriceQuery) -> Result<Vec<Product>, StoreError>;

    /// Remove every product, returning how many rows were deleted.
    async fn clear(&self) -> Result<u64, StoreError>;
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn create(&self, product: &mut Product) -> Result<ProductId, StoreError> {
        (**self).create(product).await
    }

    async fn update(&self, product: &Product) -> Result<(), StoreError> {
        (**self).update(product).await
    }

    async fn delete(&self, product: &Product) -> Result<(), StoreError> {
        (**self).delete(product).await
    }

    async fn find(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        (**self).find(id).await
    }

    async fn all(&self) -> Result<Vec<Product>, StoreError> {
        (**self).all().await
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Product>, StoreError> {
        (**self).find_by_name(name).await
    }

    async fn find_by_availability(&self, available: bool) -> Result<Vec<Product>, StoreError> {
        (**self).find_by_availability(available).await
    }

    async fn find_by_category(&self, category: Category) -> Result<Vec<Product>, StoreError> {
        (**self).find_by_category(category).await
    }

    async fn find_by_price(&self, price: PriceQuery) -> Result<Vec<Product>, StoreError> {
        (**self).find_by_price(price).await
    }

    async fn clear(&self) -> Result<u64, StoreError> {
        (**self).clear().await
    }
}

/// The id an update/delete addresses; absent means the record was never persisted.
pub(crate) fn require_id(product: &Product, operation: &str) -> Result<ProductId, DomainError> {
    product
        .id()
        .ok_or_else(|| DomainError::validation(format!("{operation} called with empty ID field")))
}
