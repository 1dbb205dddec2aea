//! Postgres-backed product store.
//!
//! ## Error Mapping
//!
//! | Situation | StoreError |
//! |-----------|------------|
//! | update/delete on a record without an id | `Validation` |
//! | create/update of a record past the column limits | `Validation` (no SQL sent) |
//! | unparseable price lookup | `Validation` |
//! | update/delete touching zero rows | `NotFound` |
//! | stored category outside the closed set | `Validation` |
//! | any SQLx error | `Database` (unmodified) |
//!
//! ## Units of Work
//!
//! Writes run in an explicit transaction: begin, operate, commit. A transaction
//! dropped before commit (early return on error) is rolled back by SQLx.
//! Reads go straight to the pool.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};
use tracing::{Span, debug, field, instrument};

use catalog_core::DomainError;
use catalog_products::{Category, Decimal, PriceQuery, Product, ProductId};

use super::r#trait::{ProductStore, StoreError, require_id};

/// Postgres-backed product store.
///
/// Uses the SQLx connection pool, which is `Send + Sync`; clones share the pool.
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: Arc<PgPool>,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    #[instrument(skip(self, product), fields(name = %product.name), err)]
    async fn create(&self, product: &mut Product) -> Result<ProductId, StoreError> {
        product.validate()?;
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO product (
                name,
                description,
                price,
                available,
                category
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.available)
        .bind(product.category.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        let id = ProductId::from(id);
        product.mark_persisted(id);
        debug!(product_id = %id, "product created");
        Ok(id)
    }

    #[instrument(skip(self, product), fields(product_id = ?product.id()), err)]
    async fn update(&self, product: &Product) -> Result<(), StoreError> {
        let id = require_id(product, "Update")?;
        product.validate()?;
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE product
            SET
                name = $1,
                description = $2,
                price = $3,
                available = $4,
                category = $5
            WHERE id = $6
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.available)
        .bind(product.category.as_str())
        .bind(id.get())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::NotFound(id));
        }

        tx.commit().await?;
        debug!("product updated");
        Ok(())
    }

    #[instrument(skip(self, product), fields(product_id = ?product.id()), err)]
    async fn delete(&self, product: &Product) -> Result<(), StoreError> {
        let id = require_id(product, "Delete")?;
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id.get())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::NotFound(id));
        }

        tx.commit().await?;
        debug!("product deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(product_id = %id, found = field::Empty), err)]
    async fn find(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, price, available, category
            FROM product
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&*self.pool)
        .await?;

        let span = Span::current();
        match row {
            Some(row) => {
                span.record("found", true);
                let product: Product = ProductRow::from_row(&row)?.try_into()?;
                Ok(Some(product))
            }
            None => {
                span.record("found", false);
                Ok(None)
            }
        }
    }

    #[instrument(skip(self), fields(row_count = field::Empty), err)]
    async fn all(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, price, available, category
            FROM product
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await?;

        into_products(rows)
    }

    #[instrument(skip(self), fields(row_count = field::Empty), err)]
    async fn find_by_name(&self, name: &str) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, price, available, category
            FROM product
            WHERE name = $1
            ORDER BY id ASC
            "#,
        )
        .bind(name)
        .fetch_all(&*self.pool)
        .await?;

        into_products(rows)
    }

    #[instrument(skip(self), fields(row_count = field::Empty), err)]
    async fn find_by_availability(&self, available: bool) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, price, available, category
            FROM product
            WHERE available = $1
            ORDER BY id ASC
            "#,
        )
        .bind(available)
        .fetch_all(&*self.pool)
        .await?;

        into_products(rows)
    }

    #[instrument(skip(self), fields(row_count = field::Empty), err)]
    async fn find_by_category(&self, category: Category) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, price, available, category
            FROM product
            WHERE category = $1
            ORDER BY id ASC
            "#,
        )
        .bind(category.as_str())
        .fetch_all(&*self.pool)
        .await?;

        into_products(rows)
    }

    #[instrument(skip(self), fields(row_count = field::Empty), err)]
    async fn find_by_price(&self, price: PriceQuery) -> Result<Vec<Product>, StoreError> {
        let price = price.normalize()?;

        let rows = sqlx::query(
            r#"
            SELECT id, name, description, price, available, category
            FROM product
            WHERE price = $1
            ORDER BY id ASC
            "#,
        )
        .bind(price)
        .fetch_all(&*self.pool)
        .await?;

        into_products(rows)
    }

    #[instrument(skip(self), fields(removed = field::Empty), err)]
    async fn clear(&self) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM product").execute(&mut *tx).await?;
        tx.commit().await?;

        let removed = result.rows_affected();
        Span::current().record("removed", removed);
        debug!(removed, "product table cleared");
        Ok(removed)
    }
}

fn into_products(rows: Vec<PgRow>) -> Result<Vec<Product>, StoreError> {
    let mut products: Vec<Product> = Vec::with_capacity(rows.len());
    for row in rows {
        products.push(ProductRow::from_row(&row)?.try_into()?);
    }
    Span::current().record("row_count", products.len());
    Ok(products)
}

// SQLx row types

#[derive(Debug)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: Decimal,
    available: bool,
    category: String,
}

impl<'r> FromRow<'r, PgRow> for ProductRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProductRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            available: row.try_get("available")?,
            category: row.try_get("category")?,
        })
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = DomainError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let category = row.category.parse::<Category>()?;
        Ok(Product::new(row.name, row.description, row.price, row.available, category)
            .with_id(ProductId::from(row.id)))
    }
}
