//! Database lifecycle: connection pool setup, schema creation, shutdown.
//!
//! The pool is process-scoped state. It is created once with [`Database::init`]
//! and handed to stores explicitly; nothing reaches it through a global.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, instrument};

use crate::config::DatabaseConfig;
use crate::product_store::{PostgresProductStore, StoreError};

/// `product` table. Category values mirror `Category::ALL`.
const CREATE_PRODUCT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS product (
    id          BIGSERIAL PRIMARY KEY,
    name        VARCHAR(100) NOT NULL,
    description VARCHAR(250) NOT NULL,
    price       NUMERIC(14, 2) NOT NULL,
    available   BOOLEAN NOT NULL DEFAULT TRUE,
    category    VARCHAR(20) NOT NULL DEFAULT 'UNKNOWN'
        CHECK (category IN ('UNKNOWN', 'CLOTHS', 'FOOD', 'HOUSEWARES', 'AUTOMOTIVE', 'TOOLS'))
)
"#;

/// Handle to the shared connection pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect and make sure the schema exists.
    #[instrument(
        skip(config),
        fields(url = %config.redacted_url(), max_connections = config.max_connections),
        err
    )]
    pub async fn init(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.url)
            .await?;

        create_schema(&pool).await?;

        info!("database initialized");
        Ok(Self { pool })
    }

    /// A product store sharing this pool.
    pub fn product_store(&self) -> PostgresProductStore {
        PostgresProductStore::new(self.pool.clone())
    }

    /// Close the pool, waiting for checked-out connections to be returned.
    pub async fn shutdown(self) {
        self.pool.close().await;
        info!("database connection pool closed");
    }
}

/// Create the product table if it does not exist yet.
pub async fn create_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(CREATE_PRODUCT_TABLE).execute(pool).await?;
    Ok(())
}
