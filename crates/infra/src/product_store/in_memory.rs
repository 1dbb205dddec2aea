use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use catalog_products::{Category, PriceQuery, Product, ProductId};

use super::r#trait::{ProductStore, StoreError, require_id};

#[derive(Debug, Default)]
struct State {
    rows: BTreeMap<ProductId, Product>,
    last_id: i64,
}

/// In-memory product store.
///
/// Intended for tests/dev. Ids are assigned from a counter starting at 1 and are
/// never reused, matching a database sequence.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    state: RwLock<State>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    fn select(&self, predicate: impl Fn(&Product) -> bool) -> Result<Vec<Product>, StoreError> {
        let state = self.read()?;
        Ok(state.rows.values().filter(|p| predicate(p)).cloned().collect())
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn create(&self, product: &mut Product) -> Result<ProductId, StoreError> {
        product.validate()?;
        let mut state = self.write()?;
        state.last_id += 1;
        let id = ProductId::from(state.last_id);

        product.mark_persisted(id);
        state.rows.insert(id, product.clone());
        Ok(id)
    }

    async fn update(&self, product: &Product) -> Result<(), StoreError> {
        let id = require_id(product, "Update")?;
        product.validate()?;
        let mut state = self.write()?;
        match state.rows.get_mut(&id) {
            Some(row) => {
                *row = product.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn delete(&self, product: &Product) -> Result<(), StoreError> {
        let id = require_id(product, "Delete")?;
        let mut state = self.write()?;
        state
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn find(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let state = self.read()?;
        Ok(state.rows.get(&id).cloned())
    }

    async fn all(&self) -> Result<Vec<Product>, StoreError> {
        self.select(|_| true)
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Product>, StoreError> {
        self.select(|p| p.name == name)
    }

    async fn find_by_availability(&self, available: bool) -> Result<Vec<Product>, StoreError> {
        self.select(|p| p.available == available)
    }

    async fn find_by_category(&self, category: Category) -> Result<Vec<Product>, StoreError> {
        self.select(|p| p.category == category)
    }

    async fn find_by_price(&self, price: PriceQuery) -> Result<Vec<Product>, StoreError> {
        let price = price.normalize()?;
        self.select(|p| p.price == price)
    }

    async fn clear(&self) -> Result<u64, StoreError> {
        let mut state = self.write()?;
        let removed = state.rows.len() as u64;
        state.rows.clear();
        Ok(removed)
    }
}
