use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use catalog_core::{DomainError, DomainResult, RecordId};

use crate::category::Category;
use crate::price::check_price;

/// Longest accepted name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Longest accepted description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 250;

/// Product identifier (storage-assigned).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub RecordId);

impl ProductId {
    pub fn get(&self) -> i64 {
        self.0.get()
    }
}

impl From<i64> for ProductId {
    fn from(value: i64) -> Self {
        Self(RecordId::new(value))
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A product record.
///
/// A freshly constructed product has no id; the store assigns one on insert and
/// it does not change afterwards. Everything else is plain data the caller may
/// mutate before writing it back with an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: Option<ProductId>,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub available: bool,
    pub category: Category,
}

impl Product {
    /// Create an in-memory, not-yet-persisted product.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        available: bool,
        category: Category,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            price,
            available,
            category,
        }
    }

    /// Rehydrate a product loaded from storage.
    pub fn with_id(mut self, id: ProductId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn id(&self) -> Option<ProductId> {
        self.id
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Record the identifier a store assigned on insert.
    pub fn mark_persisted(&mut self, id: ProductId) {
        self.id = Some(id);
    }

    /// Check the fields against the limits every store enforces.
    ///
    /// Stores call this before writing, so a record that one backend would
    /// reject is rejected the same way by all of them.
    pub fn validate(&self) -> DomainResult<()> {
        check_length("name", &self.name, MAX_NAME_LEN)?;
        check_length("description", &self.description, MAX_DESCRIPTION_LEN)?;
        check_price(self.price)
    }

    /// Copy of the field values as a fresh, unpersisted record.
    pub fn detached(&self) -> Self {
        Self {
            id: None,
            ..self.clone()
        }
    }
}

fn check_length(field: &str, value: &str, max: usize) -> DomainResult<()> {
    let len = value.chars().count();
    if len > max {
        return Err(DomainError::validation(format!(
            "Invalid attribute: {field} is {len} characters, at most {max} allowed"
        )));
    }
    Ok(())
}

impl core::fmt::Display for Product {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Product {} id=[{}]>", self.name, id),
            None => write!(f, "<Product {} id=[None]>", self.name),
        }
    }
}
