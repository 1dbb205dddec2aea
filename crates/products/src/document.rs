//! Flat document representation of a product.
//!
//! `serialize` produces `{id, name, description, price, available, category}`.
//! `deserialize` type-checks each field explicitly; nothing is coerced except
//! the price, which may arrive as a JSON number or as its string form (read
//! with the same rule as price lookups).

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use catalog_core::{DomainError, DomainResult};

use crate::category::Category;
use crate::price::parse_price;
use crate::product::Product;

/// Field-name-to-value mapping exchanged with callers.
pub type Document = Map<String, Value>;

impl Product {
    /// Current state as a flat document.
    pub fn serialize(&self) -> Document {
        let mut doc = Document::new();
        doc.insert(
            "id".to_string(),
            self.id().map_or(Value::Null, |id| Value::from(id.get())),
        );
        doc.insert("name".to_string(), Value::from(self.name.clone()));
        doc.insert(
            "description".to_string(),
            Value::from(self.description.clone()),
        );
        doc.insert("price".to_string(), Value::from(self.price.to_string()));
        doc.insert("available".to_string(), Value::Bool(self.available));
        doc.insert(
            "category".to_string(),
            Value::from(self.category.as_str()),
        );
        doc
    }

    /// Populate fields from a document.
    ///
    /// All fields are validated, including the limits of [`Product::validate`],
    /// before any is assigned, so a rejected document leaves the record
    /// untouched. The id is never read from the document.
    pub fn deserialize(&mut self, doc: &Document) -> DomainResult<()> {
        let parsed = Product::from_document(doc)?;
        self.name = parsed.name;
        self.description = parsed.description;
        self.price = parsed.price;
        self.available = parsed.available;
        self.category = parsed.category;
        Ok(())
    }

    /// Build a new, unpersisted product from a document.
    pub fn from_document(doc: &Document) -> DomainResult<Self> {
        let fields = Fields::parse(doc)?;
        let product = Product::new(
            fields.name,
            fields.description,
            fields.price,
            fields.available,
            fields.category,
        );
        product.validate()?;
        Ok(product)
    }
}

struct Fields {
    name: String,
    description: String,
    price: Decimal,
    available: bool,
    category: Category,
}

impl Fields {
    fn parse(doc: &Document) -> DomainResult<Self> {
        Ok(Self {
            name: string_field(doc, "name")?,
            description: string_field(doc, "description")?,
            price: price_field(doc)?,
            available: bool_field(doc, "available")?,
            category: category_field(doc)?,
        })
    }
}

fn required<'a>(doc: &'a Document, field: &str) -> DomainResult<&'a Value> {
    doc.get(field)
        .ok_or_else(|| DomainError::validation(format!("Invalid product: missing {field}")))
}

fn string_field(doc: &Document, field: &str) -> DomainResult<String> {
    match required(doc, field)? {
        Value::String(s) => Ok(s.clone()),
        other => Err(DomainError::validation(format!(
            "Invalid type for string [{field}]: {}",
            type_name(other)
        ))),
    }
}

fn bool_field(doc: &Document, field: &str) -> DomainResult<bool> {
    match required(doc, field)? {
        Value::Bool(b) => Ok(*b),
        other => Err(DomainError::validation(format!(
            "Invalid type for boolean [{field}]: {}",
            type_name(other)
        ))),
    }
}

fn price_field(doc: &Document) -> DomainResult<Decimal> {
    match required(doc, "price")? {
        Value::String(s) => parse_price(s),
        Value::Number(n) => parse_price(&n.to_string()),
        other => Err(DomainError::validation(format!(
            "Invalid price: {}",
            type_name(other)
        ))),
    }
}

fn category_field(doc: &Document) -> DomainResult<Category> {
    match required(doc, "category")? {
        Value::String(s) => s.parse(),
        Value::Null => Err(DomainError::validation(
            "Invalid attribute: category cannot be null",
        )),
        other => Err(DomainError::validation(format!(
            "Invalid attribute: category must be a string, got {}",
            type_name(other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
