//! Store contract checks shared by the in-memory and Postgres test suites.
//!
//! Every check expects an empty store.

#![allow(dead_code)]

use catalog_infra::{ProductStore, StoreError};
use catalog_products::{Category, Decimal, PriceQuery, Product};
use serde_json::{Value, json};

const CATALOG: [(&str, Category); 11] = [
    ("Hat", Category::Cloths),
    ("Pants", Category::Cloths),
    ("Shirt", Category::Cloths),
    ("Apple", Category::Food),
    ("Banana", Category::Food),
    ("Pots", Category::Housewares),
    ("Towels", Category::Housewares),
    ("Ford", Category::Automotive),
    ("Chevy", Category::Automotive),
    ("Hammer", Category::Tools),
    ("Wrench", Category::Tools),
];

/// Prices in cents; repeats on purpose so price lookups match several rows.
const PRICES: [i64; 7] = [1250, 999, 200000, 1250, 45, 999, 31000];

/// Deterministic stand-in for a fake-data factory.
///
/// The n-th product cycles through names (with their category), prices and an
/// availability pattern, so batches contain shared attribute values.
#[derive(Debug, Default)]
pub struct ProductFactory {
    sequence: usize,
}

impl ProductFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(&mut self) -> Product {
        let n = self.sequence;
        self.sequence += 1;

        let (name, category) = CATALOG[(n * 7) % CATALOG.len()];
        Product::new(
            name,
            format!("{name} number {n}"),
            Decimal::new(PRICES[n % PRICES.len()], 2),
            n % 3 != 0,
            category,
        )
    }

    pub fn batch(&mut self, count: usize) -> Vec<Product> {
        (0..count).map(|_| self.build()).collect()
    }
}

pub async fn create_batch<S: ProductStore>(store: &S, count: usize) -> Vec<Product> {
    let mut products = ProductFactory::new().batch(count);
    for product in &mut products {
        store.create(product).await.unwrap();
    }
    products
}

pub async fn add_a_product<S: ProductStore>(store: &S) {
    assert!(store.all().await.unwrap().is_empty());

    let mut product = ProductFactory::new().build();
    assert_eq!(product.id(), None);
    let id = store.create(&mut product).await.unwrap();

    assert_eq!(product.id(), Some(id));
    let products = store.all().await.unwrap();
    assert_eq!(products.len(), 1);

    let stored = &products[0];
    assert_eq!(stored.id(), Some(id));
    assert_eq!(stored.name, product.name);
    assert_eq!(stored.description, product.description);
    assert_eq!(stored.price, product.price);
    assert_eq!(stored.available, product.available);
    assert_eq!(stored.category, product.category);
}

pub async fn create_always_inserts_a_new_row<S: ProductStore>(store: &S) {
    let mut product = ProductFactory::new().build();
    let first = store.create(&mut product).await.unwrap();
    let second = store.create(&mut product).await.unwrap();

    assert_ne!(first, second);
    assert_eq!(product.id(), Some(second));
    assert_eq!(store.all().await.unwrap().len(), 2);
}

pub async fn read_a_product<S: ProductStore>(store: &S) {
    let mut product = ProductFactory::new().build();
    let id = store.create(&mut product).await.unwrap();

    let found = store.find(id).await.unwrap().expect("product should exist");
    assert_eq!(found.id(), product.id());
    assert_eq!(found.name, product.name);
    assert_eq!(found.description, product.description);
    assert_eq!(found.price, product.price);
}

pub async fn find_missing_product_returns_none<S: ProductStore>(store: &S) {
    let mut product = ProductFactory::new().build();
    let id = store.create(&mut product).await.unwrap();
    store.delete(&product).await.unwrap();

    assert_eq!(store.find(id).await.unwrap(), None);
}

pub async fn update_a_product<S: ProductStore>(store: &S) {
    let mut product = ProductFactory::new().build();
    let previous_id = store.create(&mut product).await.unwrap();

    let description = format!("This is a description for {}", product.name);
    product.description = description.clone();
    store.update(&product).await.unwrap();

    assert_eq!(product.id(), Some(previous_id));
    assert_eq!(product.description, description);

    let products = store.all().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].id(), Some(previous_id));
    assert_eq!(products[0].description, description);
}

pub async fn update_without_id_is_a_validation_error<S: ProductStore>(store: &S) {
    let mut product = ProductFactory::new().build();
    store.create(&mut product).await.unwrap();

    let unsaved = product.detached();
    let err = store.update(&unsaved).await.unwrap_err();
    match err {
        StoreError::Validation(e) => assert!(e.message().contains("empty ID")),
        other => panic!("Expected Validation error, got {other:?}"),
    }
    assert_eq!(store.all().await.unwrap().len(), 1);
}

pub async fn delete_a_product<S: ProductStore>(store: &S) {
    let products = create_batch(store, 3).await;
    assert_eq!(store.all().await.unwrap().len(), 3);

    store.delete(&products[1]).await.unwrap();

    let remaining = store.all().await.unwrap();
    assert_eq!(remaining.len(), 2);
    assert!(remaining.iter().all(|p| p.id() != products[1].id()));

    let err = store.delete(&products[1]).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

pub async fn list_all_products<S: ProductStore>(store: &S) {
    assert!(store.all().await.unwrap().is_empty());
    create_batch(store, 5).await;
    assert_eq!(store.all().await.unwrap().len(), 5);
}

pub async fn find_by_name<S: ProductStore>(store: &S) {
    let products = create_batch(store, 15).await;
    let name = products[0].name.clone();
    let count = products.iter().filter(|p| p.name == name).count();
    assert!(count > 1, "factory should repeat names within 15 products");

    let found = store.find_by_name(&name).await.unwrap();
    assert_eq!(found.len(), count);
    assert!(found.iter().all(|p| p.name == name));
}

pub async fn find_by_availability<S: ProductStore>(store: &S) {
    let products = create_batch(store, 10).await;
    let available = products[0].available;
    let count = products.iter().filter(|p| p.available == available).count();

    let found = store.find_by_availability(available).await.unwrap();
    assert_eq!(found.len(), count);
    assert!(found.iter().all(|p| p.available == available));

    let others = store.find_by_availability(!available).await.unwrap();
    assert_eq!(others.len(), products.len() - count);
}

pub async fn find_by_category<S: ProductStore>(store: &S) {
    let products = create_batch(store, 10).await;
    let category = products[0].category;
    let count = products.iter().filter(|p| p.category == category).count();

    let found = store.find_by_category(category).await.unwrap();
    assert_eq!(found.len(), count);
    assert!(found.iter().all(|p| p.category == category));
}

pub async fn find_by_price<S: ProductStore>(store: &S) {
    let products = create_batch(store, 10).await;
    let price = products[0].price;
    let count = products.iter().filter(|p| p.price == price).count();
    assert!(count > 1, "factory should repeat prices within 10 products");

    let found = store.find_by_price(PriceQuery::from(price)).await.unwrap();
    assert_eq!(found.len(), count);
    assert!(found.iter().all(|p| p.price == price));
}

pub async fn find_by_price_string<S: ProductStore>(store: &S) {
    let products = create_batch(store, 10).await;
    let price = products[0].price;
    let string_price = price.to_string();

    let by_number = store.find_by_price(PriceQuery::from(price)).await.unwrap();
    let by_string = store
        .find_by_price(PriceQuery::from(string_price.clone()))
        .await
        .unwrap();

    assert!(!by_string.is_empty());
    assert_eq!(by_string, by_number);
    assert_eq!(by_string[0].price.to_string(), string_price);

    let quoted = store
        .find_by_price(PriceQuery::from(format!(" \"{string_price}\" ")))
        .await
        .unwrap();
    assert_eq!(quoted, by_number);
}

pub async fn find_by_unparseable_price_is_a_validation_error<S: ProductStore>(store: &S) {
    create_batch(store, 2).await;
    let err = store
        .find_by_price(PriceQuery::from("redwhine"))
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

pub async fn stored_product_document_round_trips<S: ProductStore>(store: &S) {
    let mut product = ProductFactory::new().build();
    let id = store.create(&mut product).await.unwrap();
    let stored = store.find(id).await.unwrap().unwrap();

    let doc = stored.serialize();
    assert_eq!(doc["id"], json!(id.get()));

    let copy = Product::from_document(&doc).unwrap();
    assert_eq!(copy.id(), None);
    assert_eq!(copy, stored.detached());
}

pub async fn stored_product_rejects_bad_documents<S: ProductStore>(store: &S) {
    let mut product = ProductFactory::new().build();
    store.create(&mut product).await.unwrap();
    let mut doc = product.serialize();

    for bad in [json!(1), json!("redwhine")] {
        doc.insert("available".to_string(), bad);
        assert!(product.deserialize(&doc).is_err());
    }

    doc.insert("available".to_string(), json!(true));
    for bad in [json!(""), json!("redddy"), Value::Null] {
        doc.insert("category".to_string(), bad);
        assert!(product.deserialize(&doc).is_err());
    }

    let stored = store.find(product.id().unwrap()).await.unwrap().unwrap();
    assert_eq!(stored, product);
}

pub async fn price_with_more_than_two_decimals_is_rejected<S: ProductStore>(store: &S) {
    let mut product = ProductFactory::new().build();
    product.price = Decimal::new(1_005, 3);
    let err = store.create(&mut product).await.unwrap_err();
    assert!(err.is_validation(), "got {err:?}");
    assert_eq!(product.id(), None);
    assert!(store.all().await.unwrap().is_empty());

    // Trailing zeros do not count against the scale.
    product.price = Decimal::new(1_500, 3);
    let id = store.create(&mut product).await.unwrap();

    let found = store.find(id).await.unwrap().unwrap();
    assert_eq!(found.price, product.price);
    let by_price = store.find_by_price(PriceQuery::from(product.price)).await.unwrap();
    assert_eq!(by_price.len(), 1);
    let by_string = store.find_by_price(PriceQuery::from("1.500")).await.unwrap();
    assert_eq!(by_string, by_price);

    assert!(store
        .find_by_price(PriceQuery::from(Decimal::new(1_505, 3)))
        .await
        .unwrap()
        .is_empty());
}

pub async fn price_of_one_trillion_is_rejected<S: ProductStore>(store: &S) {
    let mut product = ProductFactory::new().build();
    product.price = Decimal::from(1_000_000_000_000i64);
    let err = store.create(&mut product).await.unwrap_err();
    assert!(err.is_validation(), "got {err:?}");
    assert!(store.all().await.unwrap().is_empty());

    product.price = Decimal::new(99_999_999_999_999, 2);
    let id = store.create(&mut product).await.unwrap();
    let found = store
        .find_by_price(PriceQuery::from("999999999999.99"))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id(), Some(id));
}

pub async fn overlong_name_and_description_are_rejected<S: ProductStore>(store: &S) {
    let mut product = ProductFactory::new().build();
    product.name = "N".repeat(101);
    let err = store.create(&mut product).await.unwrap_err();
    assert!(err.is_validation(), "got {err:?}");

    product.name = "N".repeat(100);
    product.description = "D".repeat(251);
    let err = store.create(&mut product).await.unwrap_err();
    assert!(err.is_validation(), "got {err:?}");
    assert!(store.all().await.unwrap().is_empty());

    product.description = "D".repeat(250);
    let id = store.create(&mut product).await.unwrap();

    let mut changed = product.clone();
    changed.name.push('N');
    let err = store.update(&changed).await.unwrap_err();
    assert!(err.is_validation(), "got {err:?}");

    let stored = store.find(id).await.unwrap().unwrap();
    assert_eq!(stored, product);
}
