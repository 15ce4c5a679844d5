//! Cart persistence through the file-backed store.

use std::sync::Arc;

use cakeshop_cache::{Cache, FileStore};
use cakeshop_cart::prelude::*;
use cakeshop_cart::demo_items;

fn file_cache(dir: &std::path::Path) -> Cache {
    Cache::new(Arc::new(FileStore::open(dir).unwrap()))
}

#[test]
fn test_cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let mut store = CartStore::open(file_cache(dir.path()), CartOptions::default());
    store
        .add_item(
            LineItem::new(ProductId::new(7), "Fondant", Money::from_minor(12_550))
                .with_variant("White")
                .with_quantity(2),
        )
        .unwrap();
    store
        .add_item(LineItem::new(ProductId::new(3), "Cake board", Money::from_major(90)))
        .unwrap();
    let before = store.items().to_vec();
    drop(store);

    let reopened = CartStore::open(file_cache(dir.path()), CartOptions::default());
    assert_eq!(reopened.hydration(), HydrationSource::Persisted);
    assert_eq!(reopened.items(), before.as_slice());
    assert_eq!(reopened.subtotal(), Money::from_minor(2 * 12_550 + 9_000));
}

#[test]
fn test_persisted_record_format() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = CartStore::open(file_cache(dir.path()), CartOptions::default());
    store
        .add_item(
            LineItem::new(ProductId::new(1), "Piping nozzles", Money::from_major(160))
                .with_image("/images/product1.jpg")
                .with_variant("Standard Set"),
        )
        .unwrap();

    let raw = std::fs::read_to_string(dir.path().join("cart.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{
            "id": 1,
            "name": "Piping nozzles",
            "price": 160,
            "image": "/images/product1.jpg",
            "quantity": 1,
            "variant": "Standard Set"
        }])
    );
}

#[test]
fn test_unparsable_file_reseeds_without_crashing() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("cart.json"), "{{{ definitely not a cart").unwrap();

    let store = CartStore::open(
        file_cache(dir.path()),
        CartOptions::default().with_seed(CartSeed::Demo),
    );

    assert_eq!(store.hydration(), HydrationSource::Recovered);
    assert_eq!(store.items(), demo_items().as_slice());
    assert!(!store.is_empty());
}

#[test]
fn test_externally_wiped_slot_is_seen_on_next_open() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = CartStore::open(file_cache(dir.path()), CartOptions::default());
    store
        .add_item(LineItem::new(ProductId::new(1), "Nozzles", Money::from_major(160)))
        .unwrap();
    drop(store);

    std::fs::remove_file(dir.path().join("cart.json")).unwrap();

    let reopened = CartStore::open(file_cache(dir.path()), CartOptions::default());
    assert_eq!(reopened.hydration(), HydrationSource::Seeded);
    assert!(reopened.is_empty());
}

#[test]
fn test_unreadable_slot_survives_open() {
    let dir = tempfile::tempdir().unwrap();
    // A directory in place of the slot file fails to read without being absent.
    std::fs::create_dir(dir.path().join("cart.json")).unwrap();

    let store = CartStore::open(
        file_cache(dir.path()),
        CartOptions::default().with_seed(CartSeed::Demo),
    );

    assert_eq!(store.hydration(), HydrationSource::Unavailable);
    assert_eq!(store.cart_count(), 3);
    assert!(dir.path().join("cart.json").is_dir());
}

#[test]
fn test_clear_removes_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = CartStore::open(
        file_cache(dir.path()),
        CartOptions::default().with_seed(CartSeed::Demo),
    );
    assert!(dir.path().join("cart.json").is_file());

    store.clear();

    assert!(!dir.path().join("cart.json").exists());
    assert_eq!(store.cart_count(), 0);
}

#[test]
fn test_flush_reports_storage_errors() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = CartStore::open(file_cache(dir.path()), CartOptions::default());
    store
        .add_item(LineItem::new(ProductId::new(1), "Nozzles", Money::from_major(160)))
        .unwrap();
    assert!(store.flush().is_ok());

    // Storage directory vanishes underneath the store.
    std::fs::remove_dir_all(dir.path()).unwrap();
    assert!(matches!(store.flush(), Err(CartError::Storage(_))));

    // Mutations keep working in memory.
    store.update_quantity(ProductId::new(1), 4).unwrap();
    assert_eq!(store.cart_count(), 4);
}
