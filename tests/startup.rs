//! Tests for opening the catalog store at startup.

use std::fs;

use peripheral_store::{ensure_schema, ensure_seeded, fetch_products, open_catalog};

#[test]
fn healthy_store_is_opened_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("store.sqlite");
    {
        let mut conn = ensure_schema(&path).unwrap();
        ensure_seeded(&mut conn).unwrap();
    }

    let catalog = open_catalog(&path).unwrap();
    assert!(catalog.persistent);
    assert_eq!(catalog.products.len(), 8);
}

#[test]
fn fresh_store_starts_with_empty_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.sqlite");

    let catalog = open_catalog(&path).unwrap();
    assert!(catalog.persistent);
    assert!(catalog.products.is_empty());
    assert!(path.exists());
}

#[test]
fn unusable_data_directory_falls_back_to_memory() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "plain file").unwrap();

    let catalog = open_catalog(&blocker.join("store.sqlite")).unwrap();
    assert!(!catalog.persistent);
    assert!(catalog.products.is_empty());
    assert!(fetch_products(&catalog.conn).unwrap().is_empty());
}

#[test]
fn corrupt_store_falls_back_to_memory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.sqlite");
    fs::write(&path, vec![b'x'; 4096]).unwrap();

    let catalog = open_catalog(&path).unwrap();
    assert!(!catalog.persistent);
    assert!(catalog.products.is_empty());
}

#[test]
fn fallback_store_still_accepts_seeding() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "plain file").unwrap();

    let mut catalog = open_catalog(&blocker.join("store.sqlite")).unwrap();
    ensure_seeded(&mut catalog.conn).unwrap();
    assert_eq!(fetch_products(&catalog.conn).unwrap().len(), 8);
}
