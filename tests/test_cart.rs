//! Cart store integration tests: aggregation, totals, persistence and the
//! update stream.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use storefront_sdk::config::CART_STORAGE_KEY;
use storefront_sdk::models::Cart;
use storefront_sdk::{CartStore, FileStorage, MemoryStorage, Result, Storage, StorefrontError};

fn assert_totals_consistent(cart: &Cart) {
    let items: u64 = cart.items.iter().map(|i| u64::from(i.quantity)).sum();
    let price: f64 = cart
        .items
        .iter()
        .map(|i| i.product.price * f64::from(i.quantity))
        .sum();
    assert_eq!(cart.total_items, items);
    assert!((cart.total_price - price).abs() < 1e-9);
}

fn assert_unique_ids(cart: &Cart) {
    let mut ids: Vec<i64> = cart.items.iter().map(|i| i.product.id).collect();
    let len = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), len, "duplicate product ids in cart");
}

// ---------------------------------------------------------------------------
// add_to_cart
// ---------------------------------------------------------------------------

#[test]
fn adding_same_product_twice_aggregates_quantity() {
    let store = CartStore::in_memory();
    let p1 = &common::sample_products()[0];

    store.add_to_cart(p1, 1);
    store.add_to_cart(p1, 2);

    let cart = store.current_cart();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].product.id, p1.id);
    assert_eq!(cart.items[0].quantity, 3);
    assert_eq!(cart.total_items, 3);
    assert_eq!(cart.total_price, 75.0);
}

#[test]
fn totals_hold_after_every_mutation() {
    let store = CartStore::in_memory();
    let products = common::sample_products();

    let observed = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&observed);
    let _sub = store.subscribe(move |cart| sink.borrow_mut().push(cart.clone()));

    store.add_to_cart(&products[0], 2);
    store.add_to_cart(&products[1], 1);
    store.add_to_cart(&products[2], 4);
    store.add_to_cart(&products[0], 1);
    store.update_quantity(products[1].id, 5);
    store.remove_from_cart(products[2].id);
    store.update_quantity(products[0].id, 0);

    for cart in observed.borrow().iter() {
        assert_totals_consistent(cart);
        assert_unique_ids(cart);
    }

    let cart = store.current_cart();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.total_items, 5);
    assert_eq!(cart.total_price, 200.0);
}

#[test]
fn adding_zero_units_changes_nothing() {
    let store = CartStore::in_memory();
    store.add_to_cart(&common::sample_products()[0], 0);
    assert!(store.current_cart().is_empty());
    assert!(!store.is_in_cart(1));
}

#[test]
fn new_items_keep_insertion_order() {
    let store = CartStore::in_memory();
    let products = common::sample_products();
    store.add_to_cart(&products[2], 1);
    store.add_to_cart(&products[0], 1);
    store.add_to_cart(&products[2], 1);

    let ids: Vec<i64> = store.current_cart().items.iter().map(|i| i.product.id).collect();
    assert_eq!(ids, vec![3, 1]);
}

// ---------------------------------------------------------------------------
// remove / update / clear
// ---------------------------------------------------------------------------

#[test]
fn update_quantity_zero_or_negative_removes() {
    let store = CartStore::in_memory();
    let products = common::sample_products();
    store.add_to_cart(&products[0], 3);
    store.add_to_cart(&products[1], 1);

    store.update_quantity(products[0].id, 0);
    assert!(!store.is_in_cart(products[0].id));

    store.update_quantity(products[1].id, -4);
    assert!(!store.is_in_cart(products[1].id));
    assert_eq!(store.total_items(), 0);
    assert_eq!(store.total_price(), 0.0);
}

#[test]
fn update_quantity_sets_exact_value() {
    let store = CartStore::in_memory();
    let p = &common::sample_products()[2];
    store.add_to_cart(p, 1);
    store.update_quantity(p.id, 7);
    assert_eq!(store.product_quantity(p.id), 7);
    assert_eq!(store.total_price(), 129.5);
}

#[test]
fn huge_quantities_across_lines_keep_exact_totals() {
    let store = CartStore::in_memory();
    let products = common::sample_products();

    store.add_to_cart(&products[0], 1);
    store.update_quantity(products[0].id, 5_000_000_000);
    store.add_to_cart(&products[1], 1);
    store.add_to_cart(&products[1], u32::MAX);

    let cart = store.current_cart();
    assert_eq!(cart.items[0].quantity, u32::MAX);
    assert_eq!(cart.items[1].quantity, u32::MAX);
    assert_eq!(cart.total_items, 2 * u64::from(u32::MAX));
    assert_eq!(store.total_items(), cart.total_items);
    assert_totals_consistent(&cart);
}

#[test]
fn update_quantity_of_absent_product_is_noop() {
    let store = CartStore::in_memory();
    store.update_quantity(42, 3);
    assert!(store.current_cart().is_empty());
}

#[test]
fn remove_absent_product_leaves_cart_unchanged_and_silent() {
    let store = CartStore::in_memory();
    store.add_to_cart(&common::sample_products()[0], 2);
    let before = store.current_cart();

    let notifications = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&notifications);
    let _sub = store.subscribe(move |_| *counter.borrow_mut() += 1);
    assert_eq!(*notifications.borrow(), 1);

    store.remove_from_cart(999);

    assert_eq!(store.current_cart(), before);
    assert_eq!(*notifications.borrow(), 1);
}

#[test]
fn clear_cart_empties_and_persists() {
    let storage = Rc::new(MemoryStorage::new());
    let store = CartStore::new(Rc::clone(&storage));
    store.add_to_cart(&common::sample_products()[0], 2);
    store.clear_cart();

    assert!(store.current_cart().is_empty());
    let raw = storage.get_item(CART_STORAGE_KEY).unwrap().unwrap();
    let saved: Cart = serde_json::from_str(&raw).unwrap();
    assert!(saved.items.is_empty());
    assert_eq!(saved.total_items, 0);
}

#[test]
fn queries_report_membership_and_quantity() {
    let store = CartStore::in_memory();
    let p = &common::sample_products()[1];
    assert!(!store.is_in_cart(p.id));
    assert_eq!(store.product_quantity(p.id), 0);

    store.add_to_cart(p, 2);
    assert!(store.is_in_cart(p.id));
    assert_eq!(store.product_quantity(p.id), 2);
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn cart_round_trips_through_file_storage() {
    let tmp = tempfile::tempdir().unwrap();
    let products = common::sample_products();

    let saved = {
        let store = CartStore::new(FileStorage::new(Some(tmp.path().to_path_buf())).unwrap());
        store.add_to_cart(&products[0], 2);
        store.add_to_cart(&products[1], 1);
        store.current_cart()
    };

    let restored = CartStore::new(FileStorage::new(Some(tmp.path().to_path_buf())).unwrap());
    assert_eq!(restored.current_cart(), saved);
    assert_eq!(restored.total_items(), 3);
    assert_eq!(restored.total_price(), 90.0);
}

#[test]
fn persisted_cart_uses_camel_case_keys() {
    let storage = Rc::new(MemoryStorage::new());
    let store = CartStore::new(Rc::clone(&storage));
    store.add_to_cart(&common::sample_products()[0], 1);

    let raw = storage.get_item(CART_STORAGE_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["totalItems"], 1);
    assert_eq!(json["totalPrice"], 25.0);
    assert_eq!(json["items"][0]["quantity"], 1);
    assert_eq!(json["items"][0]["product"]["age_group"], "adulte");
    assert!(json["items"][0]["addedAt"].is_string());
}

#[test]
fn malformed_stored_cart_falls_back_to_empty() {
    let storage = MemoryStorage::new();
    storage.set_item(CART_STORAGE_KEY, "{not json").unwrap();

    let store = CartStore::new(storage);
    assert!(store.current_cart().is_empty());
    assert_eq!(store.total_items(), 0);
}

#[test]
fn missing_stored_cart_starts_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let store = CartStore::new(FileStorage::new(Some(tmp.path().to_path_buf())).unwrap());
    assert!(store.current_cart().is_empty());
}

#[test]
fn restored_totals_are_recomputed_from_items() {
    let storage = MemoryStorage::new();
    let raw = serde_json::json!({
        "items": [{
            "product": common::sample_products()[0],
            "quantity": 2,
            "addedAt": "2024-01-15T10:30:00Z"
        }],
        "totalItems": 99,
        "totalPrice": 1.0
    });
    storage.set_item(CART_STORAGE_KEY, &raw.to_string()).unwrap();

    let store = CartStore::new(storage);
    let cart = store.current_cart();
    assert_eq!(cart.total_items, 2);
    assert_eq!(cart.total_price, 50.0);
    assert_eq!(cart.items[0].added_at.to_rfc3339(), "2024-01-15T10:30:00+00:00");
}

/// Storage that fails every call.
struct BrokenStorage;

impl Storage for BrokenStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>> {
        Err(StorefrontError::InvalidArgument("storage unavailable".into()))
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<()> {
        Err(StorefrontError::InvalidArgument("storage unavailable".into()))
    }

    fn remove_item(&self, _key: &str) -> Result<()> {
        Err(StorefrontError::InvalidArgument("storage unavailable".into()))
    }
}

#[test]
fn storage_failures_are_swallowed() {
    let store = CartStore::new(BrokenStorage);
    assert!(store.current_cart().is_empty());

    store.add_to_cart(&common::sample_products()[0], 1);
    assert_eq!(store.total_items(), 1);
}

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

#[test]
fn subscriber_receives_current_cart_immediately() {
    let store = CartStore::in_memory();
    store.add_to_cart(&common::sample_products()[0], 2);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _sub = store.subscribe_total_items(move |n| sink.borrow_mut().push(n));

    assert_eq!(*seen.borrow(), vec![2]);
}

#[test]
fn every_subscriber_sees_every_update_in_order() {
    let store = CartStore::in_memory();
    let products = common::sample_products();

    let first = Rc::new(RefCell::new(Vec::new()));
    let second = Rc::new(RefCell::new(Vec::new()));
    let a = Rc::clone(&first);
    let b = Rc::clone(&second);
    let _s1 = store.subscribe_total_items(move |n| a.borrow_mut().push(n));
    let _s2 = store.subscribe_total_price(move |p| b.borrow_mut().push(p));

    store.add_to_cart(&products[0], 1);
    store.add_to_cart(&products[1], 2);
    store.update_quantity(products[0].id, 3);
    store.clear_cart();

    assert_eq!(*first.borrow(), vec![0, 1, 3, 5, 0]);
    assert_eq!(*second.borrow(), vec![0.0, 25.0, 105.0, 155.0, 0.0]);
}

#[test]
fn unsubscribed_callback_stops_receiving() {
    let store = CartStore::in_memory();
    let count = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&count);
    let sub = store.subscribe(move |_| *counter.borrow_mut() += 1);
    assert_eq!(store.subscriber_count(), 1);

    assert!(store.unsubscribe(&sub));
    assert!(!store.unsubscribe(&sub));
    store.add_to_cart(&common::sample_products()[0], 1);

    assert_eq!(*count.borrow(), 1);
    assert_eq!(store.subscriber_count(), 0);
}
