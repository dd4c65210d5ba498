// kedai_cart/tests/cart_store_tests.rs

use kedai_cart::{CartStore, FileCartStorage, MemoryCartStorage, Product};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::sync::Arc;

static TRACING: Lazy<()> = Lazy::new(|| {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
});

fn product(id: i64, name: &str, price: Decimal) -> Product {
  Product {
    id,
    name: name.to_string(),
    price,
    description: None,
    image: Some(format!("{}.jpg", id)),
    image_url: None,
  }
}

fn kopi_susu() -> Product {
  product(1, "Kopi Susu", Decimal::new(15000, 0))
}

fn cappuccino() -> Product {
  product(2, "Cappuccino", Decimal::new(20000, 0))
}

#[test]
fn adding_same_product_merges_lines() {
  Lazy::force(&TRACING);
  let store = CartStore::in_memory();

  store.add(&kopi_susu(), 1);
  store.add(&kopi_susu(), 2);

  let lines = store.lines();
  assert_eq!(lines.len(), 1);
  assert_eq!(lines[0].quantity, 3);
  assert_eq!(store.total_items(), 3);
}

#[test]
fn merged_line_keeps_first_captured_price() {
  let store = CartStore::in_memory();
  store.add(&kopi_susu(), 1);

  let repriced = product(1, "Kopi Susu (new)", Decimal::new(17000, 0));
  store.add(&repriced, 1);

  let line = store.line(1).unwrap();
  assert_eq!(line.unit_price, Decimal::new(15000, 0));
  assert_eq!(line.name, "Kopi Susu");
  assert_eq!(line.quantity, 2);
}

#[test]
fn zero_quantity_add_is_ignored() {
  let store = CartStore::in_memory();
  store.add(&kopi_susu(), 0);
  assert!(store.is_empty());
}

#[test]
fn quantity_below_one_is_ignored() {
  let store = CartStore::in_memory();
  store.add(&kopi_susu(), 2);

  store.update_quantity(1, 0);
  store.update_quantity(1, -4);
  assert_eq!(store.line(1).unwrap().quantity, 2);

  store.update_quantity(1, 5);
  assert_eq!(store.line(1).unwrap().quantity, 5);
}

#[test]
fn updating_unknown_product_changes_nothing() {
  let store = CartStore::in_memory();
  store.add(&kopi_susu(), 1);
  store.update_quantity(99, 3);
  assert_eq!(store.lines().len(), 1);
  assert!(store.line(99).is_none());
}

#[test]
fn remove_and_clear() {
  let store = CartStore::in_memory();
  store.add(&kopi_susu(), 2);
  store.add(&cappuccino(), 1);

  store.remove(1);
  assert!(store.line(1).is_none());
  assert_eq!(store.total_items(), 1);

  store.remove(1); // already gone
  store.clear();
  assert!(store.is_empty());
  assert_eq!(store.total_price(), Decimal::ZERO);
}

#[test]
fn totals_match_scenario() {
  let store = CartStore::in_memory();
  store.add(&kopi_susu(), 2);
  store.add(&cappuccino(), 1);

  assert_eq!(store.total_items(), 3);
  assert_eq!(store.total_price(), Decimal::new(50000, 0));

  let snapshot = store.snapshot();
  assert_eq!(snapshot.total, store.total_price());
  assert_eq!(snapshot.display_total(Decimal::TEN), Decimal::new(55000, 0));
}

#[test]
fn totals_are_exact_for_fractional_prices() {
  let store = CartStore::in_memory();
  store.add(&product(10, "Extra shot", Decimal::new(1, 1)), 1); // 0.1
  store.add(&product(11, "Syrup", Decimal::new(2, 1)), 1); // 0.2
  assert_eq!(store.total_price(), Decimal::new(3, 1));
}

#[test]
fn cart_survives_reopen_from_file() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("cart.json");

  {
    let store = CartStore::open(FileCartStorage::new(&path));
    store.add(&kopi_susu(), 2);
    store.add(&cappuccino(), 1);
    store.update_quantity(2, 4);
  }

  let reopened = CartStore::open(FileCartStorage::new(&path));
  assert_eq!(reopened.lines().len(), 2);
  assert_eq!(reopened.line(1).unwrap().quantity, 2);
  assert_eq!(reopened.line(2).unwrap().quantity, 4);
  assert_eq!(reopened.total_price(), Decimal::new(110000, 0));
}

#[test]
fn unreadable_storage_starts_empty() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("cart.json");
  std::fs::write(&path, "[{\"broken\": true").unwrap();

  let store = CartStore::open(FileCartStorage::new(&path));
  assert!(store.is_empty());

  store.add(&kopi_susu(), 1);
  let reopened = CartStore::open(FileCartStorage::new(&path));
  assert_eq!(reopened.total_items(), 1);
}

#[test]
fn storage_failures_do_not_affect_memory_state() {
  Lazy::force(&TRACING);
  let storage = Arc::new(MemoryCartStorage::new());
  let store = CartStore::open(storage.clone());

  store.add(&kopi_susu(), 1);
  storage.set_failing(true);
  store.add(&kopi_susu(), 1);
  store.add(&cappuccino(), 1);

  assert_eq!(store.total_items(), 3);
  assert_eq!(storage.saved_lines().len(), 1);
  assert_eq!(storage.saved_lines()[0].quantity, 1);

  storage.set_failing(false);
  store.flush().unwrap();
  assert_eq!(storage.saved_lines().len(), 2);
}

#[test]
fn flush_reports_storage_errors() {
  let storage = Arc::new(MemoryCartStorage::new());
  let store = CartStore::open(storage.clone());
  store.add(&kopi_susu(), 1);
  storage.set_failing(true);
  assert!(store.flush().is_err());
}

#[test]
fn every_mutation_is_written_through() {
  let storage = Arc::new(MemoryCartStorage::new());
  let store = CartStore::open(storage.clone());

  store.add(&kopi_susu(), 1);
  assert_eq!(storage.saved_lines().len(), 1);
  store.update_quantity(1, 3);
  assert_eq!(storage.saved_lines()[0].quantity, 3);
  store.clear();
  assert!(storage.saved_lines().is_empty());
  assert_eq!(storage.save_count(), 3);
}

#[test]
fn concurrent_adds_are_not_lost() {
  let storage = Arc::new(MemoryCartStorage::new());
  let store = Arc::new(CartStore::open(storage.clone()));

  let handles: Vec<_> = (0..8)
    .map(|_| {
      let store = store.clone();
      std::thread::spawn(move || {
        for _ in 0..25 {
          store.add(&kopi_susu(), 1);
        }
      })
    })
    .collect();
  for handle in handles {
    handle.join().unwrap();
  }

  assert_eq!(store.total_items(), 200);
  // The newest generation is the last one written, so storage matches memory.
  assert_eq!(storage.saved_lines()[0].quantity, 200);
}

#[test]
fn high_precision_price_survives_reopen_from_file() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("cart.json");
  let price = Decimal::new(12345678901234567, 2); // 123456789012345.67

  {
    let store = CartStore::open(FileCartStorage::new(&path));
    store.add(&product(5, "Espresso Machine", price), 1);
  }

  let reopened = CartStore::open(FileCartStorage::new(&path));
  assert_eq!(reopened.line(5).unwrap().unit_price, price);
  assert_eq!(reopened.total_price(), price);
}

#[test]
fn adds_that_overflow_the_total_are_ignored() {
  Lazy::force(&TRACING);
  let storage = Arc::new(MemoryCartStorage::new());
  let store = CartStore::open(storage.clone());
  let gold = product(9, "Gold Bar", Decimal::MAX);

  store.add(&gold, 2);
  assert!(store.is_empty());
  assert_eq!(storage.save_count(), 0);

  store.add(&gold, 1);
  store.add(&kopi_susu(), 1);
  store.add(&gold, 1);
  store.update_quantity(9, 3);
  assert_eq!(store.lines().len(), 1);
  assert_eq!(store.line(9).unwrap().quantity, 1);
  assert_eq!(store.total_price(), Decimal::MAX);
  assert_eq!(store.snapshot().total, Decimal::MAX);

  store.clear();
  store.add(&kopi_susu(), 2);
  assert_eq!(store.total_price(), Decimal::new(30000, 0));
}

#[test]
fn saved_cart_with_overflowing_total_opens_empty() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("cart.json");
  let line = format!(
    r#"{{"product_id":9,"name":"Gold Bar","price":{},"quantity":2}}"#,
    Decimal::MAX
  );
  std::fs::write(&path, format!("[{}]", line)).unwrap();

  let store = CartStore::open(FileCartStorage::new(&path));
  assert!(store.is_empty());
}
