// kedai_server/tests/common/mod.rs
#![allow(dead_code)]

use kedai_server::config::AppConfig;
use kedai_server::db;
use kedai_server::state::AppState;
use kedai_server::web::dto::{CreateOrderRequest, OrderLineRequest};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use std::sync::Arc;

pub static TRACING: Lazy<()> = Lazy::new(|| {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
});

pub const KOPI_SUSU: i64 = 1;
pub const CAPPUCCINO: i64 = 3;

/// Fresh in-memory database with the schema and the house menu.
pub async fn test_state(surcharge_percent: Decimal) -> AppState {
  Lazy::force(&TRACING);
  let pool = db::connect("sqlite::memory:", 1).await.expect("in-memory database");
  db::migrate(&pool).await.expect("migrations");
  db::products::seed_catalog(&pool).await.expect("seed");

  let config = AppConfig {
    database_url: "sqlite::memory:".to_string(),
    order_surcharge_percent: surcharge_percent,
    ..AppConfig::default()
  };
  AppState::new(pool, Arc::new(config))
}

pub fn line(product_id: i64, name: &str, price: i64, quantity: i64) -> OrderLineRequest {
  OrderLineRequest {
    product_id,
    quantity,
    price: Decimal::new(price, 0),
    name: name.to_string(),
    image: None,
  }
}

/// Two Kopi Susu and one Cappuccino: 50000 before surcharge.
pub fn scenario_request(customer_name: &str) -> CreateOrderRequest {
  CreateOrderRequest {
    user_id: None,
    customer_name: Some(customer_name.to_string()),
    customer_email: None,
    items: vec![
      line(KOPI_SUSU, "Kopi Susu", 15000, 2),
      line(CAPPUCCINO, "Cappuccino", 20000, 1),
    ],
    total_price: Some(Decimal::new(50000, 0)),
  }
}

pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
  sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
    .fetch_one(pool)
    .await
    .expect("count query")
}

/// Makes every order item insert fail, leaving the order header insert untouched.
pub async fn break_order_items(pool: &SqlitePool) {
  sqlx::query(
    "CREATE TRIGGER fail_order_items BEFORE INSERT ON order_items \
     BEGIN SELECT RAISE(ABORT, 'injected failure'); END;",
  )
  .execute(pool)
  .await
  .expect("create trigger");
}

pub async fn repair_order_items(pool: &SqlitePool) {
  sqlx::query("DROP TRIGGER IF EXISTS fail_order_items")
    .execute(pool)
    .await
    .expect("drop trigger");
}
