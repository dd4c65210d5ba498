// kedai_server/src/db/products.rs

use crate::models::{Money, Product};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tracing::{info, instrument};

const PRODUCT_COLUMNS: &str = "id, name, price, description, image";

pub async fn list_products(pool: &SqlitePool) -> Result<Vec<Product>, sqlx::Error> {
  sqlx::query_as(&format!("SELECT {} FROM products ORDER BY id ASC", PRODUCT_COLUMNS))
    .fetch_all(pool)
    .await
}

pub async fn find_product(pool: &SqlitePool, product_id: i64) -> Result<Option<Product>, sqlx::Error> {
  sqlx::query_as(&format!("SELECT {} FROM products WHERE id = ?", PRODUCT_COLUMNS))
    .bind(product_id)
    .fetch_optional(pool)
    .await
}

struct MenuItem<'a> {
  pub name: &'a str,
  pub price: Decimal,
  pub description: Option<&'a str>,
  pub image: Option<&'a str>,
}

fn house_menu() -> Vec<MenuItem<'static>> {
  vec![
    MenuItem {
      name: "Kopi Susu",
      price: Decimal::new(15000, 0),
      description: Some("Espresso with fresh milk and palm sugar."),
      image: Some("kopi-susu.jpg"),
    },
    MenuItem {
      name: "Americano",
      price: Decimal::new(18000, 0),
      description: Some("Double shot espresso topped with hot water."),
      image: Some("americano.jpg"),
    },
    MenuItem {
      name: "Cappuccino",
      price: Decimal::new(20000, 0),
      description: Some("Espresso, steamed milk and a thick layer of foam."),
      image: Some("cappuccino.jpg"),
    },
    MenuItem {
      name: "Matcha Latte",
      price: Decimal::new(22000, 0),
      description: Some("Japanese green tea whisked with milk."),
      image: Some("matcha-latte.jpg"),
    },
    MenuItem {
      name: "Croissant",
      price: Decimal::new(12500, 0),
      description: Some("Butter croissant, baked every morning."),
      image: Some("croissant.jpg"),
    },
  ]
}

/// Inserts the house menu when the catalog is empty. Returns the number of
/// products inserted.
#[instrument(skip(pool))]
pub async fn seed_catalog(pool: &SqlitePool) -> Result<usize, sqlx::Error> {
  let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products").fetch_one(pool).await?;
  if existing > 0 {
    info!(existing, "Catalog already populated, skipping seed.");
    return Ok(0);
  }

  let menu = house_menu();
  let mut tx = pool.begin().await?;
  for product in &menu {
    sqlx::query("INSERT INTO products (name, price, description, image) VALUES (?, ?, ?, ?)")
      .bind(product.name)
      .bind(Money(product.price))
      .bind(product.description)
      .bind(product.image)
      .execute(&mut *tx)
      .await?;
  }
  tx.commit().await?;

  info!(inserted = menu.len(), "Catalog seeded.");
  Ok(menu.len())
}
