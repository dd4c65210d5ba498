// kedai_server/src/models/order_item.rs

use crate::models::Money;
use serde::Serialize;
use sqlx::FromRow;

/// A purchased line. Name, image and price are copied from the cart at
/// submission time and never follow later catalog edits.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
  pub id: i64,
  pub order_id: i64,
  pub product_id: i64,
  pub quantity: i64,
  pub price: Money,
  pub product_name: String,
  pub product_image: Option<String>,
}

impl OrderItem {
  pub fn line_total(&self) -> rust_decimal::Decimal {
    self.price.amount() * rust_decimal::Decimal::from(self.quantity)
  }
}
