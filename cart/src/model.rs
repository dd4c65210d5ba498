// kedai_cart/src/model.rs

//! Cart data and the storefront API's wire types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id: i64,
  pub name: String,
  pub price: Decimal,
  #[serde(default)]
  pub description: Option<String>,
  #[serde(default)]
  pub image: Option<String>,
  #[serde(default)]
  pub image_url: Option<String>,
}

/// One product in the cart. Name, price and image are captured when the
/// product is first added and are not refreshed from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
  pub product_id: i64,
  pub name: String,
  #[serde(rename = "price")]
  pub unit_price: Decimal,
  #[serde(default)]
  pub image: Option<String>,
  pub quantity: u32,
}

impl CartLine {
  pub fn from_product(product: &Product, quantity: u32) -> Self {
    Self {
      product_id: product.id,
      name: product.name.clone(),
      unit_price: product.price,
      image: product.image.clone(),
      quantity,
    }
  }

  /// `None` when the amount does not fit in a `Decimal`.
  pub fn checked_line_total(&self) -> Option<Decimal> {
    self.unit_price.checked_mul(Decimal::from(self.quantity))
  }

  /// Saturates instead of overflowing. A [`crate::CartStore`] never holds
  /// lines whose total would saturate.
  pub fn line_total(&self) -> Decimal {
    self.unit_price.saturating_mul(Decimal::from(self.quantity))
  }
}

/// Σ line totals, or `None` if any step overflows.
pub fn checked_cart_total(lines: &[CartLine]) -> Option<Decimal> {
  lines
    .iter()
    .try_fold(Decimal::ZERO, |total, line| total.checked_add(line.checked_line_total()?))
}

pub(crate) fn saturating_cart_total(lines: &[CartLine]) -> Decimal {
  lines
    .iter()
    .fold(Decimal::ZERO, |total, line| total.saturating_add(line.line_total()))
}

/// Read-only copy of the cart at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSnapshot {
  pub lines: Vec<CartLine>,
  pub total: Decimal,
}

impl CartSnapshot {
  pub fn from_lines(lines: Vec<CartLine>) -> Self {
    let total = saturating_cart_total(&lines);
    Self { lines, total }
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  pub fn total_items(&self) -> u64 {
    self.lines.iter().map(|line| u64::from(line.quantity)).sum()
  }

  /// Total shown to the customer with a flat surcharge on top, rounded to
  /// two decimal places. Display only; orders are submitted with `total`.
  pub fn display_total(&self, surcharge_percent: Decimal) -> Decimal {
    let surcharge = (self.total.saturating_mul(surcharge_percent) / Decimal::ONE_HUNDRED).round_dp(2);
    self.total.saturating_add(surcharge)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id: i64,
  pub name: String,
  pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderLinePayload {
  pub product_id: i64,
  pub quantity: i64,
  pub price: Decimal,
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub image: Option<String>,
}

impl From<&CartLine> for OrderLinePayload {
  fn from(line: &CartLine) -> Self {
    Self {
      product_id: line.product_id,
      quantity: i64::from(line.quantity),
      price: line.unit_price,
      name: line.name.clone(),
      image: line.image.clone(),
    }
  }
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderPayload {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub user_id: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub customer_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub customer_email: Option<String>,
  pub items: Vec<OrderLinePayload>,
  pub total_price: Decimal,
}

impl CreateOrderPayload {
  pub fn from_snapshot(snapshot: &CartSnapshot) -> Self {
    Self {
      user_id: None,
      customer_name: None,
      customer_email: None,
      items: snapshot.lines.iter().map(OrderLinePayload::from).collect(),
      total_price: snapshot.total,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderItem {
  pub id: i64,
  pub order_id: i64,
  pub product_id: i64,
  pub quantity: i64,
  pub price: Decimal,
  pub product_name: String,
  #[serde(default)]
  pub product_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Order {
  pub id: i64,
  pub user_id: i64,
  pub total_price: Decimal,
  pub status: String,
  pub created_at: DateTime<Utc>,
  #[serde(default)]
  pub customer_name: Option<String>,
  #[serde(default)]
  pub items: Vec<OrderItem>,
}
