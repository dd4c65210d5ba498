// kedai_server/src/models/order.rs

use crate::models::{Money, OrderItem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Processing,
  Completed,
  Cancelled,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: i64,
  pub user_id: i64,
  pub total_price: Money,
  pub status: OrderStatus,
  pub created_at: DateTime<Utc>,
}

/// An order together with its buyer's name and its item snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
  #[serde(flatten)]
  pub order: Order,
  pub customer_name: Option<String>,
  pub items: Vec<OrderItem>,
}
