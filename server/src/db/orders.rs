// kedai_server/src/db/orders.rs

//! Order persistence: the transactional write behind checkout and the
//! Order Reader queries.

use crate::models::{Money, Order, OrderItem, OrderStatus, OrderView};
use chrono::Utc;
use futures_util::future::try_join_all;
use rust_decimal::Decimal;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool, Transaction};
use tracing::{error, info, instrument};

const ORDER_COLUMNS: &str = "id, user_id, total_price, status, created_at";
const ORDER_ITEM_COLUMNS: &str = "id, order_id, product_id, quantity, price, product_name, product_image";

#[derive(Debug, Clone)]
pub struct NewOrderItem {
  pub product_id: i64,
  pub quantity: i64,
  pub price: Decimal,
  pub product_name: String,
  pub product_image: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
  pub user_id: i64,
  pub total_price: Decimal,
  pub items: Vec<NewOrderItem>,
}

#[derive(Debug, FromRow)]
struct OrderWithCustomer {
  #[sqlx(flatten)]
  order: Order,
  customer_name: Option<String>,
}

/// Writes the order header and all of its items in one transaction.
///
/// Either everything is committed or nothing is: any failure rolls back and
/// the error is returned. The connection goes back to the pool on every path.
#[instrument(
  name = "orders::insert_order_with_items",
  skip_all,
  fields(user_id = new_order.user_id, item_count = new_order.items.len())
)]
pub async fn insert_order_with_items(
  pool: &SqlitePool,
  new_order: &NewOrder,
) -> Result<(Order, Vec<OrderItem>), sqlx::Error> {
  let mut tx = pool.begin().await?;

  match write_order(&mut tx, new_order).await {
    Ok(written) => {
      tx.commit().await?;
      info!(order_id = written.0.id, "Order committed.");
      Ok(written)
    }
    Err(e) => {
      error!(error = %e, "Order write failed, rolling back.");
      if let Err(rollback_err) = tx.rollback().await {
        error!(error = %rollback_err, "Rollback failed.");
      }
      Err(e)
    }
  }
}

async fn write_order(
  tx: &mut Transaction<'_, Sqlite>,
  new_order: &NewOrder,
) -> Result<(Order, Vec<OrderItem>), sqlx::Error> {
  let order: Order = sqlx::query_as(&format!(
    "INSERT INTO orders (user_id, total_price, status, created_at) VALUES (?, ?, ?, ?) RETURNING {}",
    ORDER_COLUMNS
  ))
  .bind(new_order.user_id)
  .bind(Money(new_order.total_price))
  .bind(OrderStatus::Pending)
  .bind(Utc::now())
  .fetch_one(&mut **tx)
  .await?;

  if new_order.items.is_empty() {
    return Ok((order, Vec::new()));
  }

  let mut builder: QueryBuilder<Sqlite> =
    QueryBuilder::new("INSERT INTO order_items (order_id, product_id, quantity, price, product_name, product_image) ");
  builder.push_values(&new_order.items, |mut row, item| {
    row
      .push_bind(order.id)
      .push_bind(item.product_id)
      .push_bind(item.quantity)
      .push_bind(Money(item.price))
      .push_bind(item.product_name.clone())
      .push_bind(item.product_image.clone());
  });
  builder.push(" RETURNING ");
  builder.push(ORDER_ITEM_COLUMNS);

  let mut items: Vec<OrderItem> = builder.build_query_as().fetch_all(&mut **tx).await?;
  // RETURNING row order is unspecified for multi-row inserts.
  items.sort_by_key(|item| item.id);

  Ok((order, items))
}

async fn items_for_order(pool: &SqlitePool, order_id: i64) -> Result<Vec<OrderItem>, sqlx::Error> {
  sqlx::query_as(&format!(
    "SELECT {} FROM order_items WHERE order_id = ? ORDER BY id ASC",
    ORDER_ITEM_COLUMNS
  ))
  .bind(order_id)
  .fetch_all(pool)
  .await
}

async fn attach_items(pool: &SqlitePool, row: OrderWithCustomer) -> Result<OrderView, sqlx::Error> {
  let items = items_for_order(pool, row.order.id).await?;
  Ok(OrderView {
    order: row.order,
    customer_name: row.customer_name,
    items,
  })
}

/// All orders, newest first (ties broken by id, also descending), each with
/// its customer's name and items.
#[instrument(name = "orders::list_orders", skip_all)]
pub async fn list_orders(pool: &SqlitePool) -> Result<Vec<OrderView>, sqlx::Error> {
  let rows: Vec<OrderWithCustomer> = sqlx::query_as(
    "SELECT o.id, o.user_id, o.total_price, o.status, o.created_at, u.name AS customer_name \
     FROM orders o LEFT JOIN users u ON u.id = o.user_id \
     ORDER BY o.created_at DESC, o.id DESC",
  )
  .fetch_all(pool)
  .await?;

  // try_join_all keeps input order.
  let views = try_join_all(rows.into_iter().map(|row| attach_items(pool, row))).await?;
  info!(count = views.len(), "Orders loaded.");
  Ok(views)
}

pub async fn find_order(pool: &SqlitePool, order_id: i64) -> Result<Option<OrderView>, sqlx::Error> {
  let row: Option<OrderWithCustomer> = sqlx::query_as(
    "SELECT o.id, o.user_id, o.total_price, o.status, o.created_at, u.name AS customer_name \
     FROM orders o LEFT JOIN users u ON u.id = o.user_id \
     WHERE o.id = ?",
  )
  .bind(order_id)
  .fetch_optional(pool)
  .await?;

  match row {
    Some(row) => Ok(Some(attach_items(pool, row).await?)),
    None => Ok(None),
  }
}
