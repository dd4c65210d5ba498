// kedai_server/src/flows/checkout_flow.rs

//! Order submission: validate, resolve the buyer, price, then persist header
//! and items in one transaction.

use crate::db::{orders, users};
use crate::errors::{AppError, Result};
use crate::flows::contexts::CheckoutCtxData;
use crate::models::OrderView;
use crate::services::pricing;
use crate::web::dto::CreateOrderRequest;
use kedai_flow::{Flow, FlowContext, FlowExit, FlowRegistry, StepControl};
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

pub const STEP_VALIDATE: &str = "validate_order_request";
pub const STEP_RESOLVE_CUSTOMER: &str = "resolve_customer";
pub const STEP_PRICE: &str = "price_order";
pub const STEP_PERSIST: &str = "persist_order";

pub fn build_checkout_flow() -> Flow<CheckoutCtxData, AppError> {
  let mut flow = Flow::<CheckoutCtxData, AppError>::new(&[
    (STEP_VALIDATE, false, None),
    (STEP_RESOLVE_CUSTOMER, false, None),
    (STEP_PRICE, false, None),
    (STEP_PERSIST, false, None),
  ]);

  flow.on(STEP_VALIDATE, |ctx| Box::pin(validate_step(ctx)));
  flow.on(STEP_RESOLVE_CUSTOMER, |ctx| Box::pin(resolve_customer_step(ctx)));
  flow.on(STEP_PRICE, |ctx| Box::pin(price_step(ctx)));
  flow.on(STEP_PERSIST, |ctx| Box::pin(persist_step(ctx)));

  flow.finally(|ctx: FlowContext<CheckoutCtxData>, exit| async move {
    let order_id = ctx.read().order.as_ref().map(|view| view.order.id);
    match exit {
      FlowExit::Completed => info!(?order_id, "Checkout finished."),
      FlowExit::Stopped => warn!("Checkout stopped before an order was written."),
      FlowExit::Failed => warn!("Checkout failed; no order was written."),
    }
  });

  flow
}

pub fn register_checkout_flow(registry: &FlowRegistry<AppError>) {
  registry.register(build_checkout_flow());
}

/// Rejects requests that cannot become an order.
pub fn validate_order_request(request: &CreateOrderRequest) -> Result<()> {
  if request.items.is_empty() {
    return Err(AppError::EmptyCart);
  }

  let has_name = request
    .customer_name
    .as_deref()
    .map(|name| !name.trim().is_empty())
    .unwrap_or(false);
  if request.user_id.is_none() && !has_name {
    return Err(AppError::MissingIdentity);
  }

  for (index, line) in request.items.iter().enumerate() {
    if line.quantity < 1 {
      return Err(AppError::Validation(format!(
        "Item {} (product {}) must have a quantity of at least 1.",
        index, line.product_id
      )));
    }
    if line.price < Decimal::ZERO {
      return Err(AppError::Validation(format!(
        "Item {} (product {}) has a negative price.",
        index, line.product_id
      )));
    }
    if line.name.trim().is_empty() {
      return Err(AppError::Validation(format!(
        "Item {} (product {}) is missing its name.",
        index, line.product_id
      )));
    }
  }
  Ok(())
}

#[instrument(name = "checkout::validate", skip_all)]
async fn validate_step(ctx: FlowContext<CheckoutCtxData>) -> Result<StepControl> {
  validate_order_request(&ctx.read().request)?;
  Ok(StepControl::Continue)
}

#[instrument(name = "checkout::resolve_customer", skip_all)]
async fn resolve_customer_step(ctx: FlowContext<CheckoutCtxData>) -> Result<StepControl> {
  let (pool, user_id, name, email) = {
    let guard = ctx.read();
    (
      guard.app_state.db_pool.clone(),
      guard.request.user_id,
      guard.request.customer_name.clone(),
      guard.request.customer_email.clone(),
    )
  };

  let (customer, created) = match (user_id, name) {
    (Some(id), _) => {
      let user = users::find_user(&pool, id)
        .await?
        .ok_or_else(|| AppError::Validation(format!("User {} does not exist.", id)))?;
      (user, false)
    }
    (None, Some(name)) => {
      let resolution = users::resolve_or_create(&pool, &name, email.as_deref()).await?;
      (resolution.user, resolution.created)
    }
    (None, None) => return Err(AppError::MissingIdentity),
  };

  info!(user_id = customer.id, created, "Customer resolved.");
  let mut guard = ctx.write();
  guard.customer = Some(customer);
  guard.customer_created = created;
  Ok(StepControl::Continue)
}

#[instrument(name = "checkout::price", skip_all)]
async fn price_step(ctx: FlowContext<CheckoutCtxData>) -> Result<StepControl> {
  let mut guard = ctx.write();
  let surcharge_percent = guard.app_state.config.order_surcharge_percent;
  let priced = pricing::price_order(&guard.request.items, guard.request.total_price, surcharge_percent)?;
  info!(subtotal = %priced.subtotal, total = %priced.total, "Order priced.");
  guard.pricing = Some(priced);
  Ok(StepControl::Continue)
}

#[instrument(name = "checkout::persist", skip_all)]
async fn persist_step(ctx: FlowContext<CheckoutCtxData>) -> Result<StepControl> {
  let (pool, customer, new_order) = {
    let guard = ctx.read();
    let customer = guard
      .customer
      .clone()
      .ok_or_else(|| AppError::Internal("persist step reached without a customer".to_string()))?;
    let priced = guard
      .pricing
      .ok_or_else(|| AppError::Internal("persist step reached without pricing".to_string()))?;
    let new_order = orders::NewOrder {
      user_id: customer.id,
      total_price: priced.total,
      items: guard
        .request
        .items
        .iter()
        .map(|line| orders::NewOrderItem {
          product_id: line.product_id,
          quantity: line.quantity,
          price: line.price,
          product_name: line.name.trim().to_string(),
          product_image: line.image.clone(),
        })
        .collect(),
    };
    (guard.app_state.db_pool.clone(), customer, new_order)
  };

  let (order, items) = orders::insert_order_with_items(&pool, &new_order).await?;
  ctx.write().order = Some(OrderView {
    order,
    customer_name: Some(customer.name),
    items,
  });
  Ok(StepControl::Continue)
}
