// kedai_server/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use kedai_flow::{FlowContext, FlowOutcome};
use tracing::{info, instrument, warn};

use crate::db::orders;
use crate::errors::AppError;
use crate::flows::contexts::CheckoutCtxData;
use crate::state::AppState;
use crate::web::dto::{ApiResponse, CreateOrderRequest};

#[instrument(
  name = "handler::create_order",
  skip(app_state, payload),
  fields(item_count = payload.items.len(), user_id = ?payload.user_id)
)]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
  let checkout_ctx = FlowContext::new(CheckoutCtxData::new(app_state.get_ref().clone(), payload.into_inner()));

  match app_state.flows.run(checkout_ctx.clone()).await? {
    FlowOutcome::Completed => {
      let order = checkout_ctx.read().order.clone().ok_or_else(|| {
        AppError::Internal("Checkout completed but no order was recorded.".to_string())
      })?;
      info!(order_id = order.order.id, total = %order.order.total_price, "Order created.");
      Ok(HttpResponse::Created().json(ApiResponse::with_message("Order created successfully.", order)))
    }
    FlowOutcome::Stopped => {
      warn!("Checkout flow stopped without creating an order.");
      Err(AppError::FlowHalted)
    }
  }
}

#[instrument(name = "handler::list_orders", skip(app_state))]
pub async fn list_orders_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let all_orders = orders::list_orders(&app_state.db_pool).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::ok(all_orders)))
}

#[instrument(name = "handler::get_order", skip(app_state, path), fields(order_id = %path.as_ref()))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  orders::find_order(&app_state.db_pool, order_id)
    .await?
    .map(|order| HttpResponse::Ok().json(ApiResponse::ok(order)))
    .ok_or_else(|| AppError::NotFound(format!("Order with ID {} not found.", order_id)))
}
