// kedai_server/src/flows/contexts.rs

//! Data structs the application flows run on. Handlers receive them wrapped
//! in `kedai_flow::FlowContext`.

use crate::models::{OrderView, User};
use crate::services::pricing::OrderPricing;
use crate::state::AppState;
use crate::web::dto::CreateOrderRequest;

/// State of one `POST /api/orders` request as it moves through checkout.
#[derive(Clone)]
pub struct CheckoutCtxData {
  pub app_state: AppState,
  pub request: CreateOrderRequest,
  pub customer: Option<User>,
  pub customer_created: bool,
  pub pricing: Option<OrderPricing>,
  pub order: Option<OrderView>,
}

impl CheckoutCtxData {
  pub fn new(app_state: AppState, request: CreateOrderRequest) -> Self {
    Self {
      app_state,
      request,
      customer: None,
      customer_created: false,
      pricing: None,
      order: None,
    }
  }
}
