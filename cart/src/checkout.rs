// kedai_cart/src/checkout.rs

//! Client checkout: turn the cart into an order.
//!
//! Steps, in order:
//! 1. `guard_submission`: one checkout at a time, cart not empty, buyer named.
//! 2. `resolve_customer`: `POST /users`; skipped when the user id is known.
//! 3. `submit_order`: `POST /orders` with the cart lines and their total.
//! 4. `clear_cart`: empties the cart once the order exists.
//!
//! The cart is left untouched when any step fails, and a cleanup hook always
//! releases the submission guard so the customer can retry.

use crate::client::StorefrontClient;
use crate::error::CheckoutError;
use crate::model::{CartSnapshot, CreateOrderPayload, Order, User};
use crate::store::CartStore;
use kedai_flow::{Flow, FlowContext, FlowExit, FlowOutcome, SkipCondition, StepControl};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Who is buying. Either a known `user_id` or a name to resolve.
#[derive(Debug, Clone, Default)]
pub struct CustomerDetails {
  pub user_id: Option<i64>,
  pub name: String,
  pub email: Option<String>,
}

impl CustomerDetails {
  pub fn named(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      ..Self::default()
    }
  }

  pub fn with_email(mut self, email: impl Into<String>) -> Self {
    self.email = Some(email.into());
    self
  }

  pub fn existing(user_id: i64) -> Self {
    Self {
      user_id: Some(user_id),
      ..Self::default()
    }
  }
}

/// Data the checkout flow runs on.
pub struct CheckoutState {
  store: Arc<CartStore>,
  client: StorefrontClient,
  submitting: Arc<AtomicBool>,
  /// Whether this run took the submission guard and must release it.
  holds_guard: bool,
  pub customer: CustomerDetails,
  pub snapshot: Option<CartSnapshot>,
  pub user: Option<User>,
  pub order: Option<Order>,
}

pub struct CheckoutSession {
  store: Arc<CartStore>,
  client: StorefrontClient,
  submitting: Arc<AtomicBool>,
  flow: Flow<CheckoutState, CheckoutError>,
}

impl CheckoutSession {
  pub fn new(store: Arc<CartStore>, client: StorefrontClient) -> Self {
    Self {
      store,
      client,
      submitting: Arc::new(AtomicBool::new(false)),
      flow: build_checkout_flow(),
    }
  }

  /// True while a checkout is in flight; front ends disable their submit button.
  pub fn is_submitting(&self) -> bool {
    self.submitting.load(Ordering::SeqCst)
  }

  #[instrument(name = "CheckoutSession::checkout", skip_all, fields(user_id = ?customer.user_id))]
  pub async fn checkout(&self, customer: CustomerDetails) -> Result<Order, CheckoutError> {
    let ctx = FlowContext::new(CheckoutState {
      store: self.store.clone(),
      client: self.client.clone(),
      submitting: self.submitting.clone(),
      holds_guard: false,
      customer,
      snapshot: None,
      user: None,
      order: None,
    });

    let outcome = self.flow.run(ctx.clone()).await?;
    let order = ctx.write().order.take();
    match (outcome, order) {
      (FlowOutcome::Completed, Some(order)) => Ok(order),
      _ => Err(CheckoutError::Halted),
    }
  }
}

fn build_checkout_flow() -> Flow<CheckoutState, CheckoutError> {
  let user_known: SkipCondition<CheckoutState> = Arc::new(|ctx: FlowContext<CheckoutState>| {
    let known = ctx.read().customer.user_id.is_some();
    known
  });

  let mut flow = Flow::<CheckoutState, CheckoutError>::new(&[
    ("guard_submission", false, None),
    ("resolve_customer", false, Some(user_known)),
    ("submit_order", false, None),
    ("clear_cart", false, None),
  ]);

  flow.on("guard_submission", |ctx| Box::pin(guard_submission(ctx)));
  flow.on("resolve_customer", |ctx| Box::pin(resolve_customer(ctx)));
  flow.on("submit_order", |ctx| Box::pin(submit_order(ctx)));
  flow.on("clear_cart", |ctx| Box::pin(clear_cart(ctx)));

  flow.finally(|ctx: FlowContext<CheckoutState>, exit| async move {
    let mut state = ctx.write();
    if state.holds_guard {
      state.submitting.store(false, Ordering::SeqCst);
      state.holds_guard = false;
    }
    if exit != FlowExit::Completed {
      warn!(?exit, "Checkout did not complete; cart left as it was.");
    }
  });

  flow
}

async fn guard_submission(ctx: FlowContext<CheckoutState>) -> Result<StepControl, CheckoutError> {
  let mut state = ctx.write();
  if state
    .submitting
    .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
    .is_err()
  {
    return Err(CheckoutError::AlreadySubmitting);
  }
  state.holds_guard = true;

  let snapshot = state.store.snapshot();
  if snapshot.is_empty() {
    return Err(CheckoutError::EmptyCart);
  }
  if state.customer.user_id.is_none() && state.customer.name.trim().is_empty() {
    return Err(CheckoutError::MissingIdentity);
  }
  state.snapshot = Some(snapshot);
  Ok(StepControl::Continue)
}

async fn resolve_customer(ctx: FlowContext<CheckoutState>) -> Result<StepControl, CheckoutError> {
  let (client, name, email) = {
    let state = ctx.read();
    (
      state.client.clone(),
      state.customer.name.trim().to_string(),
      state.customer.email.clone(),
    )
  };
  let user = client.resolve_user(&name, email.as_deref()).await?;
  info!(user_id = user.id, "Customer resolved.");
  ctx.write().user = Some(user);
  Ok(StepControl::Continue)
}

async fn submit_order(ctx: FlowContext<CheckoutState>) -> Result<StepControl, CheckoutError> {
  let (client, payload) = {
    let state = ctx.read();
    let snapshot = state.snapshot.as_ref().ok_or(CheckoutError::EmptyCart)?;
    let mut payload = CreateOrderPayload::from_snapshot(snapshot);
    payload.user_id = state.user.as_ref().map(|u| u.id).or(state.customer.user_id);
    if payload.user_id.is_none() {
      payload.customer_name = Some(state.customer.name.trim().to_string());
      payload.customer_email = state.customer.email.clone();
    }
    (state.client.clone(), payload)
  };

  let order = client.submit_order(&payload).await?;
  info!(order_id = order.id, total = %order.total_price, "Order placed.");
  ctx.write().order = Some(order);
  Ok(StepControl::Continue)
}

async fn clear_cart(ctx: FlowContext<CheckoutState>) -> Result<StepControl, CheckoutError> {
  let store = ctx.read().store.clone();
  store.clear();
  Ok(StepControl::Continue)
}
