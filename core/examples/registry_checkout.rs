// kedai_flow/examples/registry_checkout.rs
//
// Two flows in one registry, dispatched by context type, with an application
// error type that wraps FlowError.

use kedai_flow::{Flow, FlowContext, FlowError, FlowOutcome, FlowRegistry, StepControl};
use tracing::{error, info};

#[derive(Clone, Debug, Default)]
struct BasketContext {
  items: Vec<(String, u32)>,
  checked: bool,
}

#[derive(Clone, Debug, Default)]
struct ReceiptContext {
  order_id: u64,
  printed: bool,
}

#[derive(Debug, thiserror::Error)]
enum ShopError {
  #[error("basket is empty")]
  EmptyBasket,
  #[error(transparent)]
  Flow(#[from] FlowError),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  let registry = FlowRegistry::<ShopError>::new();

  let mut basket_flow = Flow::<BasketContext, ShopError>::new(&[("check_basket", false, None)]);
  basket_flow.on("check_basket", |ctx: FlowContext<BasketContext>| {
    Box::pin(async move {
      let mut data = ctx.write();
      if data.items.is_empty() {
        return Err(ShopError::EmptyBasket);
      }
      data.checked = true;
      Ok(StepControl::Continue)
    })
  });
  registry.register(basket_flow);

  let mut receipt_flow = Flow::<ReceiptContext, ShopError>::new(&[("print_receipt", false, None)]);
  receipt_flow.on("print_receipt", |ctx: FlowContext<ReceiptContext>| {
    Box::pin(async move {
      let mut data = ctx.write();
      info!(order_id = data.order_id, "Printing receipt.");
      data.printed = true;
      Ok::<_, ShopError>(StepControl::Continue)
    })
  });
  registry.register(receipt_flow);

  let basket = FlowContext::new(BasketContext {
    items: vec![("Kopi Susu".to_string(), 2)],
    ..Default::default()
  });
  assert_eq!(registry.run(basket.clone()).await?, FlowOutcome::Completed);
  assert!(basket.read().checked);

  let receipt = FlowContext::new(ReceiptContext {
    order_id: 42,
    ..Default::default()
  });
  registry.run(receipt.clone()).await?;
  assert!(receipt.read().printed);

  match registry.run(FlowContext::new(BasketContext::default())).await {
    Err(ShopError::EmptyBasket) => info!("Empty basket rejected as expected."),
    other => error!(?other, "Unexpected result for an empty basket."),
  }

  #[derive(Default)]
  struct Unregistered;
  match registry.run(FlowContext::new(Unregistered)).await {
    Err(ShopError::Flow(FlowError::NotRegistered { .. })) => info!("Unregistered context rejected."),
    other => error!(?other, "Unexpected result for an unregistered context."),
  }

  Ok(())
}
