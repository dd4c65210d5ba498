// tests/context_management_tests.rs
mod common;

use common::*;
use kedai_flow::{Flow, FlowContext, StepControl};
use serial_test::serial;

#[tokio::test]
#[serial]
async fn test_context_is_shared_between_steps() {
  setup_tracing();
  let mut flow = Flow::<TestContext, TestError>::new(&[("price", false, None), ("surcharge", false, None)]);

  flow.on("price", |ctx: FlowContext<TestContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter = 10;
      guard.message = "priced".to_string();
      Ok::<_, TestError>(StepControl::Continue)
    })
  });

  flow.on("surcharge", |ctx: FlowContext<TestContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      assert_eq!(guard.counter, 10);
      guard.counter += 5;
      guard.message.push_str("+surcharged");
      Ok::<_, TestError>(StepControl::Continue)
    })
  });

  let ctx = FlowContext::new(TestContext::default());
  flow.run(ctx.clone()).await.unwrap();

  let final_guard = ctx.read();
  assert_eq!(final_guard.counter, 15);
  assert_eq!(final_guard.message, "priced+surcharged");
}

#[test]
fn test_clones_point_at_the_same_data() {
  let original = FlowContext::new(TestContext {
    counter: 1,
    ..Default::default()
  });
  let shared = original.clone();

  shared.write().counter = 2;
  assert_eq!(original.read().counter, 2);

  drop(shared);
  original.write().message.push_str("still here");
  assert_eq!(original.read().message, "still here");
}

#[tokio::test]
#[serial]
async fn test_concurrent_writers_do_not_lose_updates() {
  let ctx = FlowContext::new(TestContext::default());
  let tasks: Vec<_> = (0..16)
    .map(|_| {
      let ctx = ctx.clone();
      tokio::spawn(async move {
        for _ in 0..50 {
          ctx.write().counter += 1;
          tokio::task::yield_now().await;
        }
      })
    })
    .collect();
  for task in tasks {
    task.await.unwrap();
  }
  assert_eq!(ctx.read().counter, 800);
}
