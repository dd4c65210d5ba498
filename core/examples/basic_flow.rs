// kedai_flow/examples/basic_flow.rs
//
// A three-step tally flow with a cleanup hook that always runs.

use kedai_flow::{Flow, FlowContext, FlowError, FlowExit, FlowOutcome, StepControl};
use tracing::info;

#[derive(Clone, Debug, Default)]
struct TallyContext {
  log: Vec<String>,
  counter: i32,
  closed: bool,
}

#[tokio::main]
async fn main() -> Result<(), FlowError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  let mut flow = Flow::<TallyContext, FlowError>::new(&[
    ("open_tab", false, None),
    ("double", false, None),
    ("settle", false, None),
  ]);

  flow.on("open_tab", |ctx: FlowContext<TallyContext>| {
    Box::pin(async move {
      let mut data = ctx.write();
      data.counter += 1;
      let msg = format!("open_tab: counter = {}", data.counter);
      data.log.push(msg);
      Ok::<_, FlowError>(StepControl::Continue)
    })
  });

  flow.on("double", |ctx: FlowContext<TallyContext>| {
    Box::pin(async move {
      let mut data = ctx.write();
      data.counter *= 2;
      let msg = format!("double: counter = {}", data.counter);
      data.log.push(msg);
      Ok::<_, FlowError>(StepControl::Continue)
    })
  });

  flow.on("settle", |ctx: FlowContext<TallyContext>| {
    Box::pin(async move {
      let mut data = ctx.write();
      data.counter -= 1;
      let msg = format!("settle: counter = {}", data.counter);
      data.log.push(msg);
      Ok::<_, FlowError>(StepControl::Continue)
    })
  });

  flow.finally(|ctx: FlowContext<TallyContext>, exit: FlowExit| async move {
    ctx.write().closed = true;
    info!(?exit, "Tab closed.");
  });

  let ctx = FlowContext::new(TallyContext {
    counter: 5,
    ..Default::default()
  });
  let outcome = flow.run(ctx.clone()).await?;
  assert_eq!(outcome, FlowOutcome::Completed);

  let data = ctx.read();
  for entry in &data.log {
    info!("- {}", entry);
  }
  // (5 + 1) * 2 - 1
  assert_eq!(data.counter, 11);
  assert!(data.closed);
  Ok(())
}
