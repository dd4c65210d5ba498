// kedai_flow/src/flow/execution.rs

//! `Flow::run`: executes steps in order, then the `finally` handlers.

use crate::core::context_data::FlowContext;
use crate::core::control::{FlowExit, FlowOutcome, StepControl};
use crate::core::handler::Handler;
use crate::core::step::StepDef;
use crate::error::FlowError;
use crate::flow::definition::Flow;
use tracing::{event, instrument, span, Instrument, Level};

#[derive(Debug, Clone, Copy)]
enum Phase {
  Before,
  On,
  After,
}

impl Phase {
  fn as_str(self) -> &'static str {
    match self {
      Phase::Before => "before",
      Phase::On => "on",
      Phase::After => "after",
    }
  }
}

impl<TData, Err> Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Runs the flow against `ctx`.
  ///
  /// Steps run in definition order; within a step, `before` handlers run
  /// first, then `on`, then `after`. The first handler error aborts the run and
  /// is returned as-is. `finally` handlers always run before this returns.
  #[instrument(
    name = "Flow::run",
    skip_all,
    fields(
      flow_context_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
    ),
    err(Display)
  )]
  pub async fn run(&self, ctx: FlowContext<TData>) -> Result<FlowOutcome, Err> {
    let result = self.run_steps(ctx.clone()).await;

    if !self.finally.is_empty() {
      let exit = match &result {
        Ok(FlowOutcome::Completed) => FlowExit::Completed,
        Ok(FlowOutcome::Stopped) => FlowExit::Stopped,
        Err(_) => FlowExit::Failed,
      };
      event!(Level::TRACE, ?exit, "Executing 'finally' handlers.");
      for handler_fn in &self.finally {
        handler_fn(ctx.clone(), exit).await;
      }
    }

    result
  }

  async fn run_steps(&self, ctx: FlowContext<TData>) -> Result<FlowOutcome, Err> {
    event!(Level::DEBUG, "Flow execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_span = span!(
        Level::INFO,
        "flow_step",
        step_name = step_def.name.as_str(),
        step_index = step_idx,
        optional = step_def.optional
      );
      let control = self.run_step(step_def, ctx.clone()).instrument(step_span).await?;
      if control == StepControl::Stop {
        return Ok(FlowOutcome::Stopped);
      }
    }

    event!(Level::DEBUG, "Flow execution completed.");
    Ok(FlowOutcome::Completed)
  }

  async fn run_step(&self, step_def: &StepDef<TData>, ctx: FlowContext<TData>) -> Result<StepControl, Err> {
    if let Some(skip_cond_fn) = &step_def.skip_if {
      if skip_cond_fn(ctx.clone()) {
        event!(Level::INFO, "Step skipped due to 'skip_if' condition.");
        return Ok(StepControl::Continue);
      }
    }

    let step_name = step_def.name.as_str();
    let phases: [(Phase, Option<&Vec<Handler<TData, Err>>>); 3] = [
      (Phase::Before, self.before.get(step_name)),
      (Phase::On, self.on.get(step_name)),
      (Phase::After, self.after.get(step_name)),
    ];

    let has_handlers = phases
      .iter()
      .any(|&(_, handlers)| handlers.map_or(false, |v| !v.is_empty()));
    if !has_handlers {
      if step_def.optional {
        event!(Level::DEBUG, "Optional step has no handlers, skipping.");
        return Ok(StepControl::Continue);
      }
      event!(Level::ERROR, "Non-optional step has no handlers.");
      return Err(Err::from(FlowError::HandlerMissing {
        step_name: step_def.name.clone(),
      }));
    }

    for (phase, handlers) in phases {
      let Some(handlers) = handlers else {
        continue;
      };
      for (handler_idx, handler_fn) in handlers.iter().enumerate() {
        match handler_fn(ctx.clone()).await {
          Ok(StepControl::Continue) => {}
          Ok(StepControl::Stop) => {
            event!(
              Level::INFO,
              phase = phase.as_str(),
              handler_index = handler_idx,
              "Flow stopped by a handler."
            );
            return Ok(StepControl::Stop);
          }
          Err(e) => {
            event!(
              Level::ERROR,
              phase = phase.as_str(),
              handler_index = handler_idx,
              error = %e,
              "Handler failed."
            );
            return Err(e);
          }
        }
      }
    }

    Ok(StepControl::Continue)
  }
}
