// kedai_flow/src/flow/hooks.rs

//! Registration of `before`, `on`, `after` and `finally` handlers.

use crate::core::context_data::FlowContext;
use crate::core::control::{FlowExit, StepControl};
use crate::core::handler::{FinallyHandler, Handler};
use crate::error::FlowError;
use crate::flow::definition::Flow;
use std::collections::HashMap;
use std::future::Future;

impl<TData, Err> Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Registers a handler that runs before the step's `on` handlers.
  ///
  /// The handler may fail with any error convertible into the flow's `Err`.
  pub fn before<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(FlowContext<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<StepControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    let handler = box_handler(handler_fn);
    push_handler(&mut self.before, step_name, handler);
  }

  /// Registers the main handler of a step.
  pub fn on<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(FlowContext<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<StepControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    let handler = box_handler(handler_fn);
    push_handler(&mut self.on, step_name, handler);
  }

  pub fn after<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(FlowContext<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<StepControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    let handler = box_handler(handler_fn);
    push_handler(&mut self.after, step_name, handler);
  }

  /// Registers a cleanup handler that runs once per `run`, after the step
  /// handlers, whether the flow completed, stopped or failed.
  ///
  /// Cleanup handlers cannot fail the run; the original outcome is returned.
  pub fn finally<F>(&mut self, handler_fn: impl Fn(FlowContext<TData>, FlowExit) -> F + Send + Sync + 'static)
  where
    F: Future<Output = ()> + Send + 'static,
  {
    let handler: FinallyHandler<TData> = Box::new(move |ctx, exit| Box::pin(handler_fn(ctx, exit)));
    self.finally.push(handler);
  }
}

fn box_handler<TData, Err, F, HandlerErr>(
  handler_fn: impl Fn(FlowContext<TData>) -> F + Send + Sync + 'static,
) -> Handler<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: 'static,
  F: Future<Output = Result<StepControl, HandlerErr>> + Send + 'static,
  HandlerErr: Into<Err> + Send + Sync + 'static,
{
  Box::new(move |ctx| {
    let fut = handler_fn(ctx);
    Box::pin(async move { fut.await.map_err(Into::into) })
  })
}

fn push_handler<TData, Err>(
  slot: &mut HashMap<String, Vec<Handler<TData, Err>>>,
  step_name: &str,
  handler: Handler<TData, Err>,
) where
  TData: 'static + Send + Sync,
{
  slot.entry(step_name.to_string()).or_default().push(handler);
}
