// kedai_flow/src/core/handler.rs

//! Handler type aliases. Handlers receive a clone of the flow's shared
//! context and resolve to a control signal (step handlers) or nothing
//! (`finally` handlers).

use crate::core::context_data::FlowContext;
use crate::core::control::{FlowExit, StepControl};
use std::future::Future;
use std::pin::Pin;

/// A boxed step handler for `Flow<TData, Err>`.
///
/// Handlers must drop any `read()`/`write()` guard before awaiting.
pub type Handler<TData, Err> = Box<
  dyn Fn(FlowContext<TData>) -> Pin<Box<dyn Future<Output = Result<StepControl, Err>> + Send>>
    + Send
    + Sync,
>;

/// A boxed cleanup handler. Runs after the last step handler on every exit path.
pub type FinallyHandler<TData> =
  Box<dyn Fn(FlowContext<TData>, FlowExit) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;
