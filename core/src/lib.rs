// kedai_flow/src/lib.rs

//! kedai_flow: the asynchronous step engine behind Kedai's checkout.
//!
//! A [`Flow`] is an ordered list of named steps. Each step can carry
//! `before`, `on` and `after` handlers that operate on a shared
//! [`FlowContext`], and a flow can register `finally` handlers that run on
//! every exit path (completed, stopped or failed). Handlers decide whether the
//! flow continues or stops via [`StepControl`].
//!
//! Flows are registered in a [`FlowRegistry`], keyed by the type of data they
//! operate on, so an HTTP handler only needs to build the context and call
//! `registry.run(ctx)`.

pub mod core;
pub mod error;
pub mod flow;
pub mod registry;

pub use crate::core::context_data::FlowContext;
pub use crate::core::control::{FlowExit, FlowOutcome, StepControl};
pub use crate::core::handler::{FinallyHandler, Handler};
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::flow::Flow;

pub use crate::error::FlowError;

pub use crate::registry::FlowRegistry;

/*
    Typical wiring:
    1. Define the data a workflow needs, e.g. `CheckoutCtxData`.
    2. Build `Flow::<CheckoutCtxData, AppError>::new(&[("validate", false, None), ...])`.
    3. Attach handlers with `.on("validate", |ctx| Box::pin(async move { ... }))`.
       Lock guards from `ctx.read()` / `ctx.write()` must be dropped before any `.await`.
    4. Optionally add `.finally(|ctx, exit| async move { ... })` for cleanup that must always run.
    5. `registry.register(flow)` once at startup, then `registry.run(FlowContext::new(data)).await`.
*/
