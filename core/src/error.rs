// kedai_flow/src/error.rs

//! Faults raised by the engine itself, as opposed to a step's own failures.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
  /// A required step reached execution with no `on` handler attached.
  #[error("step '{step_name}' is required but has no handler")]
  HandlerMissing { step_name: String },

  /// The registry found a runner for the context's type id, but the runner
  /// could not downcast it. Indicates a registration bug.
  #[error("registered runner rejected its context; expected {expected_type}")]
  TypeMismatch { expected_type: String },

  #[error("no flow registered for {context_type}")]
  NotRegistered { context_type: String },

  /// A handler failed with an error that is not the flow's own type.
  #[error("step handler failed: {source}")]
  HandlerError {
    #[source]
    source: anyhow::Error,
  },
}

impl From<anyhow::Error> for FlowError {
  fn from(source: anyhow::Error) -> Self {
    FlowError::HandlerError { source }
  }
}
