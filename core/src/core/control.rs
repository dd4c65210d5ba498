// kedai_flow/src/core/control.rs

//! Signals for controlling flow execution and the outcome of a run.

/// Returned by every step handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
  /// Keep going: remaining handlers of this step, then the next step.
  Continue,
  /// Halt the flow. No further step handlers run; `finally` handlers still do.
  Stop,
}

/// Outcome of a flow run that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
  /// Every step ran (or was skipped) without a handler asking to stop.
  Completed,
  /// A handler returned [`StepControl::Stop`].
  Stopped,
}

/// How a run ended, as seen by `finally` handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowExit {
  Completed,
  Stopped,
  Failed,
}

impl FlowExit {
  pub fn is_success(self) -> bool {
    matches!(self, FlowExit::Completed)
  }
}
