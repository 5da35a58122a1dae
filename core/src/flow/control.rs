// bazaar/src/flow/control.rs

/// Returned by every handler to steer the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
  /// Proceed to the next handler or step.
  Continue,
  /// Halt the flow. Remaining handlers and steps do not run.
  Stop,
}

/// How a flow run ended when no handler failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
  Completed,
  Stopped,
}

impl FlowOutcome {
  pub fn is_completed(self) -> bool {
    matches!(self, FlowOutcome::Completed)
  }
}
