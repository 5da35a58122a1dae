// bazaar/src/flow/step.rs

use super::context::FlowContext;
use std::sync::Arc;

/// Predicate evaluated right before a step runs. Returning `true` skips it.
pub type SkipCondition<TData> = Arc<dyn Fn(FlowContext<TData>) -> bool + Send + Sync + 'static>;

pub struct StepDef<TData: Send + Sync + 'static> {
  pub name: String,
  /// An optional step with no handlers is passed over silently.
  pub optional: bool,
  pub skip_if: Option<SkipCondition<TData>>,
}

impl<TData: Send + Sync + 'static> Clone for StepDef<TData> {
  fn clone(&self) -> Self {
    StepDef {
      name: self.name.clone(),
      optional: self.optional,
      skip_if: self.skip_if.clone(),
    }
  }
}

impl<TData: Send + Sync + 'static> std::fmt::Debug for StepDef<TData> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StepDef")
      .field("name", &self.name)
      .field("optional", &self.optional)
      .field("has_skip_if", &self.skip_if.is_some())
      .finish()
  }
}
