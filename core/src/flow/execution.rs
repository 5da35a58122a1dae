// bazaar/src/flow/execution.rs

//! `Flow::run`.

use super::context::FlowContext;
use super::control::{FlowOutcome, StepControl};
use super::definition::Flow;
use super::error::FlowError;
use super::hooks::Handler;
use tracing::{event, info_span, Instrument, Level};

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
  /// Runs every step in order against `ctx`.
  ///
  /// Stops at the first handler that returns `StepControl::Stop` or an error.
  /// A non-optional step without handlers fails with `FlowError::HandlerMissing`.
  pub async fn run(&self, ctx: FlowContext<TData>) -> Result<FlowOutcome, Err> {
    event!(Level::DEBUG, flow = %self.name, num_steps = self.steps.len(), "Flow run starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();
      let step_span = info_span!("flow_step", flow = %self.name, step = step_name, step_index = step_idx);

      if let Some(skip_if) = &step_def.skip_if {
        if skip_if(ctx.clone()) {
          event!(parent: &step_span, Level::DEBUG, "Step skipped by condition.");
          continue;
        }
      }

      let before = non_empty(self.before.get(step_name));
      let on = non_empty(self.on.get(step_name));
      let after = non_empty(self.after.get(step_name));

      if before.is_none() && on.is_none() && after.is_none() {
        if step_def.optional {
          event!(parent: &step_span, Level::DEBUG, "Optional step has no handlers, passing over.");
          continue;
        }
        event!(parent: &step_span, Level::ERROR, "Required step has no handlers.");
        return Err(Err::from(FlowError::HandlerMissing {
          step_name: step_def.name.clone(),
        }));
      }

      for (phase, handlers) in [(Phase::Before, before), (Phase::On, on), (Phase::After, after)] {
        let Some(handlers) = handlers else { continue };
        let control = run_phase(phase, handlers, &ctx).instrument(step_span.clone()).await?;
        if control == StepControl::Stop {
          event!(Level::INFO, flow = %self.name, step = step_name, phase = phase.as_str(), "Flow stopped by handler.");
          return Ok(FlowOutcome::Stopped);
        }
      }
    }

    event!(Level::DEBUG, flow = %self.name, "Flow run completed.");
    Ok(FlowOutcome::Completed)
  }
}

fn non_empty<T>(handlers: Option<&Vec<T>>) -> Option<&[T]> {
  handlers.filter(|v| !v.is_empty()).map(Vec::as_slice)
}

async fn run_phase<TData, Err>(
  phase: Phase,
  handlers: &[Handler<TData, Err>],
  ctx: &FlowContext<TData>,
) -> Result<StepControl, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + Send + Sync + 'static,
{
  for (handler_idx, handler) in handlers.iter().enumerate() {
    event!(Level::TRACE, phase = phase.as_str(), handler_index = handler_idx, "Running handler.");
    match handler(ctx.clone()).await {
      Ok(StepControl::Continue) => {}
      Ok(StepControl::Stop) => return Ok(StepControl::Stop),
      Err(e) => {
        event!(Level::ERROR, phase = phase.as_str(), handler_index = handler_idx, error = %e, "Handler failed.");
        return Err(e);
      }
    }
  }
  Ok(StepControl::Continue)
}
