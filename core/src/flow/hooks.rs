// bazaar/src/flow/hooks.rs

//! Registration of `before`, `on` and `after` handlers.

use super::context::FlowContext;
use super::control::StepControl;
use super::definition::Flow;
use super::error::FlowError;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

/// A type-erased step handler.
///
/// Handlers take a clone of the flow's `FlowContext` and must release any lock
/// guard before awaiting.
pub type Handler<TData, Err> = Box<
  dyn Fn(FlowContext<TData>) -> Pin<Box<dyn Future<Output = Result<StepControl, Err>> + Send>>
    + Send
    + Sync,
>;

impl<TData, Err> Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub fn before_root<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(FlowContext<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<StepControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    register(&mut self.before, step_name, handler_fn);
  }

  pub fn on_root<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(FlowContext<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<StepControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    register(&mut self.on, step_name, handler_fn);
  }

  pub fn after_root<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(FlowContext<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<StepControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    register(&mut self.after, step_name, handler_fn);
  }
}

fn register<TData, Err, F, HandlerErr>(
  table: &mut HashMap<String, Vec<Handler<TData, Err>>>,
  step_name: &str,
  handler_fn: impl Fn(FlowContext<TData>) -> F + Send + Sync + 'static,
) where
  TData: 'static + Send + Sync,
  Err: 'static,
  F: Future<Output = Result<StepControl, HandlerErr>> + Send + 'static,
  HandlerErr: Into<Err> + Send + Sync + 'static,
{
  let handler: Handler<TData, Err> = Box::new(move |ctx| {
    let fut = handler_fn(ctx);
    Box::pin(async move { fut.await.map_err(Into::into) })
  });
  table.entry(step_name.to_string()).or_default().push(handler);
}
