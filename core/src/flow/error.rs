// bazaar/src/flow/error.rs

use thiserror::Error;

/// Failures raised by the flow engine itself rather than by a handler.
#[derive(Error, Debug)]
pub enum FlowError {
  #[error("Step '{step_name}' is required but has no handlers")]
  HandlerMissing { step_name: String },

  #[error("Handler failed: {source}")]
  HandlerError {
    #[source]
    source: anyhow::Error,
  },
}

impl From<anyhow::Error> for FlowError {
  fn from(err: anyhow::Error) -> Self {
    FlowError::HandlerError { source: err }
  }
}
