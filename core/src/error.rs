// bazaar/src/error.rs

use thiserror::Error;

/// Errors reported by the action layer.
///
/// Every variant carries a human-readable message. Pages surface them as
/// dialogs or toasts, the HTTP surface maps them to status codes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
  #[error("Validation failed: {0}")]
  Validation(String),

  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Data store unavailable: {0}")]
  StoreUnavailable(String),

  #[error("Internal error: {0}")]
  Internal(String),
}

pub type ActionResult<T> = Result<T, ActionError>;

impl ActionError {
  pub fn validation(msg: impl Into<String>) -> Self {
    ActionError::Validation(msg.into())
  }

  pub fn not_found(msg: impl Into<String>) -> Self {
    ActionError::NotFound(msg.into())
  }

  pub fn forbidden(msg: impl Into<String>) -> Self {
    ActionError::Forbidden(msg.into())
  }
}

/// Errors raised by a `DataStore` backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
  #[error("store unavailable: {0}")]
  Unavailable(String),

  /// A uniqueness rule was violated (for instance a duplicate NNI).
  #[error("conflict: {0}")]
  Conflict(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for ActionError {
  fn from(err: StoreError) -> Self {
    match err {
      StoreError::Unavailable(msg) => ActionError::StoreUnavailable(msg),
      StoreError::Conflict(msg) => ActionError::Validation(msg),
    }
  }
}
