// bazaar_admin/src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use bazaar::ActionError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Data Store Unavailable: {0}")]
  StoreUnavailable(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<ActionError> for AppError {
  fn from(err: ActionError) -> Self {
    match err {
      ActionError::Validation(m) => AppError::Validation(m),
      ActionError::NotFound(m) => AppError::NotFound(m),
      ActionError::Forbidden(m) => AppError::Forbidden(m),
      ActionError::StoreUnavailable(m) => AppError::StoreUnavailable(m),
      ActionError::Internal(m) => AppError::Internal(m),
    }
  }
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(other) => match other.downcast::<ActionError>() {
        Ok(action_err) => action_err.into(),
        Err(other) => AppError::Internal(other.to_string()),
      },
    }
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::Auth(m) => HttpResponse::Unauthorized().json(json!({"error": m})),
      AppError::Forbidden(m) => HttpResponse::Forbidden().json(json!({"error": m})),
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({"error": m})),
      AppError::StoreUnavailable(m) => {
        HttpResponse::ServiceUnavailable().json(json!({"error": "Data store unavailable", "detail": m}))
      }
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Sqlx(_) => HttpResponse::InternalServerError().json(json!({"error": "Database operation failed"})),
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
