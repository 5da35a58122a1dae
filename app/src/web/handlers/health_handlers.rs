// bazaar_admin/src/web/handlers/health_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{error, instrument};

use crate::errors::AppError;
use crate::state::AppState;

#[instrument(name = "handler::health", skip(app_state))]
pub async fn health_check_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let database = match &app_state.db_pool {
    Some(pool) => {
      sqlx::query("SELECT 1").execute(pool).await.map_err(|e| {
        error!("Health check could not reach the database: {}", e);
        AppError::StoreUnavailable(e.to_string())
      })?;
      "ok"
    }
    None => "in-memory",
  };
  Ok(HttpResponse::Ok().json(json!({ "status": "ok", "database": database })))
}
