// bazaar_admin/src/state.rs
use crate::config::AppConfig;
use bazaar::Actions;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  /// `None` when the action layer runs over an in-memory store.
  pub db_pool: Option<PgPool>,
  pub actions: Arc<Actions>,
  pub config: Arc<AppConfig>,
}
