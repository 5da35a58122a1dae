// bazaar_admin/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use bazaar::Actions;
use bazaar_admin::config::AppConfig;
use bazaar_admin::db::{self, PgStore};
use bazaar_admin::seed;
use bazaar_admin::state::AppState;
use bazaar_admin::web::configure_app_routes;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
  tracing::error!(error = %err, "{}", context);
  std::io::Error::other(format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting Bazaar admin server...");

  let app_config = Arc::new(AppConfig::from_env().map_err(|e| startup_error("Failed to load configuration", e))?);

  let db_pool = db::connect(&app_config)
    .await
    .map_err(|e| startup_error("Failed to connect to the database", e))?;
  tracing::info!("Successfully connected to the database.");

  if app_config.run_migrations {
    db::migrate(&db_pool)
      .await
      .map_err(|e| startup_error("Failed to run migrations", e))?;
    tracing::info!("Database migrations applied.");
  }

  let actions = Arc::new(Actions::new(Arc::new(PgStore::new(db_pool.clone()))));

  if app_config.seed_db {
    seed::seed_admin(&actions, &app_config)
      .await
      .map_err(|e| startup_error("Failed to seed database", format!("{:#}", e)))?;
  }

  let app_state = AppState {
    db_pool: Some(db_pool),
    actions,
    config: app_config.clone(),
  };

  let server_address = app_config.bind_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
