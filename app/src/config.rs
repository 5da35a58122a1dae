// bazaar_admin/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub database_max_connections: u32,
  pub run_migrations: bool,

  /// When set, the administrator account below is created on boot if its NNI is free.
  pub seed_db: bool,
  pub seed_admin_name: String,
  pub seed_admin_nni: String,
  pub seed_admin_password: Option<String>,
}

impl std::fmt::Debug for AppConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AppConfig")
      .field("server_host", &self.server_host)
      .field("server_port", &self.server_port)
      .field("database_url", &"[REDACTED]")
      .field("database_max_connections", &self.database_max_connections)
      .field("run_migrations", &self.run_migrations)
      .field("seed_db", &self.seed_db)
      .field("seed_admin_nni", &self.seed_admin_nni)
      .finish_non_exhaustive()
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|key| env::var(key).ok())
  }

  /// Builds the config from any key lookup, which keeps parsing testable without touching the process env.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_env = |var_name: &str| {
      lookup(var_name).ok_or_else(|| AppError::Config(format!("Missing environment variable '{}'", var_name)))
    };
    let or_default = |var_name: &str, default: &str| get_env(var_name).unwrap_or_else(|_| default.to_string());

    let server_host = or_default("SERVER_HOST", "127.0.0.1");
    let server_port = parse_value::<u16>("SERVER_PORT", &or_default("SERVER_PORT", "8080"))?;
    let database_url = get_env("DATABASE_URL")?;
    let database_max_connections =
      parse_value::<u32>("DATABASE_MAX_CONNECTIONS", &or_default("DATABASE_MAX_CONNECTIONS", "5"))?;
    let run_migrations = parse_value::<bool>("RUN_MIGRATIONS", &or_default("RUN_MIGRATIONS", "true"))?;

    let seed_db = parse_value::<bool>("SEED_DB", &or_default("SEED_DB", "false"))?;
    let seed_admin_name = or_default("SEED_ADMIN_NAME", "Administrator");
    let seed_admin_nni = or_default("SEED_ADMIN_NNI", "00000000");
    let seed_admin_password = get_env("SEED_ADMIN_PASSWORD").ok();
    if seed_db && seed_admin_password.is_none() {
      return Err(AppError::Config(
        "SEED_DB is enabled but SEED_ADMIN_PASSWORD is not set".to_string(),
      ));
    }

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      database_max_connections,
      run_migrations,
      seed_db,
      seed_admin_name,
      seed_admin_nni,
      seed_admin_password,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn parse_value<T>(var_name: &str, raw: &str) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  raw
    .parse::<T>()
    .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", var_name, raw, e)))
}
