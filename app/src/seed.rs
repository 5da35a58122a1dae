// bazaar_admin/src/seed.rs

use anyhow::{bail, Context};
use bazaar::{Actions, DataStore, Role, UserDraft};
use tracing::{info, instrument};

use crate::config::AppConfig;

/// Creates the bootstrap administrator unless an account with the same NNI exists.
#[instrument(name = "seed::admin", skip(actions, config), fields(nni = %config.seed_admin_nni))]
pub async fn seed_admin(actions: &Actions, config: &AppConfig) -> anyhow::Result<()> {
  let Some(password) = config.seed_admin_password.clone() else {
    bail!("SEED_ADMIN_PASSWORD must be set when SEED_DB is enabled");
  };

  let existing = actions
    .store()
    .find_user_by_nni(&config.seed_admin_nni)
    .await
    .context("looking up the seed administrator")?;
  if existing.is_some() {
    info!("Seed administrator already present, skipping.");
    return Ok(());
  }

  let admin = actions
    .create_user(UserDraft {
      name: config.seed_admin_name.clone(),
      nni: config.seed_admin_nni.clone(),
      password,
      role: Role::Admin,
      photo: None,
    })
    .await
    .context("creating the seed administrator")?;
  info!(user_id = %admin.id, "Seed administrator created.");
  Ok(())
}
