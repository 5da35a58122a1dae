// bazaar/src/passwords.rs

//! Argon2 hashing for account passwords. Plain-text passwords never reach a store.

use crate::error::{ActionError, ActionResult};
use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use tracing::{debug, error, instrument};

#[instrument(name = "passwords::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> ActionResult<String> {
  if password.is_empty() {
    return Err(ActionError::validation("password must not be empty"));
  }

  let salt = SaltString::generate(&mut OsRng);
  match Argon2::default().hash_password(password.as_bytes(), &salt) {
    Ok(hash) => {
      debug!("Password hashed.");
      Ok(hash.to_string())
    }
    Err(argon_err) => {
      error!(error = %argon_err, "Argon2 hashing failed.");
      Err(ActionError::Internal(format!("password hashing failed: {}", argon_err)))
    }
  }
}

/// `Ok(false)` on a mismatch, `Err` only when the stored hash is unusable.
#[instrument(name = "passwords::verify_password", skip_all, err(Display))]
pub fn verify_password(stored_hash: &str, candidate: &str) -> ActionResult<bool> {
  let parsed = PasswordHash::new(stored_hash).map_err(|parse_err| {
    error!(error = %parse_err, "Stored password hash is malformed.");
    ActionError::Internal(format!("invalid stored password hash: {}", parse_err))
  })?;

  match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => Ok(false),
    Err(other) => Err(ActionError::Internal(format!("password verification failed: {}", other))),
  }
}
