// bazaar/src/domain/actor.rs

use super::user::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The identity on whose behalf a mutating call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
  pub id: Uuid,
  pub role: Role,
}

impl Actor {
  pub fn new(id: Uuid, role: Role) -> Self {
    Self { id, role }
  }

  pub fn is_admin(&self) -> bool {
    self.role.is_admin()
  }
}
