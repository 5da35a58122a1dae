// bazaar/src/policy.rs

//! The single authorization rule for product mutations, shared by the pages
//! (early client-side check) and the action layer (enforcement).

use crate::domain::Actor;
use crate::error::{ActionError, ActionResult};
use uuid::Uuid;

pub fn can_mutate(owner_id: Uuid, actor: &Actor) -> bool {
  actor.is_admin() || owner_id == actor.id
}

pub fn ensure_can_mutate(owner_id: Uuid, actor: &Actor) -> ActionResult<()> {
  if can_mutate(owner_id, actor) {
    Ok(())
  } else {
    Err(ActionError::forbidden("only the owner or an administrator may change this product"))
  }
}

/// User management is reserved to administrators.
pub fn ensure_admin(actor: &Actor) -> ActionResult<()> {
  if actor.is_admin() {
    Ok(())
  } else {
    Err(ActionError::forbidden("administrator role required"))
  }
}
