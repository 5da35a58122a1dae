// bazaar/src/session.rs

use crate::domain::{Actor, Role};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
  pub id: Uuid,
  pub name: String,
  pub role: Role,
}

/// The signed-in identity as supplied by the host's auth layer. Pages only read it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub current_user: Option<SessionUser>,
}

impl Session {
  pub fn anonymous() -> Self {
    Self { current_user: None }
  }

  pub fn signed_in(id: Uuid, name: impl Into<String>, role: Role) -> Self {
    Self {
      current_user: Some(SessionUser {
        id,
        name: name.into(),
        role,
      }),
    }
  }

  pub fn is_authenticated(&self) -> bool {
    self.current_user.is_some()
  }

  pub fn actor(&self) -> Option<Actor> {
    self.current_user.as_ref().map(|u| Actor::new(u.id, u.role))
  }
}
