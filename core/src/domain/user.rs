// bazaar/src/domain/user.rs

use crate::config::USER_PHOTO_FALLBACK;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
  #[default]
  User,
  Admin,
}

impl Role {
  pub fn as_str(&self) -> &'static str {
    match self {
      Role::User => "USER",
      Role::Admin => "ADMIN",
    }
  }

  pub fn is_admin(self) -> bool {
    self == Role::Admin
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
  type Err = ParseRoleError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "USER" => Ok(Role::User),
      "ADMIN" => Ok(Role::Admin),
      other => Err(ParseRoleError(other.to_string())),
    }
  }
}

/// An account as seen by callers. The password hash never leaves the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
  pub id: Uuid,
  pub name: String,
  pub nni: String,
  pub role: Role,
  pub photo: Option<String>,
}

impl User {
  pub fn photo_or_fallback(&self) -> &str {
    match self.photo.as_deref() {
      Some(url) if !url.is_empty() => url,
      _ => USER_PHOTO_FALLBACK,
    }
  }

  /// Applies the non-secret fields of `patch` in place.
  pub fn merge(&mut self, patch: &UserPatch) {
    if let Some(name) = &patch.name {
      self.name = name.clone();
    }
    if let Some(nni) = &patch.nni {
      self.nni = nni.clone();
    }
    if let Some(role) = patch.role {
      self.role = role;
    }
  }
}

#[derive(Clone, Deserialize)]
pub struct UserDraft {
  pub name: String,
  pub nni: String,
  pub password: String,
  #[serde(default)]
  pub role: Role,
  #[serde(default)]
  pub photo: Option<String>,
}

impl fmt::Debug for UserDraft {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("UserDraft")
      .field("name", &self.name)
      .field("nni", &self.nni)
      .field("password", &"<redacted>")
      .field("role", &self.role)
      .field("photo", &self.photo)
      .finish()
  }
}

/// A partial update. Only the fields that are `Some` change.
#[derive(Clone, Default, PartialEq, Deserialize)]
pub struct UserPatch {
  pub name: Option<String>,
  pub nni: Option<String>,
  pub role: Option<Role>,
  pub password: Option<String>,
}

impl UserPatch {
  pub fn is_empty(&self) -> bool {
    self.name.is_none() && self.nni.is_none() && self.role.is_none() && self.password.is_none()
  }
}

impl fmt::Debug for UserPatch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("UserPatch")
      .field("name", &self.name)
      .field("nni", &self.nni)
      .field("role", &self.role)
      .field("password", &self.password.as_ref().map(|_| "<redacted>"))
      .finish()
  }
}

/// One independently editable column of a user row.
#[derive(Clone, PartialEq)]
pub enum UserField {
  Name(String),
  Nni(String),
  Role(Role),
  Password(String),
}

impl UserField {
  pub fn column(&self) -> &'static str {
    match self {
      UserField::Name(_) => "name",
      UserField::Nni(_) => "nni",
      UserField::Role(_) => "role",
      UserField::Password(_) => "password",
    }
  }
}

impl fmt::Debug for UserField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      UserField::Password(_) => f.write_str("Password(<redacted>)"),
      UserField::Name(v) => f.debug_tuple("Name").field(v).finish(),
      UserField::Nni(v) => f.debug_tuple("Nni").field(v).finish(),
      UserField::Role(v) => f.debug_tuple("Role").field(v).finish(),
    }
  }
}

impl From<UserField> for UserPatch {
  fn from(field: UserField) -> Self {
    let mut patch = UserPatch::default();
    match field {
      UserField::Name(v) => patch.name = Some(v),
      UserField::Nni(v) => patch.nni = Some(v),
      UserField::Role(v) => patch.role = Some(v),
      UserField::Password(v) => patch.password = Some(v),
    }
    patch
  }
}
