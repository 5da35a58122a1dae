// bazaar_admin/src/web/extractors.rs

use actix_web::{FromRequest, HttpRequest};
use bazaar::{ActionError, Actions, Actor};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "X-User-ID";

/// The caller's identity as asserted by the `X-User-ID` header.
///
/// Session management lives outside this service; the header is trusted for identity only.
/// The role is always re-read from the store through [`actor_for`].
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
  pub user_id: Uuid,
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let parsed = req
      .headers()
      .get(USER_ID_HEADER)
      .and_then(|value| value.to_str().ok())
      .and_then(|raw| Uuid::parse_str(raw.trim()).ok());

    match parsed {
      Some(user_id) => futures_util::future::ready(Ok(AuthenticatedUser { user_id })),
      None => {
        warn!("AuthenticatedUser extractor: missing or invalid X-User-ID header.");
        futures_util::future::ready(Err(AppError::Auth(
          "Authentication required. Missing or invalid X-User-ID header.".to_string(),
        )))
      }
    }
  }
}

/// Resolves the caller to an [`Actor`]. An id with no account is an authentication failure.
pub async fn actor_for(actions: &Actions, auth_user: AuthenticatedUser) -> Result<Actor, AppError> {
  match actions.resolve_actor(auth_user.user_id).await {
    Ok(actor) => Ok(actor),
    Err(ActionError::NotFound(_)) => Err(AppError::Auth(format!("Unknown user {}", auth_user.user_id))),
    Err(other) => Err(other.into()),
  }
}
