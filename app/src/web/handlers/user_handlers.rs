// bazaar_admin/src/web/handlers/user_handlers.rs

use actix_web::{web, HttpResponse};
use bazaar::{ActionLayer, PageRequest, UserDraft, UserPatch};
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::{actor_for, AuthenticatedUser};

#[instrument(name = "handler::list_users", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_users_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let actor = actor_for(&app_state.actions, auth_user).await?;
  bazaar::policy::ensure_admin(&actor)?;

  let users = app_state.actions.get_all_users().await?;
  info!("Fetched {} users.", users.len());
  Ok(HttpResponse::Ok().json(json!({ "users": users })))
}

#[instrument(name = "handler::users_page", skip(app_state, auth_user, query), fields(user_id = %auth_user.user_id))]
pub async fn users_page_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  query: web::Query<PageRequest>,
) -> Result<HttpResponse, AppError> {
  let actor = actor_for(&app_state.actions, auth_user).await?;
  bazaar::policy::ensure_admin(&actor)?;

  let page = app_state.actions.get_users_page(&query.into_inner()).await?;
  Ok(HttpResponse::Ok().json(page))
}

#[instrument(name = "handler::create_user", skip(app_state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn create_user_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  payload: web::Json<UserDraft>,
) -> Result<HttpResponse, AppError> {
  let actor = actor_for(&app_state.actions, auth_user).await?;
  bazaar::policy::ensure_admin(&actor)?;

  let user = app_state.actions.create_user(payload.into_inner()).await?;
  Ok(HttpResponse::Created().json(json!({ "user": user })))
}

#[instrument(
  name = "handler::update_user",
  skip(app_state, auth_user, path, payload),
  fields(user_id = %auth_user.user_id, target_id = %path.as_ref())
)]
pub async fn update_user_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  payload: web::Json<UserPatch>,
) -> Result<HttpResponse, AppError> {
  let target_id = path.into_inner();
  let actor = actor_for(&app_state.actions, auth_user).await?;

  app_state
    .actions
    .update_user(&actor, target_id, payload.into_inner())
    .await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "User updated successfully" })))
}

#[instrument(
  name = "handler::delete_user",
  skip(app_state, auth_user, path),
  fields(user_id = %auth_user.user_id, target_id = %path.as_ref())
)]
pub async fn delete_user_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let target_id = path.into_inner();
  let actor = actor_for(&app_state.actions, auth_user).await?;

  app_state.actions.delete_user(&actor, target_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "User deleted successfully" })))
}
