// bazaar_admin/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use bazaar::{ActionLayer, PageRequest, ProductDraft, ProductPatch};
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::{actor_for, AuthenticatedUser};

#[instrument(name = "handler::list_products", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  actor_for(&app_state.actions, auth_user).await?;

  let products = app_state.actions.get_products().await?;
  info!("Fetched {} products.", products.len());
  Ok(HttpResponse::Ok().json(json!({ "products": products })))
}

#[instrument(name = "handler::products_page", skip(app_state, auth_user, query), fields(user_id = %auth_user.user_id))]
pub async fn products_page_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  query: web::Query<PageRequest>,
) -> Result<HttpResponse, AppError> {
  actor_for(&app_state.actions, auth_user).await?;

  let page = app_state.actions.get_products_page(&query.into_inner()).await?;
  Ok(HttpResponse::Ok().json(page))
}

#[instrument(name = "handler::get_product", skip(app_state, auth_user, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  actor_for(&app_state.actions, auth_user).await?;

  let product = app_state.actions.get_product(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "product": product })))
}

#[instrument(name = "handler::create_product", skip(app_state, auth_user, payload), fields(user_id = %auth_user.user_id))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  payload: web::Json<ProductDraft>,
) -> Result<HttpResponse, AppError> {
  let actor = actor_for(&app_state.actions, auth_user).await?;

  let product = app_state.actions.create_product(payload.into_inner(), actor.id).await?;
  info!(product_id = %product.id, "Product created.");
  Ok(HttpResponse::Created().json(json!({
    "message": "Product created successfully",
    "product": product
  })))
}

#[instrument(
  name = "handler::update_product",
  skip(app_state, auth_user, path, payload),
  fields(user_id = %auth_user.user_id, product_id = %path.as_ref())
)]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
  payload: web::Json<ProductPatch>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let actor = actor_for(&app_state.actions, auth_user).await?;

  app_state
    .actions
    .update_product(product_id, payload.into_inner(), actor.id, actor.role)
    .await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Product updated successfully" })))
}

#[instrument(
  name = "handler::delete_product",
  skip(app_state, auth_user, path),
  fields(user_id = %auth_user.user_id, product_id = %path.as_ref())
)]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let actor = actor_for(&app_state.actions, auth_user).await?;

  app_state
    .actions
    .delete_product(product_id, actor.id, actor.role)
    .await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Product deleted successfully" })))
}
