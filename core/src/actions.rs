// bazaar/src/actions.rs

//! The action layer: the only read and mutation path into the data store.
//!
//! Every mutating operation validates its input and re-checks authorization
//! before touching the store, whatever the calling page already checked.

use crate::config::{MIN_PASSWORD_LEN, PRODUCTS_PER_PAGE, USERS_PER_PAGE};
use crate::domain::{
  Actor, Product, ProductDraft, ProductListing, ProductPatch, Role, User, UserDraft, UserPatch,
};
use crate::error::{ActionError, ActionResult};
use crate::paging::{Page, PageRequest};
use crate::passwords;
use crate::policy;
use crate::store::{DataStore, ProductChanges, StoredProduct, UserChanges, UserRecord};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// The calls the dashboard pages make. `Actions` is the production implementation.
#[async_trait]
pub trait ActionLayer: Send + Sync {
  async fn get_all_users(&self) -> ActionResult<Vec<User>>;

  async fn update_user(&self, actor: &Actor, id: Uuid, patch: UserPatch) -> ActionResult<()>;

  async fn delete_user(&self, actor: &Actor, id: Uuid) -> ActionResult<()>;

  async fn get_products(&self) -> ActionResult<Vec<ProductListing>>;

  async fn create_product(&self, draft: ProductDraft, owner_id: Uuid) -> ActionResult<Product>;

  async fn update_product(
    &self,
    id: Uuid,
    patch: ProductPatch,
    acting_user_id: Uuid,
    acting_role: Role,
  ) -> ActionResult<()>;

  async fn delete_product(&self, id: Uuid, acting_user_id: Uuid, acting_role: Role) -> ActionResult<()>;
}

#[derive(Clone)]
pub struct Actions {
  store: Arc<dyn DataStore>,
}

impl std::fmt::Debug for Actions {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Actions").finish_non_exhaustive()
  }
}

impl Actions {
  pub fn new(store: Arc<dyn DataStore>) -> Self {
    Self { store }
  }

  pub fn store(&self) -> &Arc<dyn DataStore> {
    &self.store
  }

  #[instrument(name = "actions::create_user", skip(self, draft), fields(nni = %draft.nni, role = %draft.role), err(Display))]
  pub async fn create_user(&self, draft: UserDraft) -> ActionResult<User> {
    if draft.name.trim().is_empty() || draft.nni.trim().is_empty() {
      return Err(ActionError::validation("name and nni are required"));
    }
    ensure_password_length(&draft.password)?;

    let password_hash = passwords::hash_password(&draft.password)?;
    let user = User {
      id: Uuid::new_v4(),
      name: draft.name,
      nni: draft.nni,
      role: draft.role,
      photo: draft.photo.filter(|p| !p.is_empty()),
    };
    self
      .store
      .insert_user(UserRecord {
        user: user.clone(),
        password_hash,
      })
      .await?;
    info!(user_id = %user.id, "User created.");
    Ok(user)
  }

  /// Looks the caller up so that authorization never relies on a client-supplied role.
  #[instrument(name = "actions::resolve_actor", skip(self), fields(user_id = %user_id), err(Display))]
  pub async fn resolve_actor(&self, user_id: Uuid) -> ActionResult<Actor> {
    let user = self
      .store
      .find_user(user_id)
      .await?
      .ok_or_else(|| ActionError::not_found(format!("user {} not found", user_id)))?;
    Ok(Actor::new(user.id, user.role))
  }

  #[instrument(name = "actions::get_product", skip(self), fields(product_id = %id), err(Display))]
  pub async fn get_product(&self, id: Uuid) -> ActionResult<ProductListing> {
    let stored = self.find_product(id).await?;
    Ok(ProductListing::new(stored.product, stored.owner))
  }

  #[instrument(name = "actions::get_users_page", skip(self), fields(page = request.page), err(Display))]
  pub async fn get_users_page(&self, request: &PageRequest) -> ActionResult<Page<User>> {
    let slice = self
      .store
      .search_users(&request.query, request.offset(USERS_PER_PAGE), USERS_PER_PAGE)
      .await?;
    Ok(Page::new(slice.items, request.page, USERS_PER_PAGE, slice.total))
  }

  #[instrument(name = "actions::get_products_page", skip(self), fields(page = request.page), err(Display))]
  pub async fn get_products_page(&self, request: &PageRequest) -> ActionResult<Page<ProductListing>> {
    let slice = self
      .store
      .search_products(&request.query, request.offset(PRODUCTS_PER_PAGE), PRODUCTS_PER_PAGE)
      .await?;
    let items = slice
      .items
      .into_iter()
      .map(|s| ProductListing::new(s.product, s.owner))
      .collect();
    Ok(Page::new(items, request.page, PRODUCTS_PER_PAGE, slice.total))
  }

  async fn find_product(&self, id: Uuid) -> ActionResult<StoredProduct> {
    self
      .store
      .find_product(id)
      .await?
      .ok_or_else(|| ActionError::not_found(format!("product {} not found", id)))
  }

  /// Loads the product and checks that `actor` may change it.
  async fn authorize_product_mutation(&self, id: Uuid, actor: &Actor) -> ActionResult<StoredProduct> {
    let stored = self.find_product(id).await?;
    if let Err(e) = policy::ensure_can_mutate(stored.product.user_id, actor) {
      warn!(product_id = %id, actor_id = %actor.id, role = %actor.role, "Product mutation refused.");
      return Err(e);
    }
    Ok(stored)
  }
}

fn ensure_password_length(password: &str) -> ActionResult<()> {
  if password.chars().count() < MIN_PASSWORD_LEN {
    return Err(ActionError::validation(format!(
      "password must be at least {} characters",
      MIN_PASSWORD_LEN
    )));
  }
  Ok(())
}

#[async_trait]
impl ActionLayer for Actions {
  #[instrument(name = "actions::get_all_users", skip(self), err(Display))]
  async fn get_all_users(&self) -> ActionResult<Vec<User>> {
    Ok(self.store.list_users().await?)
  }

  #[instrument(name = "actions::update_user", skip(self, actor, patch), fields(user_id = %id, actor_id = %actor.id), err(Display))]
  async fn update_user(&self, actor: &Actor, id: Uuid, patch: UserPatch) -> ActionResult<()> {
    policy::ensure_admin(actor)?;
    if patch.is_empty() {
      return Err(ActionError::validation("no fields to update"));
    }
    if matches!(&patch.name, Some(n) if n.trim().is_empty()) || matches!(&patch.nni, Some(n) if n.trim().is_empty()) {
      return Err(ActionError::validation("name and nni must not be empty"));
    }
    let password_hash = match patch.password.as_deref() {
      Some(password) => {
        ensure_password_length(password)?;
        Some(passwords::hash_password(password)?)
      }
      None => None,
    };

    let changes = UserChanges {
      name: patch.name,
      nni: patch.nni,
      role: patch.role,
      password_hash,
    };
    if !self.store.update_user(id, changes).await? {
      return Err(ActionError::not_found(format!("user {} not found", id)));
    }
    info!("User updated.");
    Ok(())
  }

  /// Products owned by the deleted user stay in place and list with placeholder owner fields.
  #[instrument(name = "actions::delete_user", skip(self, actor), fields(user_id = %id, actor_id = %actor.id), err(Display))]
  async fn delete_user(&self, actor: &Actor, id: Uuid) -> ActionResult<()> {
    policy::ensure_admin(actor)?;
    if !self.store.delete_user(id).await? {
      return Err(ActionError::not_found(format!("user {} not found", id)));
    }
    info!("User deleted.");
    Ok(())
  }

  #[instrument(name = "actions::get_products", skip(self), err(Display))]
  async fn get_products(&self) -> ActionResult<Vec<ProductListing>> {
    let stored = self.store.list_products().await?;
    Ok(
      stored
        .into_iter()
        .map(|s| ProductListing::new(s.product, s.owner))
        .collect(),
    )
  }

  #[instrument(name = "actions::create_product", skip(self, draft), fields(owner_id = %owner_id, name = %draft.name), err(Display))]
  async fn create_product(&self, draft: ProductDraft, owner_id: Uuid) -> ActionResult<Product> {
    draft.validate()?;
    if self.store.find_user(owner_id).await?.is_none() {
      return Err(ActionError::not_found(format!("owner {} not found", owner_id)));
    }

    let product = Product {
      id: Uuid::new_v4(),
      name: draft.name,
      quantity: draft.quantity,
      price_v: draft.price_v,
      image_url: draft.image_url.filter(|u| !u.is_empty()),
      user_id: owner_id,
    };
    self.store.insert_product(product.clone()).await?;
    info!(product_id = %product.id, "Product created.");
    Ok(product)
  }

  #[instrument(name = "actions::update_product", skip(self, patch), fields(product_id = %id, actor_id = %acting_user_id, role = %acting_role), err(Display))]
  async fn update_product(
    &self,
    id: Uuid,
    patch: ProductPatch,
    acting_user_id: Uuid,
    acting_role: Role,
  ) -> ActionResult<()> {
    let actor = Actor::new(acting_user_id, acting_role);
    self.authorize_product_mutation(id, &actor).await?;
    patch.validate()?;

    let changes = ProductChanges {
      name: patch.name,
      quantity: patch.quantity,
      price_v: patch.price_v,
      image_url: patch.image_url.map(|u| Some(u).filter(|u| !u.is_empty())),
    };
    if !self.store.update_product(id, changes).await? {
      return Err(ActionError::not_found(format!("product {} not found", id)));
    }
    info!("Product updated.");
    Ok(())
  }

  #[instrument(name = "actions::delete_product", skip(self), fields(product_id = %id, actor_id = %acting_user_id, role = %acting_role), err(Display))]
  async fn delete_product(&self, id: Uuid, acting_user_id: Uuid, acting_role: Role) -> ActionResult<()> {
    let actor = Actor::new(acting_user_id, acting_role);
    self.authorize_product_mutation(id, &actor).await?;
    if !self.store.delete_product(id).await? {
      return Err(ActionError::not_found(format!("product {} not found", id)));
    }
    info!("Product deleted.");
    Ok(())
  }
}
