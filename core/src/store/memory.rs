// bazaar/src/store/memory.rs

use super::{DataStore, ProductChanges, Slice, StoredProduct, UserChanges, UserRecord};
use crate::domain::{OwnerSummary, Product, User};
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, instrument};
use uuid::Uuid;

/// An in-process `DataStore`. Rows keep insertion order.
///
/// `set_available(false)` makes every call fail with `StoreError::Unavailable`,
/// which lets callers exercise their outage paths.
#[derive(Debug)]
pub struct MemoryStore {
  users: RwLock<Vec<UserRecord>>,
  products: RwLock<Vec<Product>>,
  available: AtomicBool,
}

impl Default for MemoryStore {
  fn default() -> Self {
    Self::new()
  }
}

impl MemoryStore {
  pub fn new() -> Self {
    Self {
      users: RwLock::new(Vec::new()),
      products: RwLock::new(Vec::new()),
      available: AtomicBool::new(true),
    }
  }

  pub fn set_available(&self, available: bool) {
    self.available.store(available, Ordering::SeqCst);
  }

  /// The stored hash for `id`, for callers that verify credentials.
  pub fn password_hash(&self, id: Uuid) -> Option<String> {
    self
      .users
      .read()
      .iter()
      .find(|r| r.user.id == id)
      .map(|r| r.password_hash.clone())
  }

  fn check_available(&self) -> StoreResult<()> {
    if self.available.load(Ordering::SeqCst) {
      Ok(())
    } else {
      Err(StoreError::Unavailable("memory store switched off".to_string()))
    }
  }

  fn join_owner(&self, product: &Product) -> StoredProduct {
    let owner = self
      .users
      .read()
      .iter()
      .find(|r| r.user.id == product.user_id)
      .map(|r| OwnerSummary {
        name: r.user.name.clone(),
        nni: r.user.nni.clone(),
      });
    StoredProduct {
      product: product.clone(),
      owner,
    }
  }
}

#[async_trait]
impl DataStore for MemoryStore {
  async fn list_users(&self) -> StoreResult<Vec<User>> {
    self.check_available()?;
    Ok(self.users.read().iter().map(|r| r.user.clone()).collect())
  }

  async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
    self.check_available()?;
    Ok(self.users.read().iter().find(|r| r.user.id == id).map(|r| r.user.clone()))
  }

  async fn find_user_by_nni(&self, nni: &str) -> StoreResult<Option<User>> {
    self.check_available()?;
    Ok(self.users.read().iter().find(|r| r.user.nni == nni).map(|r| r.user.clone()))
  }

  async fn search_users(&self, nni_fragment: &str, offset: usize, limit: usize) -> StoreResult<Slice<User>> {
    self.check_available()?;
    let users = self.users.read();
    let matching: Vec<&UserRecord> = users.iter().filter(|r| r.user.nni.contains(nni_fragment)).collect();
    Ok(Slice {
      total: matching.len(),
      items: matching.into_iter().skip(offset).take(limit).map(|r| r.user.clone()).collect(),
    })
  }

  #[instrument(name = "MemoryStore::insert_user", skip(self, record), fields(user_id = %record.user.id))]
  async fn insert_user(&self, record: UserRecord) -> StoreResult<()> {
    self.check_available()?;
    let mut users = self.users.write();
    if users.iter().any(|r| r.user.id == record.user.id) {
      return Err(StoreError::Conflict(format!("user id {} already exists", record.user.id)));
    }
    if users.iter().any(|r| r.user.nni == record.user.nni) {
      return Err(StoreError::Conflict(format!("nni {} is already registered", record.user.nni)));
    }
    users.push(record);
    debug!("User row inserted.");
    Ok(())
  }

  #[instrument(name = "MemoryStore::update_user", skip(self, changes), fields(user_id = %id))]
  async fn update_user(&self, id: Uuid, changes: UserChanges) -> StoreResult<bool> {
    self.check_available()?;
    let mut users = self.users.write();
    let Some(idx) = users.iter().position(|r| r.user.id == id) else {
      return Ok(false);
    };
    if let Some(nni) = &changes.nni {
      if users.iter().any(|r| r.user.id != id && &r.user.nni == nni) {
        return Err(StoreError::Conflict(format!("nni {} is already registered", nni)));
      }
    }
    let record = &mut users[idx];
    if let Some(name) = changes.name {
      record.user.name = name;
    }
    if let Some(nni) = changes.nni {
      record.user.nni = nni;
    }
    if let Some(role) = changes.role {
      record.user.role = role;
    }
    if let Some(hash) = changes.password_hash {
      record.password_hash = hash;
    }
    Ok(true)
  }

  #[instrument(name = "MemoryStore::delete_user", skip(self), fields(user_id = %id))]
  async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
    self.check_available()?;
    let mut users = self.users.write();
    let before = users.len();
    users.retain(|r| r.user.id != id);
    Ok(users.len() != before)
  }

  async fn list_products(&self) -> StoreResult<Vec<StoredProduct>> {
    self.check_available()?;
    let products = self.products.read().clone();
    Ok(products.iter().map(|p| self.join_owner(p)).collect())
  }

  async fn find_product(&self, id: Uuid) -> StoreResult<Option<StoredProduct>> {
    self.check_available()?;
    let product = self.products.read().iter().find(|p| p.id == id).cloned();
    Ok(product.map(|p| self.join_owner(&p)))
  }

  async fn search_products(
    &self,
    name_fragment: &str,
    offset: usize,
    limit: usize,
  ) -> StoreResult<Slice<StoredProduct>> {
    self.check_available()?;
    let needle = name_fragment.to_lowercase();
    let matching: Vec<Product> = self
      .products
      .read()
      .iter()
      .filter(|p| p.name.to_lowercase().contains(&needle))
      .cloned()
      .collect();
    Ok(Slice {
      total: matching.len(),
      items: matching.iter().skip(offset).take(limit).map(|p| self.join_owner(p)).collect(),
    })
  }

  #[instrument(name = "MemoryStore::insert_product", skip(self, product), fields(product_id = %product.id))]
  async fn insert_product(&self, product: Product) -> StoreResult<()> {
    self.check_available()?;
    let mut products = self.products.write();
    if products.iter().any(|p| p.id == product.id) {
      return Err(StoreError::Conflict(format!("product id {} already exists", product.id)));
    }
    products.push(product);
    Ok(())
  }

  #[instrument(name = "MemoryStore::update_product", skip(self, changes), fields(product_id = %id))]
  async fn update_product(&self, id: Uuid, changes: ProductChanges) -> StoreResult<bool> {
    self.check_available()?;
    let mut products = self.products.write();
    let Some(product) = products.iter_mut().find(|p| p.id == id) else {
      return Ok(false);
    };
    if let Some(name) = changes.name {
      product.name = name;
    }
    if let Some(quantity) = changes.quantity {
      product.quantity = quantity;
    }
    if let Some(price_v) = changes.price_v {
      product.price_v = price_v;
    }
    if let Some(image_url) = changes.image_url {
      product.image_url = image_url;
    }
    Ok(true)
  }

  #[instrument(name = "MemoryStore::delete_product", skip(self), fields(product_id = %id))]
  async fn delete_product(&self, id: Uuid) -> StoreResult<bool> {
    self.check_available()?;
    let mut products = self.products.write();
    let before = products.len();
    products.retain(|p| p.id != id);
    Ok(products.len() != before)
  }
}
