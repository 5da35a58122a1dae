// bazaar/src/store/mod.rs

//! The data-store seam. The action layer is the only caller.

pub mod memory;

pub use memory::MemoryStore;

use crate::domain::{OwnerSummary, Product, Role, User};
use crate::error::StoreResult;
use async_trait::async_trait;
use uuid::Uuid;

/// A user row as persisted, hash included.
#[derive(Debug, Clone)]
pub struct UserRecord {
  pub user: User,
  pub password_hash: String,
}

/// Column changes for a user row. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
  pub name: Option<String>,
  pub nni: Option<String>,
  pub role: Option<Role>,
  pub password_hash: Option<String>,
}

/// Column changes for a product row. `image_url: Some(None)` clears the column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
  pub name: Option<String>,
  pub quantity: Option<i32>,
  pub price_v: Option<f64>,
  pub image_url: Option<Option<String>>,
}

/// A product joined with its owner, if the owner still exists.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredProduct {
  pub product: Product,
  pub owner: Option<OwnerSummary>,
}

/// A window over a filtered collection together with the filtered count.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice<T> {
  pub items: Vec<T>,
  pub total: usize,
}

#[async_trait]
pub trait DataStore: Send + Sync {
  /// Every user, oldest first.
  async fn list_users(&self) -> StoreResult<Vec<User>>;

  async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;

  /// Exact, case-sensitive match on the unique `nni` column.
  async fn find_user_by_nni(&self, nni: &str) -> StoreResult<Option<User>>;

  /// Users whose `nni` contains `nni_fragment` (case-sensitive).
  async fn search_users(&self, nni_fragment: &str, offset: usize, limit: usize) -> StoreResult<Slice<User>>;

  /// Fails with `StoreError::Conflict` when the id or nni is taken.
  async fn insert_user(&self, record: UserRecord) -> StoreResult<()>;

  /// Returns `false` when no row has `id`.
  async fn update_user(&self, id: Uuid, changes: UserChanges) -> StoreResult<bool>;

  async fn delete_user(&self, id: Uuid) -> StoreResult<bool>;

  /// Every product with its owner, oldest first.
  async fn list_products(&self) -> StoreResult<Vec<StoredProduct>>;

  async fn find_product(&self, id: Uuid) -> StoreResult<Option<StoredProduct>>;

  /// Products whose name contains `name_fragment`, ignoring case.
  async fn search_products(
    &self,
    name_fragment: &str,
    offset: usize,
    limit: usize,
  ) -> StoreResult<Slice<StoredProduct>>;

  async fn insert_product(&self, product: Product) -> StoreResult<()>;

  async fn update_product(&self, id: Uuid, changes: ProductChanges) -> StoreResult<bool>;

  async fn delete_product(&self, id: Uuid) -> StoreResult<bool>;
}
