// bazaar_admin/src/db/mod.rs

//! PostgreSQL implementation of the `DataStore` seam, using runtime-checked sqlx queries.

pub mod rows;

use async_trait::async_trait;
use bazaar::store::{DataStore, ProductChanges, Slice, StoredProduct, UserChanges, UserRecord};
use bazaar::{Product, StoreError, StoreResult, User};
use rows::{ProductRow, UserRow};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{error, instrument};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::errors::Result;

const USER_COLUMNS: &str = "id, name, nni, role, photo, created_at";

const PRODUCT_SELECT: &str = "SELECT p.id, p.name, p.quantity, p.price_v, p.image_url, p.user_id, p.created_at, \
   u.name AS owner_name, u.nni AS owner_nni \
   FROM products p LEFT JOIN users u ON u.id = p.user_id";

const UNIQUE_VIOLATION: &str = "23505";

pub async fn connect(config: &AppConfig) -> Result<PgPool> {
  let pool = PgPoolOptions::new()
    .max_connections(config.database_max_connections)
    .connect(&config.database_url)
    .await?;
  Ok(pool)
}

pub async fn migrate(pool: &PgPool) -> Result<()> {
  sqlx::migrate!("./migrations")
    .run(pool)
    .await
    .map_err(|e| crate::errors::AppError::Internal(format!("Migration failed: {}", e)))
}

fn map_sqlx(err: sqlx::Error) -> StoreError {
  let is_unique_violation = err
    .as_database_error()
    .and_then(|db_err| db_err.code())
    .is_some_and(|code| code == UNIQUE_VIOLATION);
  if is_unique_violation {
    return StoreError::Conflict("a record with the same unique key already exists".to_string());
  }
  error!(error = %err, "Database call failed.");
  StoreError::Unavailable(err.to_string())
}

fn to_i64(n: usize) -> i64 {
  i64::try_from(n).unwrap_or(i64::MAX)
}

fn count_to_usize(n: i64) -> usize {
  usize::try_from(n).unwrap_or(0)
}

#[derive(Debug, Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl DataStore for PgStore {
  #[instrument(name = "PgStore::list_users", skip(self))]
  async fn list_users(&self) -> StoreResult<Vec<User>> {
    let rows: Vec<UserRow> = sqlx::query_as(&format!("SELECT {} FROM users ORDER BY created_at, id", USER_COLUMNS))
      .fetch_all(&self.pool)
      .await
      .map_err(map_sqlx)?;
    rows.into_iter().map(User::try_from).collect()
  }

  #[instrument(name = "PgStore::find_user", skip(self), fields(user_id = %id))]
  async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(map_sqlx)?;
    row.map(User::try_from).transpose()
  }

  #[instrument(name = "PgStore::find_user_by_nni", skip(self))]
  async fn find_user_by_nni(&self, nni: &str) -> StoreResult<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as(&format!("SELECT {} FROM users WHERE nni = $1", USER_COLUMNS))
      .bind(nni)
      .fetch_optional(&self.pool)
      .await
      .map_err(map_sqlx)?;
    row.map(User::try_from).transpose()
  }

  #[instrument(name = "PgStore::search_users", skip(self))]
  async fn search_users(&self, nni_fragment: &str, offset: usize, limit: usize) -> StoreResult<Slice<User>> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE strpos(nni, $1) > 0")
      .bind(nni_fragment)
      .fetch_one(&self.pool)
      .await
      .map_err(map_sqlx)?;
    let rows: Vec<UserRow> = sqlx::query_as(&format!(
      "SELECT {} FROM users WHERE strpos(nni, $1) > 0 ORDER BY created_at, id LIMIT $2 OFFSET $3",
      USER_COLUMNS
    ))
    .bind(nni_fragment)
    .bind(to_i64(limit))
    .bind(to_i64(offset))
    .fetch_all(&self.pool)
    .await
    .map_err(map_sqlx)?;

    Ok(Slice {
      items: rows.into_iter().map(User::try_from).collect::<StoreResult<_>>()?,
      total: count_to_usize(total),
    })
  }

  #[instrument(name = "PgStore::insert_user", skip(self, record), fields(user_id = %record.user.id))]
  async fn insert_user(&self, record: UserRecord) -> StoreResult<()> {
    sqlx::query("INSERT INTO users (id, name, nni, role, password_hash, photo) VALUES ($1, $2, $3, $4, $5, $6)")
      .bind(record.user.id)
      .bind(&record.user.name)
      .bind(&record.user.nni)
      .bind(record.user.role.as_str())
      .bind(&record.password_hash)
      .bind(&record.user.photo)
      .execute(&self.pool)
      .await
      .map_err(map_sqlx)?;
    Ok(())
  }

  #[instrument(name = "PgStore::update_user", skip(self, changes), fields(user_id = %id))]
  async fn update_user(&self, id: Uuid, changes: UserChanges) -> StoreResult<bool> {
    let result = sqlx::query(
      "UPDATE users SET name = COALESCE($2, name), nni = COALESCE($3, nni), role = COALESCE($4, role), \
       password_hash = COALESCE($5, password_hash) WHERE id = $1",
    )
    .bind(id)
    .bind(changes.name)
    .bind(changes.nni)
    .bind(changes.role.map(|r| r.as_str()))
    .bind(changes.password_hash)
    .execute(&self.pool)
    .await
    .map_err(map_sqlx)?;
    Ok(result.rows_affected() > 0)
  }

  #[instrument(name = "PgStore::delete_user", skip(self), fields(user_id = %id))]
  async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(map_sqlx)?;
    Ok(result.rows_affected() > 0)
  }

  #[instrument(name = "PgStore::list_products", skip(self))]
  async fn list_products(&self) -> StoreResult<Vec<StoredProduct>> {
    let rows: Vec<ProductRow> = sqlx::query_as(&format!("{} ORDER BY p.created_at, p.id", PRODUCT_SELECT))
      .fetch_all(&self.pool)
      .await
      .map_err(map_sqlx)?;
    Ok(rows.into_iter().map(StoredProduct::from).collect())
  }

  #[instrument(name = "PgStore::find_product", skip(self), fields(product_id = %id))]
  async fn find_product(&self, id: Uuid) -> StoreResult<Option<StoredProduct>> {
    let row: Option<ProductRow> = sqlx::query_as(&format!("{} WHERE p.id = $1", PRODUCT_SELECT))
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(map_sqlx)?;
    Ok(row.map(StoredProduct::from))
  }

  #[instrument(name = "PgStore::search_products", skip(self))]
  async fn search_products(
    &self,
    name_fragment: &str,
    offset: usize,
    limit: usize,
  ) -> StoreResult<Slice<StoredProduct>> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE strpos(lower(name), lower($1)) > 0")
      .bind(name_fragment)
      .fetch_one(&self.pool)
      .await
      .map_err(map_sqlx)?;
    let rows: Vec<ProductRow> = sqlx::query_as(&format!(
      "{} WHERE strpos(lower(p.name), lower($1)) > 0 ORDER BY p.created_at, p.id LIMIT $2 OFFSET $3",
      PRODUCT_SELECT
    ))
    .bind(name_fragment)
    .bind(to_i64(limit))
    .bind(to_i64(offset))
    .fetch_all(&self.pool)
    .await
    .map_err(map_sqlx)?;

    Ok(Slice {
      items: rows.into_iter().map(StoredProduct::from).collect(),
      total: count_to_usize(total),
    })
  }

  #[instrument(name = "PgStore::insert_product", skip(self, product), fields(product_id = %product.id))]
  async fn insert_product(&self, product: Product) -> StoreResult<()> {
    sqlx::query(
      "INSERT INTO products (id, name, quantity, price_v, image_url, user_id) VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(product.id)
    .bind(&product.name)
    .bind(product.quantity)
    .bind(product.price_v)
    .bind(&product.image_url)
    .bind(product.user_id)
    .execute(&self.pool)
    .await
    .map_err(map_sqlx)?;
    Ok(())
  }

  #[instrument(name = "PgStore::update_product", skip(self, changes), fields(product_id = %id))]
  async fn update_product(&self, id: Uuid, changes: ProductChanges) -> StoreResult<bool> {
    let touch_image = changes.image_url.is_some();
    let result = sqlx::query(
      "UPDATE products SET name = COALESCE($2, name), quantity = COALESCE($3, quantity), \
       price_v = COALESCE($4, price_v), image_url = CASE WHEN $6 THEN $5 ELSE image_url END WHERE id = $1",
    )
    .bind(id)
    .bind(changes.name)
    .bind(changes.quantity)
    .bind(changes.price_v)
    .bind(changes.image_url.flatten())
    .bind(touch_image)
    .execute(&self.pool)
    .await
    .map_err(map_sqlx)?;
    Ok(result.rows_affected() > 0)
  }

  #[instrument(name = "PgStore::delete_product", skip(self), fields(product_id = %id))]
  async fn delete_product(&self, id: Uuid) -> StoreResult<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(map_sqlx)?;
    Ok(result.rows_affected() > 0)
  }
}
