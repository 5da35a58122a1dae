// bazaar_admin/src/db/rows.rs

use bazaar::{OwnerSummary, Product, Role, StoreError, User};
use bazaar::store::StoredProduct;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
  pub id: Uuid,
  pub name: String,
  pub nni: String,
  pub role: String,
  pub photo: Option<String>,
  pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
  type Error = StoreError;

  fn try_from(row: UserRow) -> Result<Self, Self::Error> {
    let role: Role = row
      .role
      .parse()
      .map_err(|e| StoreError::Unavailable(format!("unreadable user row {}: {}", row.id, e)))?;
    Ok(User {
      id: row.id,
      name: row.name,
      nni: row.nni,
      role,
      photo: row.photo,
    })
  }
}

/// A product joined with its owner. Owner columns are NULL for orphans.
#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
  pub id: Uuid,
  pub name: String,
  pub quantity: i32,
  pub price_v: f64,
  pub image_url: Option<String>,
  pub user_id: Uuid,
  pub created_at: DateTime<Utc>,
  pub owner_name: Option<String>,
  pub owner_nni: Option<String>,
}

impl From<ProductRow> for StoredProduct {
  fn from(row: ProductRow) -> Self {
    let owner = match (row.owner_name, row.owner_nni) {
      (Some(name), Some(nni)) => Some(OwnerSummary { name, nni }),
      _ => None,
    };
    StoredProduct {
      product: Product {
        id: row.id,
        name: row.name,
        quantity: row.quantity,
        price_v: row.price_v,
        image_url: row.image_url,
        user_id: row.user_id,
      },
      owner,
    }
  }
}
