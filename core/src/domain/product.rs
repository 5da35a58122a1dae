// bazaar/src/domain/product.rs

use crate::config::{
  CONTACT_LINK_BASE, OWNER_NAME_PLACEHOLDER, OWNER_NNI_PLACEHOLDER, PRODUCT_IMAGE_PLACEHOLDER,
};
use crate::error::{ActionError, ActionResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub quantity: i32,
  #[serde(rename = "price_v")]
  pub price_v: f64,
  pub image_url: Option<String>,
  pub user_id: Uuid,
}

/// Read-only projection of a product's owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerSummary {
  pub name: String,
  pub nni: String,
}

impl OwnerSummary {
  /// Stands in for an owner whose account no longer exists.
  pub fn placeholder() -> Self {
    Self {
      name: OWNER_NAME_PLACEHOLDER.to_string(),
      nni: OWNER_NNI_PLACEHOLDER.to_string(),
    }
  }

  pub fn contact_link(&self) -> String {
    format!("{}{}", CONTACT_LINK_BASE, self.nni)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductListing {
  #[serde(flatten)]
  pub product: Product,
  pub user: OwnerSummary,
}

impl ProductListing {
  pub fn new(product: Product, owner: Option<OwnerSummary>) -> Self {
    Self {
      product,
      user: owner.unwrap_or_else(OwnerSummary::placeholder),
    }
  }

  pub fn id(&self) -> Uuid {
    self.product.id
  }

  pub fn image_or_placeholder(&self) -> &str {
    match self.product.image_url.as_deref() {
      Some(url) if !url.is_empty() => url,
      _ => PRODUCT_IMAGE_PLACEHOLDER,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
  pub name: String,
  pub quantity: i32,
  #[serde(rename = "price_v")]
  pub price_v: f64,
  #[serde(default)]
  pub image_url: Option<String>,
}

impl ProductDraft {
  pub fn validate(&self) -> ActionResult<()> {
    validate_name(&self.name)?;
    validate_quantity(self.quantity)?;
    validate_price(self.price_v)
  }
}

/// A partial update. `image_url: Some("")` clears the image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
  pub name: Option<String>,
  pub quantity: Option<i32>,
  #[serde(rename = "price_v")]
  pub price_v: Option<f64>,
  pub image_url: Option<String>,
}

impl ProductPatch {
  pub fn validate(&self) -> ActionResult<()> {
    if let Some(name) = &self.name {
      validate_name(name)?;
    }
    if let Some(quantity) = self.quantity {
      validate_quantity(quantity)?;
    }
    if let Some(price_v) = self.price_v {
      validate_price(price_v)?;
    }
    Ok(())
  }

  pub fn is_empty(&self) -> bool {
    self.name.is_none() && self.quantity.is_none() && self.price_v.is_none() && self.image_url.is_none()
  }
}

fn validate_name(name: &str) -> ActionResult<()> {
  if name.trim().is_empty() {
    return Err(ActionError::validation("product name must not be empty"));
  }
  Ok(())
}

fn validate_quantity(quantity: i32) -> ActionResult<()> {
  if quantity < 0 {
    return Err(ActionError::validation("quantity must be zero or more"));
  }
  Ok(())
}

fn validate_price(price_v: f64) -> ActionResult<()> {
  if !price_v.is_finite() || price_v <= 0.0 {
    return Err(ActionError::validation("price must be a number greater than zero"));
  }
  Ok(())
}
