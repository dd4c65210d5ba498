// kedai_server/src/models/product.rs

use crate::models::Money;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub id: i64,
  pub name: String,
  pub price: Money,
  pub description: Option<String>,
  pub image: Option<String>, // Relative path such as "kopi-susu.jpg"
}

/// A product as sent to clients, with the image resolved against the asset host.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
  #[serde(flatten)]
  pub product: Product,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub image_url: Option<String>,
}

impl Product {
  pub fn into_view(self, asset_base_url: Option<&str>) -> ProductView {
    let image_url = match (asset_base_url, self.image.as_deref()) {
      (Some(base), Some(image)) if !image.is_empty() => Some(format!("{}/{}", base, image.trim_start_matches('/'))),
      _ => None,
    };
    ProductView {
      product: self,
      image_url,
    }
  }
}
