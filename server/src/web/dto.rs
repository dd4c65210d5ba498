// kedai_server/src/web/dto.rs

//! Request bodies accepted by the API. Unknown fields are rejected.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderLineRequest {
  pub product_id: i64,
  pub quantity: i64,
  /// Unit price the customer saw when adding the product.
  pub price: Decimal,
  pub name: String,
  #[serde(default)]
  pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateOrderRequest {
  #[serde(default)]
  pub user_id: Option<i64>,
  #[serde(default)]
  pub customer_name: Option<String>,
  #[serde(default)]
  pub customer_email: Option<String>,
  pub items: Vec<OrderLineRequest>,
  /// Client-side subtotal, checked against the server's own computation.
  #[serde(default)]
  pub total_price: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
  pub name: String,
  #[serde(default)]
  pub email: Option<String>,
}

/// Success envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
  pub success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
  pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
  pub fn ok(data: T) -> Self {
    Self {
      success: true,
      message: None,
      data,
    }
  }

  pub fn with_message(message: impl Into<String>, data: T) -> Self {
    Self {
      success: true,
      message: Some(message.into()),
      data,
    }
  }
}
