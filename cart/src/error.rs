// kedai_cart/src/error.rs

use kedai_flow::FlowError;
use thiserror::Error;

/// Failures of the local cart storage.
#[derive(Debug, Error)]
pub enum CartError {
  #[error("cart storage I/O failed: {0}")]
  Io(#[from] std::io::Error),

  #[error("cart data is not valid JSON: {0}")]
  Format(#[from] serde_json::Error),

  #[error("cart storage unavailable: {0}")]
  Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("request to the storefront failed: {0}")]
  Transport(#[from] reqwest::Error),

  /// The storefront answered with a non-success status or `success: false`.
  #[error("storefront returned {status}: {message}")]
  Api { status: u16, message: String },

  #[error("storefront response had no data")]
  MissingData,
}

impl ClientError {
  pub fn status(&self) -> Option<u16> {
    match self {
      ClientError::Api { status, .. } => Some(*status),
      ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
      ClientError::MissingData => None,
    }
  }
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("invalid value for {var}: {reason}")]
  Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum CheckoutError {
  #[error("a checkout is already in progress")]
  AlreadySubmitting,

  #[error("cart is empty")]
  EmptyCart,

  #[error("customer name is required")]
  MissingIdentity,

  #[error(transparent)]
  Client(#[from] ClientError),

  #[error("checkout flow error: {0}")]
  Flow(#[from] FlowError),

  #[error("checkout stopped before the order was placed")]
  Halted,
}
