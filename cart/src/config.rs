// kedai_cart/src/config.rs

use crate::error::ConfigError;
use crate::storage::DEFAULT_CART_FILE;
use dotenvy::dotenv;
use rust_decimal::Decimal;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct ClientConfig {
  /// Base of the storefront API, including the `/api` prefix.
  pub api_base_url: String,
  pub cart_path: PathBuf,
  /// Surcharge shown next to the cart total. Never sent with an order.
  pub display_surcharge_percent: Decimal,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      api_base_url: "http://127.0.0.1:8080/api".to_string(),
      cart_path: PathBuf::from(DEFAULT_CART_FILE),
      display_surcharge_percent: Decimal::ZERO,
    }
  }
}

impl ClientConfig {
  pub fn from_env() -> Result<Self, ConfigError> {
    dotenv().ok();
    Self::from_lookup(|var| env::var(var).ok())
  }

  pub fn from_lookup(get_env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
    let defaults = Self::default();

    let api_base_url = match get_env("KEDAI_API_URL") {
      Some(url) => {
        let url = url.trim().trim_end_matches('/').to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
          return Err(ConfigError::Invalid {
            var: "KEDAI_API_URL",
            reason: format!("'{}' is not an http(s) URL", url),
          });
        }
        url
      }
      None => defaults.api_base_url,
    };

    let cart_path = get_env("KEDAI_CART_PATH")
      .filter(|p| !p.trim().is_empty())
      .map(PathBuf::from)
      .unwrap_or(defaults.cart_path);

    let display_surcharge_percent = match get_env("KEDAI_DISPLAY_SURCHARGE_PERCENT") {
      Some(raw) => {
        let value = Decimal::from_str(raw.trim()).map_err(|e| ConfigError::Invalid {
          var: "KEDAI_DISPLAY_SURCHARGE_PERCENT",
          reason: e.to_string(),
        })?;
        if value.is_sign_negative() {
          return Err(ConfigError::Invalid {
            var: "KEDAI_DISPLAY_SURCHARGE_PERCENT",
            reason: "must not be negative".to_string(),
          });
        }
        value
      }
      None => defaults.display_surcharge_percent,
    };

    Ok(Self {
      api_base_url,
      cart_path,
      display_surcharge_percent,
    })
  }
}
