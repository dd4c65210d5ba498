// kedai_server/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub db_max_connections: u32,

  /// Prefix for product image paths; products gain an `image_url` when set.
  pub asset_base_url: Option<String>,

  /// Flat surcharge applied on top of the item subtotal when pricing an order.
  pub order_surcharge_percent: Decimal,

  pub seed_db: bool,
  pub log_format: LogFormat,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      database_url: "sqlite://kedai.db?mode=rwc".to_string(),
      db_max_connections: 5,
      asset_base_url: None,
      order_surcharge_percent: Decimal::ZERO,
      seed_db: false,
      log_format: LogFormat::Pretty,
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|var_name| env::var(var_name).ok())
  }

  /// Builds the configuration from an arbitrary variable source, falling back
  /// to the defaults for anything unset.
  pub fn from_lookup(get_env: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let defaults = Self::default();

    let server_host = get_env("SERVER_HOST").unwrap_or(defaults.server_host);
    let server_port = match get_env("SERVER_PORT") {
      Some(raw) => raw
        .parse::<u16>()
        .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?,
      None => defaults.server_port,
    };
    let database_url = get_env("DATABASE_URL").unwrap_or(defaults.database_url);
    let db_max_connections = match get_env("DB_MAX_CONNECTIONS") {
      Some(raw) => match raw.parse::<u32>() {
        Ok(0) => return Err(AppError::Config("DB_MAX_CONNECTIONS must be at least 1".to_string())),
        Ok(n) => n,
        Err(e) => return Err(AppError::Config(format!("Invalid DB_MAX_CONNECTIONS: {}", e))),
      },
      None => defaults.db_max_connections,
    };
    let asset_base_url = get_env("ASSET_BASE_URL")
      .map(|url| url.trim().trim_end_matches('/').to_string())
      .filter(|url| !url.is_empty());

    let order_surcharge_percent = match get_env("ORDER_SURCHARGE_PERCENT") {
      Some(raw) => parse_percent(&raw)?,
      None => defaults.order_surcharge_percent,
    };

    let seed_db = match get_env("SEED_DB") {
      Some(raw) => raw
        .trim()
        .to_ascii_lowercase()
        .parse::<bool>()
        .map_err(|e| AppError::Config(format!("Invalid SEED_DB value: {}", e)))?,
      None => defaults.seed_db,
    };

    let log_format = match get_env("LOG_FORMAT").as_deref().map(str::trim) {
      Some("json") => LogFormat::Json,
      Some("pretty") | Some("") | None => LogFormat::Pretty,
      Some(other) => return Err(AppError::Config(format!("Unknown LOG_FORMAT '{}'", other))),
    };

    Ok(Self {
      server_host,
      server_port,
      database_url,
      db_max_connections,
      asset_base_url,
      order_surcharge_percent,
      seed_db,
      log_format,
    })
  }

  pub fn server_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

fn parse_percent(raw: &str) -> Result<Decimal> {
  let value = Decimal::from_str(raw.trim())
    .map_err(|e| AppError::Config(format!("Invalid ORDER_SURCHARGE_PERCENT: {}", e)))?;
  if value.is_sign_negative() || value > Decimal::ONE_HUNDRED {
    return Err(AppError::Config(format!(
      "ORDER_SURCHARGE_PERCENT must be between 0 and 100, got {}",
      value
    )));
  }
  Ok(value)
}
