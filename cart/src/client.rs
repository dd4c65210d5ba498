// kedai_cart/src/client.rs

//! HTTP client for the storefront API. Every response is wrapped in
//! `{success, data, error}`; failures become [`ClientError::Api`].

use crate::error::ClientError;
use crate::model::{CreateOrderPayload, Order, Product, User};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

#[derive(Debug, Deserialize)]
struct Envelope<T> {
  #[serde(default)]
  success: bool,
  #[serde(default = "Option::default")]
  data: Option<T>,
  #[serde(default)]
  error: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateUserPayload<'a> {
  name: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  email: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct StorefrontClient {
  http: reqwest::Client,
  base_url: String,
}

impl StorefrontClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
    let http = reqwest::Client::builder().build()?;
    Ok(Self::with_http_client(http, base_url))
  }

  pub fn with_http_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
    let base_url = base_url.into().trim_end_matches('/').to_string();
    Self { http, base_url }
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  fn url(&self, path: &str) -> String {
    format!("{}/{}", self.base_url, path.trim_start_matches('/'))
  }

  async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    let envelope: Envelope<T> = match response.json().await {
      Ok(envelope) => envelope,
      Err(e) if !status.is_success() => {
        debug!(error = %e, "Error response had no JSON envelope.");
        return Err(ClientError::Api {
          status: status.as_u16(),
          message: status.canonical_reason().unwrap_or("request failed").to_string(),
        });
      }
      Err(e) => return Err(e.into()),
    };

    if !status.is_success() || !envelope.success {
      let message = envelope
        .error
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
      warn!(status = status.as_u16(), %message, "Storefront rejected the request.");
      return Err(ClientError::Api {
        status: status.as_u16(),
        message,
      });
    }
    envelope.data.ok_or(ClientError::MissingData)
  }

  #[instrument(skip(self))]
  pub async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
    let response = self.http.get(self.url("products")).send().await?;
    Self::decode(response).await
  }

  #[instrument(skip(self))]
  pub async fn get_product(&self, product_id: i64) -> Result<Product, ClientError> {
    let response = self.http.get(self.url(&format!("products/{}", product_id))).send().await?;
    Self::decode(response).await
  }

  /// Finds or creates the customer called `name`.
  #[instrument(skip(self, email))]
  pub async fn resolve_user(&self, name: &str, email: Option<&str>) -> Result<User, ClientError> {
    let response = self
      .http
      .post(self.url("users"))
      .json(&CreateUserPayload { name, email })
      .send()
      .await?;
    Self::decode(response).await
  }

  #[instrument(skip(self, payload), fields(items = payload.items.len(), total = %payload.total_price))]
  pub async fn submit_order(&self, payload: &CreateOrderPayload) -> Result<Order, ClientError> {
    let response = self.http.post(self.url("orders")).json(payload).send().await?;
    Self::decode(response).await
  }

  #[instrument(skip(self))]
  pub async fn list_orders(&self) -> Result<Vec<Order>, ClientError> {
    let response = self.http.get(self.url("orders")).send().await?;
    Self::decode(response).await
  }

  #[instrument(skip(self))]
  pub async fn get_order(&self, order_id: i64) -> Result<Order, ClientError> {
    let response = self.http.get(self.url(&format!("orders/{}", order_id))).send().await?;
    Self::decode(response).await
  }
}
