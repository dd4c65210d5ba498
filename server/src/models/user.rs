// kedai_server/src/models/user.rs

use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
  pub id: i64,
  pub name: String,
  pub email: String,
  #[serde(skip_serializing)] // Never send credentials to clients
  pub password: Option<String>,
}
