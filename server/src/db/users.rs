// kedai_server/src/db/users.rs

//! User Resolver: find a customer by name or create one.

use crate::errors::{AppError, Result};
use crate::models::User;
use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::SqlitePool;
use tracing::{info, instrument, warn};

const USER_COLUMNS: &str = "id, name, email, password";
const SYNTHETIC_EMAIL_DOMAIN: &str = "example.com";
const MIN_NAME_CHARS: usize = 2;

static EMAIL_PATTERN: Lazy<std::result::Result<Regex, regex::Error>> =
  Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$"));

/// Outcome of [`resolve_or_create`]. `created` is false when an existing
/// customer was returned.
#[derive(Debug, Clone)]
pub struct Resolution {
  pub user: User,
  pub created: bool,
}

/// Returns the trimmed name, or a validation error when it is too short.
pub fn validate_name(name: &str) -> Result<&str> {
  let trimmed = name.trim();
  if trimmed.chars().count() < MIN_NAME_CHARS {
    return Err(AppError::Validation(format!(
      "Customer name must be at least {} characters.",
      MIN_NAME_CHARS
    )));
  }
  Ok(trimmed)
}

pub fn validate_email(email: &str) -> Result<()> {
  let pattern = EMAIL_PATTERN
    .as_ref()
    .map_err(|e| AppError::Internal(format!("email pattern failed to compile: {}", e)))?;
  if pattern.is_match(email) {
    Ok(())
  } else {
    Err(AppError::Validation(format!("'{}' is not a valid email address.", email)))
  }
}

/// Placeholder address for customers who did not give one: the name with all
/// whitespace removed, lowercased, at the synthetic domain.
pub fn synthesize_email(name: &str) -> String {
  let local: String = name.chars().filter(|c| !c.is_whitespace()).collect();
  format!("{}@{}", local.to_lowercase(), SYNTHETIC_EMAIL_DOMAIN)
}

pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>, sqlx::Error> {
  sqlx::query_as(&format!("SELECT {} FROM users ORDER BY id ASC", USER_COLUMNS))
    .fetch_all(pool)
    .await
}

pub async fn find_user(pool: &SqlitePool, user_id: i64) -> Result<Option<User>, sqlx::Error> {
  sqlx::query_as(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Exact, case-sensitive name match.
pub async fn find_user_by_name(pool: &SqlitePool, name: &str) -> Result<Option<User>, sqlx::Error> {
  sqlx::query_as(&format!("SELECT {} FROM users WHERE name = ?", USER_COLUMNS))
    .bind(name)
    .fetch_optional(pool)
    .await
}

/// Finds the customer called `name`, creating it when absent.
///
/// An existing record is returned unchanged, even when `email` differs from
/// the stored one. When two callers race on the same name, the loser of the
/// insert returns the winner's row.
#[instrument(name = "users::resolve_or_create", skip_all, fields(name = %name.trim()))]
pub async fn resolve_or_create(pool: &SqlitePool, name: &str, email: Option<&str>) -> Result<Resolution> {
  let name = validate_name(name)?;
  let email = match email.map(str::trim).filter(|e| !e.is_empty()) {
    Some(given) => {
      validate_email(given)?;
      given.to_string()
    }
    None => synthesize_email(name),
  };

  if let Some(user) = find_user_by_name(pool, name).await? {
    info!(user_id = user.id, "Reusing existing customer.");
    return Ok(Resolution { user, created: false });
  }

  let inserted: std::result::Result<User, sqlx::Error> = sqlx::query_as(&format!(
    "INSERT INTO users (name, email) VALUES (?, ?) RETURNING {}",
    USER_COLUMNS
  ))
  .bind(name)
  .bind(&email)
  .fetch_one(pool)
  .await;

  match inserted {
    Ok(user) => {
      info!(user_id = user.id, "Created customer.");
      Ok(Resolution { user, created: true })
    }
    Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
      if let Some(user) = find_user_by_name(pool, name).await? {
        info!(user_id = user.id, "Customer was created concurrently, reusing it.");
        return Ok(Resolution { user, created: false });
      }
      warn!(email = %email, "Email already belongs to another customer.");
      Err(AppError::Conflict(format!("Email {} is already in use.", email)))
    }
    Err(e) => Err(AppError::Persistence(e)),
  }
}
